//! Handlers for project endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::{PageResponse, PaginationParams, ProjectRequest, ProjectResponse};
use crate::api::extract::{QueryParams, ValidatedJson};
use crate::domain::pagination::ProjectSort;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Lists projects page by page.
///
/// # Endpoint
///
/// `GET /api/projects?page=0&size=10&sortBy=startDate&direction=DESC`
///
/// Sortable by `id`, `slug`, `status`, `startDate`, `endDate`, `createdAt`
/// and `updatedAt`.
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of projects", body = PageResponse<ProjectResponse>),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody),
    )
)]
pub async fn list_projects_handler(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<PageResponse<ProjectResponse>>, AppError> {
    let request = params.into_page_request::<ProjectSort>()?;
    let page = state.project_service.get_all_projects(request).await?;
    Ok(Json(page))
}

/// `GET /api/projects/{id}`
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, body = ProjectResponse),
        (status = 404, description = "Project not found", body = ErrorBody),
    )
)]
pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectResponse>, AppError> {
    Ok(Json(state.project_service.get_project_by_id(id).await?))
}

/// `GET /api/projects/slug/{slug}`
#[utoipa::path(
    get,
    path = "/api/projects/slug/{slug}",
    tag = "Projects",
    params(("slug" = String, Path, description = "URL slug")),
    responses(
        (status = 200, body = ProjectResponse),
        (status = 404, description = "Project not found", body = ErrorBody),
    )
)]
pub async fn get_project_by_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    Ok(Json(state.project_service.get_project_by_slug(&slug).await?))
}

/// Creates a project with all of its translations.
///
/// # Endpoint
///
/// `POST /api/projects` (ADMIN)
///
/// # Errors
///
/// - `400` on validation failure
/// - `409` if the slug is already used
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = ProjectRequest,
    security(("Bearer Authentication" = [])),
    responses(
        (status = 201, body = ProjectResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 409, description = "Slug already exists", body = ErrorBody),
    )
)]
pub async fn create_project_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    let project = state.project_service.create_project(payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Replaces a project and its translations.
///
/// # Endpoint
///
/// `PUT /api/projects/{id}` (ADMIN)
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = i64, Path, description = "Project id")),
    request_body = ProjectRequest,
    security(("Bearer Authentication" = [])),
    responses(
        (status = 200, body = ProjectResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, description = "Slug already exists", body = ErrorBody),
    )
)]
pub async fn update_project_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    Ok(Json(state.project_service.update_project(id, payload).await?))
}

/// `DELETE /api/projects/{id}` (ADMIN)
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = i64, Path, description = "Project id")),
    security(("Bearer Authentication" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn delete_project_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.project_service.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
