//! Handlers for team member endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::{PageResponse, PaginationParams, TeamMemberRequest, TeamMemberResponse};
use crate::api::extract::{QueryParams, ValidatedJson};
use crate::domain::pagination::TeamMemberSort;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Lists team members page by page.
///
/// Sortable by `id`, `name`, `email`, `createdAt` and `updatedAt`.
#[utoipa::path(
    get,
    path = "/api/team-members",
    tag = "Team members",
    params(PaginationParams),
    responses(
        (status = 200, body = PageResponse<TeamMemberResponse>),
        (status = 400, body = ErrorBody),
    )
)]
pub async fn list_team_members_handler(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<PageResponse<TeamMemberResponse>>, AppError> {
    let request = params.into_page_request::<TeamMemberSort>()?;
    Ok(Json(state.team_member_service.get_all_team_members(request).await?))
}

#[utoipa::path(
    get,
    path = "/api/team-members/{id}",
    tag = "Team members",
    params(("id" = i64, Path, description = "Team member id")),
    responses(
        (status = 200, body = TeamMemberResponse),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn get_team_member_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeamMemberResponse>, AppError> {
    Ok(Json(state.team_member_service.get_team_member_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/team-members",
    tag = "Team members",
    request_body = TeamMemberRequest,
    security(("Bearer Authentication" = [])),
    responses(
        (status = 201, body = TeamMemberResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
    )
)]
pub async fn create_team_member_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TeamMemberRequest>,
) -> Result<(StatusCode, Json<TeamMemberResponse>), AppError> {
    let member = state.team_member_service.create_team_member(payload).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    put,
    path = "/api/team-members/{id}",
    tag = "Team members",
    params(("id" = i64, Path, description = "Team member id")),
    request_body = TeamMemberRequest,
    security(("Bearer Authentication" = [])),
    responses(
        (status = 200, body = TeamMemberResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn update_team_member_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<TeamMemberRequest>,
) -> Result<Json<TeamMemberResponse>, AppError> {
    Ok(Json(
        state
            .team_member_service
            .update_team_member(id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/team-members/{id}",
    tag = "Team members",
    params(("id" = i64, Path, description = "Team member id")),
    security(("Bearer Authentication" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
pub async fn delete_team_member_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.team_member_service.delete_team_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
