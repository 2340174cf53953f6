//! OpenAPI document endpoint.

use axum::{Json, extract::State};
use serde_json::json;
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDocument;

use crate::api::doc::ApiDoc;
use crate::error::AppError;
use crate::state::AppState;

/// Serves the OpenAPI 3 document.
///
/// # Endpoint
///
/// `GET /api/v3/api-docs`
///
/// # Errors
///
/// Returns `403 Forbidden` in the `prod` profile.
pub async fn api_docs_handler(
    State(state): State<AppState>,
) -> Result<Json<OpenApiDocument>, AppError> {
    if state.config.profile.is_prod() {
        return Err(AppError::forbidden(
            "API documentation is disabled",
            json!({ "profile": state.config.profile.to_string() }),
        ));
    }

    Ok(Json(ApiDoc::openapi()))
}
