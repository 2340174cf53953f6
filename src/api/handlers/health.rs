//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "healthy" },
///     "cache": { "status": "disabled" }
///   }
/// }
/// ```
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, body = HealthResponse),
        (status = 503, description = "A component is unhealthy", body = HealthResponse),
    )
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;

    let all_healthy = database.is_healthy() && cache.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, cache },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.health.ping().await {
        Ok(()) => CheckStatus::healthy(),
        Err(e) => CheckStatus::unhealthy(format!("Database error: {e}")),
    }
}

/// Redis is optional; without it the cache reports `disabled`.
async fn check_cache(state: &AppState) -> CheckStatus {
    if !state.config.is_cache_enabled() {
        return CheckStatus::disabled();
    }

    if state.cache.health_check().await {
        CheckStatus::healthy()
    } else {
        CheckStatus::unhealthy("Redis connection failed")
    }
}
