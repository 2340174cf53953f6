//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health` - Health check: database and cache (public)
//! - `/api/*`       - REST API, see [`crate::api::routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Origins from configuration, credentials allowed
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// The routed application before path normalization.
pub fn router(state: AppState) -> Router {
    let cors = cors::layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes(state.clone()))
        .with_state(state)
        .layer(cors)
        .layer(tracing::layer())
}
