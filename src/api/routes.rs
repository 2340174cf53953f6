//! API route configuration.
//!
//! # Access
//!
//! | Routes | Access |
//! |---|---|
//! | `POST /auth/login`, `POST /auth/refresh-token` | public (login rate limited) |
//! | `GET /v3/api-docs` | public, `403` in `prod` |
//! | `POST /auth/logout` | authenticated |
//! | `GET /projects/**`, `GET /team-members/**` | public |
//! | `POST`/`PUT`/`DELETE` on projects and team members | `ADMIN` |
//!
//! Every route except the login, refresh and docs routes passes through
//! [`auth::layer`], so a bad bearer token is rejected even on public reads.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::handlers::{
    api_docs_handler, create_project_handler, create_team_member_handler, delete_project_handler,
    delete_team_member_handler, get_project_by_slug_handler, get_project_handler,
    get_team_member_handler, list_projects_handler, list_team_members_handler, login_handler,
    logout_handler, refresh_token_handler, update_project_handler, update_team_member_handler,
};
use crate::api::middleware::{auth, rate_limit};
use crate::state::AppState;

/// All routes mounted under `/api`.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let guarded = Router::new()
        .merge(public_routes())
        .merge(authenticated_routes())
        .merge(admin_routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .merge(credential_routes(state.config.login_rate_limit))
        .route("/v3/api-docs", get(api_docs_handler))
        .merge(guarded)
}

/// Login and refresh; they carry credentials of their own.
fn credential_routes(rate_limited: bool) -> Router<AppState> {
    let login = if rate_limited {
        Router::new().route(
            "/auth/login",
            post(login_handler).layer(rate_limit::login_layer()),
        )
    } else {
        Router::new().route("/auth/login", post(login_handler))
    };

    login.route("/auth/refresh-token", post(refresh_token_handler))
}

/// Read-only content endpoints.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects_handler))
        .route("/projects/{id}", get(get_project_handler))
        .route("/projects/slug/{slug}", get(get_project_by_slug_handler))
        .route("/team-members", get(list_team_members_handler))
        .route("/team-members/{id}", get(get_team_member_handler))
}

fn authenticated_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn(auth::require_auth))
}

/// Content management, `ADMIN` only.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project_handler))
        .route(
            "/projects/{id}",
            axum::routing::put(update_project_handler).delete(delete_project_handler),
        )
        .route("/team-members", post(create_team_member_handler))
        .route(
            "/team-members/{id}",
            axum::routing::put(update_team_member_handler).delete(delete_team_member_handler),
        )
        .route_layer(middleware::from_fn(auth::require_admin))
}
