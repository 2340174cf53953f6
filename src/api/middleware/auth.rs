//! Bearer token authentication and role checks.
//!
//! [`layer`] runs on every protected `/api` route. It never rejects a request
//! for lacking a token; it only rejects tokens that are present but revoked,
//! expired or invalid. Route groups then demand a caller with
//! [`require_auth`] or an administrator with [`require_admin`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;
use tracing::debug;

use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Raw bearer token of an authenticated request.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Authenticates the `Authorization: Bearer <token>` header when present.
///
/// On success the [`AuthUser`] and the [`BearerToken`] are stored in request
/// extensions. Requests without the header pass through anonymously.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is malformed or the token is
/// blacklisted, expired, of the wrong type, or belongs to an unknown or
/// deactivated user.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !req.headers().contains_key(AUTHORIZATION) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is invalid" }),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;
    debug!(username = %user.username, "Request authenticated");

    parts.extensions.insert(user);
    parts.extensions.insert(BearerToken(token));

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Rejects anonymous requests with `401`.
pub async fn require_auth(req: Request, next: Next) -> Result<Response, AppError> {
    if req.extensions().get::<AuthUser>().is_none() {
        return Err(authentication_required());
    }
    Ok(next.run(req).await)
}

/// Rejects anonymous requests with `401` and non-admins with `403`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    match req.extensions().get::<AuthUser>() {
        None => Err(authentication_required()),
        Some(user) if !user.is_admin() => {
            debug!(username = %user.username, "Admin access denied");
            Err(AppError::forbidden(
                "Access denied",
                json!({ "required_role": "ADMIN" }),
            ))
        }
        Some(_) => Ok(next.run(req).await),
    }
}

fn authentication_required() -> AppError {
    AppError::unauthorized(
        "Authentication required",
        json!({ "reason": "Authorization header is missing" }),
    )
}
