//! Handlers for login, token refresh and logout.
//!
//! The access token is returned in the body; the refresh token only ever
//! travels in the `REFRESH_TOKEN` cookie.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;

use crate::api::dto::{AuthResponse, LoginRequest};
use crate::api::extract::ValidatedJson;
use crate::api::middleware::auth::BearerToken;
use crate::application::services::IssuedSession;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

pub const REFRESH_COOKIE: &str = "REFRESH_TOKEN";

fn refresh_cookie(token: String, max_age_seconds: u64) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .secure(true)
        .path("/")
        .max_age(time::Duration::seconds(
            i64::try_from(max_age_seconds).unwrap_or(i64::MAX),
        ))
        .build()
}

fn with_session(state: &AppState, jar: CookieJar, session: IssuedSession) -> (CookieJar, Json<AuthResponse>) {
    let cookie = refresh_cookie(
        session.refresh_token,
        state.config.jwt.refresh_cookie_ttl_seconds,
    );
    (jar.add(cookie), Json(session.response))
}

/// Authenticates with username and password.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// Sets the `REFRESH_TOKEN` cookie (`HttpOnly; Secure; Path=/`).
///
/// # Errors
///
/// - `400` if a field is blank
/// - `401` for bad credentials or a deactivated account
/// - `429` when the per-IP login limit is exceeded
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, body = AuthResponse),
        (status = 400, body = ErrorBody),
        (status = 401, description = "Invalid username or password", body = ErrorBody),
        (status = 429, description = "Too many login attempts"),
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let session = state
        .auth_service
        .login(payload.username.trim(), &payload.password)
        .await?;
    Ok(with_session(&state, jar, session))
}

/// Exchanges the refresh cookie for a new token pair.
///
/// # Endpoint
///
/// `POST /api/auth/refresh-token`
///
/// The old refresh token is revoked; a new one replaces the cookie.
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    tag = "Authentication",
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, description = "Missing, revoked, expired or invalid refresh token", body = ErrorBody),
    )
)]
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized(
                "Refresh token is missing",
                json!({ "reason": "MISSING_REFRESH_TOKEN" }),
            )
        })?;

    let session = state.auth_service.refresh(&token).await?;
    Ok(with_session(&state, jar, session))
}

/// Revokes the bearer token and the refresh cookie.
///
/// # Endpoint
///
/// `POST /api/auth/logout` (authenticated)
///
/// Answers `204 No Content` and expires the cookie (`Max-Age=0`).
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    security(("Bearer Authentication" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, body = ErrorBody),
    )
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(BearerToken(access_token)): Extension<BearerToken>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), AppError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty());

    state
        .auth_service
        .logout(Some(&access_token), refresh_token.as_deref())
        .await?;

    Ok((StatusCode::NO_CONTENT, jar.add(refresh_cookie(String::new(), 0))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_cookie_attributes() {
        let rendered = refresh_cookie("abc".to_string(), 604_800).to_string();
        assert!(rendered.starts_with("REFRESH_TOKEN=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
    }

    #[test]
    fn test_expired_cookie_has_zero_max_age() {
        let rendered = refresh_cookie(String::new(), 0).to_string();
        assert!(rendered.contains("Max-Age=0"));
    }
}
