//! Login, token rotation, logout and bearer authentication.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::api::dto::AuthResponse;
use crate::domain::entities::{Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, TokenBlacklist};
use crate::infrastructure::security::{Claims, JwtError, JwtService, TokenType, verify_password};
use crate::telemetry;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// The caller behind a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            roles: user.roles,
        }
    }
}

/// Result of a successful login or refresh. The refresh token travels in a
/// cookie, never in the response body.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub response: AuthResponse,
    pub refresh_token: String,
}

/// Service for issuing and checking RS256 tokens.
///
/// Revoked tokens are recorded in the [`TokenBlacklist`] until their natural
/// expiry. Blacklist failures surface as `500` rather than letting a revoked
/// token through.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    blacklist: Arc<dyn TokenBlacklist>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt: Arc<JwtService>,
        blacklist: Arc<dyn TokenBlacklist>,
    ) -> Self {
        Self {
            users,
            jwt,
            blacklist,
        }
    }

    /// Verifies credentials and issues an access/refresh pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown users, wrong passwords
    /// and deactivated accounts alike.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedSession, AppError> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) if user.is_active && verify_password(password, &user.password_hash) => user,
            Some(user) if !user.is_active => {
                warn!(username, "Login rejected for deactivated account");
                telemetry::record_login(false);
                return Err(invalid_credentials());
            }
            _ => {
                warn!(username, "Login failed");
                telemetry::record_login(false);
                return Err(invalid_credentials());
            }
        };

        let session = self.issue_session(&user.username)?;
        telemetry::record_login(true);
        info!(username = %user.username, "User logged in");
        Ok(session)
    }

    /// Exchanges a refresh token for a new pair and revokes the old one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is revoked, invalid,
    /// expired, not a refresh token, or its user is gone or deactivated.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedSession, AppError> {
        let result = self.rotate(refresh_token).await;
        telemetry::record_token_refresh(result.is_ok());
        result
    }

    async fn rotate(&self, refresh_token: &str) -> Result<IssuedSession, AppError> {
        self.reject_revoked(refresh_token).await?;

        let claims = self.jwt.decode(refresh_token).map_err(|e| {
            warn!(error = %e, "Refresh token rejected");
            token_error("Invalid refresh token", &e)
        })?;

        if claims.token_type != TokenType::RefreshToken {
            warn!(subject = %claims.sub, token_type = %claims.token_type, "Non-refresh token presented for refresh");
            return Err(AppError::unauthorized(
                "Invalid refresh token",
                json!({ "reason": "INVALID_TOKEN_TYPE" }),
            ));
        }

        let user = self.active_user(&claims.sub).await?;

        self.revoke(refresh_token, &claims, "refresh").await?;
        let session = self.issue_session(&user.username)?;
        info!(username = %user.username, "Tokens refreshed");
        Ok(session)
    }

    /// Revokes the presented tokens.
    ///
    /// An undecodable refresh token is skipped: it can no longer be used
    /// anyway.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if no refresh token was presented.
    pub async fn logout(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<(), AppError> {
        let refresh_token = refresh_token.ok_or_else(|| {
            AppError::unauthorized(
                "Refresh token is missing",
                json!({ "reason": "MISSING_REFRESH_TOKEN" }),
            )
        })?;

        if let Some(access_token) = access_token {
            match self.jwt.decode(access_token) {
                Ok(claims) => self.revoke(access_token, &claims, "access").await?,
                Err(e) => warn!(error = %e, "Skipping revocation of undecodable access token"),
            }
        }

        match self.jwt.decode(refresh_token) {
            Ok(claims) => {
                self.revoke(refresh_token, &claims, "refresh").await?;
                info!(username = %claims.sub, "User logged out");
            }
            Err(e) => warn!(error = %e, "Skipping revocation of undecodable refresh token"),
        }

        Ok(())
    }

    /// Resolves a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with `details.reason` set to
    /// `TOKEN_BLACKLISTED`, `TOKEN_EXPIRED` or `INVALID_TOKEN`, or when the
    /// user no longer exists or is deactivated.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        self.reject_revoked(token).await?;

        let claims = self.jwt.decode(token).map_err(|e| {
            match e {
                JwtError::Expired => info!("Expired access token presented"),
                _ => warn!(error = %e, "Invalid access token presented"),
            }
            token_error("Invalid token", &e)
        })?;

        if claims.token_type != TokenType::AccessToken {
            warn!(subject = %claims.sub, token_type = %claims.token_type, "Non-access token used for authentication");
            return Err(AppError::unauthorized(
                "Invalid token",
                json!({ "reason": "INVALID_TOKEN" }),
            ));
        }

        let user = self.active_user(&claims.sub).await?;
        Ok(user.into())
    }

    fn issue_session(&self, username: &str) -> Result<IssuedSession, AppError> {
        let access = self.jwt.issue_access_token(username).map_err(issue_error)?;
        let refresh = self.jwt.issue_refresh_token(username).map_err(issue_error)?;

        Ok(IssuedSession {
            response: AuthResponse::new(access.token, self.jwt.access_ttl().as_secs()),
            refresh_token: refresh.token,
        })
    }

    async fn reject_revoked(&self, token: &str) -> Result<(), AppError> {
        if self.blacklist.is_revoked(token).await.map_err(blacklist_error)? {
            warn!("Blacklisted token presented");
            return Err(AppError::unauthorized(
                "Token is blacklisted",
                json!({ "reason": "TOKEN_BLACKLISTED" }),
            ));
        }
        Ok(())
    }

    async fn revoke(&self, token: &str, claims: &Claims, kind: &'static str) -> Result<(), AppError> {
        self.blacklist
            .revoke(token, claims.remaining_lifetime())
            .await
            .map_err(blacklist_error)?;
        telemetry::record_token_revoked(kind);
        Ok(())
    }

    async fn active_user(&self, username: &str) -> Result<User, AppError> {
        match self.users.find_by_username(username).await? {
            Some(user) if user.is_active => Ok(user),
            _ => {
                warn!(username, "Token subject is unknown or deactivated");
                Err(AppError::unauthorized(
                    "User not found or disabled",
                    json!({ "reason": "INVALID_TOKEN" }),
                ))
            }
        }
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(INVALID_CREDENTIALS, json!({}))
}

fn token_error(message: &str, e: &JwtError) -> AppError {
    let message = match e {
        JwtError::Expired => "Token has expired",
        _ => message,
    };
    AppError::unauthorized(message, json!({ "reason": e.reason() }))
}

fn issue_error(e: JwtError) -> AppError {
    AppError::internal("Failed to issue token", json!({ "reason": e.to_string() }))
}

fn blacklist_error(e: CacheError) -> AppError {
    AppError::internal("Token blacklist unavailable", json!({ "reason": e.to_string() }))
}
