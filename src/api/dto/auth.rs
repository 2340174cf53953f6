//! DTOs for authentication endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::validation::not_blank;

/// Value of `tokenType` in [`AuthResponse`].
pub const ACCESS_TOKEN_TYPE: &str = "ACCESS_TOKEN";

/// Credentials for `POST /api/auth/login`.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "admin@cair.kz")]
    pub username: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Access token returned by login and refresh. The refresh token travels in
/// the `REFRESH_TOKEN` cookie only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[schema(example = "ACCESS_TOKEN")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

impl AuthResponse {
    pub fn new(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_rejects_blank_fields() {
        let req = LoginRequest {
            username: " ".into(),
            password: "".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_debug_hides_password() {
        let req = LoginRequest {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{req:?}").contains("hunter2"));
    }

    #[test]
    fn test_auth_response_shape() {
        let value = serde_json::to_value(AuthResponse::new("t".into(), 900)).unwrap();
        assert_eq!(
            value,
            json!({ "accessToken": "t", "tokenType": "ACCESS_TOKEN", "expiresIn": 900 })
        );
    }
}
