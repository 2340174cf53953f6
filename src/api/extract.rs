//! Request extractors.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then validated.
///
/// Malformed bodies and failed validation both answer `400` with the
/// standard error payload instead of axum's plain-text rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::bad_request(
                "Malformed request body",
                json!({ "reason": rejection.body_text() }),
            )
        })?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string extractor whose rejections use the standard error payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(
                    "Invalid query parameters",
                    json!({ "reason": rejection.body_text() }),
                )
            })?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 3))]
        name: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(request(r#"{"name":"abc"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "abc");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(request("{"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_body_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(request(r#"{"name":"a"}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_error_info().details.get("name").is_some());
    }
}
