//! Request-level error type shared by all routers.
//!
//! Validation failures carry per-field messages, client errors carry a
//! human-readable `msg`, and store or runtime failures are logged and
//! surfaced as an opaque 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// A single field-scoped validation message.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<&'static str>,
}

impl FieldError {
    #[must_use]
    pub fn new(msg: &str, param: &'static str) -> Self {
        Self {
            msg: msg.to_string(),
            param: Some(param),
        }
    }

    #[must_use]
    pub fn message(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
            param: None,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 with a list of per-field messages.
    Validation(Vec<FieldError>),
    /// 400, identical for unknown email and wrong password.
    InvalidCredentials,
    /// 401, credential header absent.
    MissingToken,
    /// 401, credential failed verification or expired.
    InvalidToken,
    /// 400 with a human-readable message (not-found by observed convention).
    Client(&'static str),
    Database(sqlx::Error),
    Internal(anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            Self::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [{ "msg": "Invalid Credentials" }] })),
            )
                .into_response(),
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "msg": "No token, authorization denied" })),
            )
                .into_response(),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "msg": "Token is not valid" })),
            )
                .into_response(),
            Self::Client(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
            }
            Self::Database(err) => {
                error!("Store error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
            Self::Internal(err) => {
                error!("Internal error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_response_shape() {
        let error = ApiError::Validation(vec![FieldError::new("Name is required", "name")]);
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["msg"], "Name is required");
        assert_eq!(json["errors"][0]["param"], "name");
    }

    #[tokio::test]
    async fn test_invalid_credentials_shape() {
        let response = ApiError::InvalidCredentials.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["msg"], "Invalid Credentials");
    }

    #[tokio::test]
    async fn test_missing_and_invalid_token_are_unauthorized() {
        let missing = ApiError::MissingToken.into_response();
        let invalid = ApiError::InvalidToken.into_response();

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_client_message_shape() {
        let response = ApiError::Client("There is no profile for this user").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["msg"], "There is no profile for this user");
    }

    #[tokio::test]
    async fn test_store_error_is_opaque() {
        let response = ApiError::Database(sqlx::Error::RowNotFound).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Server Error");
    }
}
