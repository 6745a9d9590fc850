//! Error type shared by all handlers and the API-key middleware.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ingest_events::StoreError;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Every variant renders as `{"error": "<reason>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The `X-API-Key` header is missing or does not match.
    #[error("invalid or missing api key")]
    Unauthorized,
    /// The request body is not structurally what the endpoint expects.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The input is well-formed but fails a semantic check.
    #[error("unprocessable input: {0}")]
    UnprocessableInput(String),
    /// The request body exceeds the configured size limit.
    #[error("request body too large")]
    PayloadTooLarge,
    /// No matching resource. Carries no detail so that "absent" and
    /// "present but the key does not match" render identically.
    #[error("not found")]
    NotFound,
    /// The database or connection pool failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(e: r2d2::Error) -> Self {
        ApiError::Storage(format!("db connection failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "invalid or missing api key".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnprocessableInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body too large".to_string(),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Storage(detail) => {
                tracing::error!(error = %detail, "storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
