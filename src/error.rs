use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::{ERR_TOO_MANY_SUBMISSIONS, RATE_LIMIT_WINDOW_MINUTES};

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Malformed form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Document not found")]
    DocumentNotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Link expired")]
    LinkExpired,
}

/// Implement IntoResponse to convert AppError into HTTP responses
///
/// Backend failures (database, storage) are logged server-side and surface
/// as a generic 500 with no internal detail. Rate-limit rejections carry an
/// advisory retryAfter equal to the window length in minutes.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Multipart(ref e) => {
                tracing::warn!("Malformed multipart body: {:?}", e);
                (StatusCode::BAD_REQUEST, "Malformed form data".to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::RateLimitExceeded => {
                let body = Json(json!({
                    "error": ERR_TOO_MANY_SUBMISSIONS,
                    "retryAfter": RATE_LIMIT_WINDOW_MINUTES,
                }));
                return (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            }
            AppError::ApplicationNotFound => {
                (StatusCode::NOT_FOUND, "Application not found".to_string())
            }
            AppError::DocumentNotFound => {
                (StatusCode::NOT_FOUND, "Document not found".to_string())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::InvalidSignature => (
                StatusCode::FORBIDDEN,
                "Invalid document link signature".to_string(),
            ),
            AppError::LinkExpired => {
                (StatusCode::FORBIDDEN, "Document link has expired".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_response_is_429() {
        let response = AppError::RateLimitExceeded.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_invalid_input_response_is_400() {
        let response = AppError::InvalidInput("Email too long".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_error_hides_detail() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
