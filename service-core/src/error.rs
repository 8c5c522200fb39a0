use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body exceeds the allowed size";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

/// JSON body of every error response: `{"error": ..., "message": ...}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new("Internal Server Error", INTERNAL_ERROR_MESSAGE)
    }
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::BadRequest(message) => ErrorResponse::new("Bad Request", message),
            AppError::NotFound => ErrorResponse::new("Not Found", NOT_FOUND_MESSAGE),
            AppError::PayloadTooLarge => {
                ErrorResponse::new("Payload Too Large", PAYLOAD_TOO_LARGE_MESSAGE)
            }
            AppError::InternalError(err) | AppError::ConfigError(err) => {
                // Details stay in the logs; the span carries method, uri and request id.
                tracing::error!(error = %err, details = ?err, "Unhandled error");
                ErrorResponse::internal()
            }
        };

        (status, Json(body)).into_response()
    }
}
