//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend answered with another non-success status
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Client could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Map a non-success status and its body text
    pub fn from_status(status: http::StatusCode, text: String) -> Self {
        match status {
            http::StatusCode::UNAUTHORIZED => Self::Unauthorized(text),
            http::StatusCode::FORBIDDEN => Self::Forbidden(text),
            http::StatusCode::NOT_FOUND => Self::NotFound(text),
            _ => Self::Rejected {
                status: status.as_u16(),
                message: text,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => AppError::network(e.to_string()),
            ClientError::InvalidResponse(msg) => AppError::invalid_response(msg),
            ClientError::Serialization(e) => AppError::invalid_response(e.to_string()),
            ClientError::Unauthorized(msg) => {
                AppError::with_message(ErrorCode::NotAuthenticated, msg)
            }
            ClientError::Forbidden(msg) => AppError::permission_denied(msg),
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::Rejected { status, message } => {
                AppError::backend(message).with_detail("status", status)
            }
            ClientError::Config(msg) => AppError::with_message(ErrorCode::ConfigError, msg),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
