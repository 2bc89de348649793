//! Application error type

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every failure surfaced by the workspace is an `AppError`:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages, suitable for a toast
/// - Optional structured details for logs
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a detail entry
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// True for errors detected locally before any request was issued
    pub fn is_validation(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ValidationFailed
                | ErrorCode::InvalidRequest
                | ErrorCode::RequiredField
                | ErrorCode::ValueOutOfRange
                | ErrorCode::RoomInspectionRequired
                | ErrorCode::CheckoutStepInvalid
                | ErrorCode::CheckoutNotLoaded
                | ErrorCode::CartEmpty
                | ErrorCode::DestinationMissing
                | ErrorCode::SubmissionInFlight
                | ErrorCode::ItemNotFound
                | ErrorCode::PaymentInvalidAmount
                | ErrorCode::PaymentInsufficientAmount
                | ErrorCode::CheckoutAlreadyPaid
                | ErrorCode::ItemStatusRegression
                | ErrorCode::ItemIndexOutOfRange
                | ErrorCode::GstinRequired
        )
    }

    /// True for "does not exist" answers, local or remote
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::NotFound
                | ErrorCode::BookingNotFound
                | ErrorCode::CheckoutNotFound
                | ErrorCode::OrderNotFound
                | ErrorCode::TicketNotFound
        )
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a backend rejection error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::BackendRejected, msg)
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NetworkError, msg)
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidResponse, msg)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_response(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::CartEmpty);
        assert_eq!(err.code, ErrorCode::CartEmpty);
        assert_eq!(err.message, "Please add items to cart first");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "tableNo")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.detail("field").unwrap(), "tableNo");
        assert_eq!(err.detail("reason").unwrap(), "required");
        assert!(err.detail("missing").is_none());
    }

    #[test]
    fn test_validation_vs_backend() {
        assert!(AppError::new(ErrorCode::DestinationMissing).is_validation());
        assert!(AppError::new(ErrorCode::GstinRequired).is_validation());
        assert!(!AppError::backend("500").is_validation());
        assert!(!AppError::network("timeout").is_validation());
        assert_eq!(AppError::backend("x").category(), ErrorCategory::System);
    }

    #[test]
    fn test_not_found_family() {
        assert!(AppError::not_found("Booking").is_not_found());
        assert!(AppError::new(ErrorCode::CheckoutNotFound).is_not_found());
        assert!(!AppError::new(ErrorCode::CartEmpty).is_not_found());
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 42 not found");
        assert_eq!(format!("{}", err), "Order 42 not found");
    }

    #[test]
    fn test_serde_error_becomes_invalid_response() {
        let parse: Result<u32, _> = serde_json::from_str("\"x\"");
        let err: AppError = parse.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidResponse);
    }
}
