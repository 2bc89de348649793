//! Unified error codes for the front-desk workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Booking / checkout errors
//! - 4xxx: Order and cart errors
//! - 5xxx: Payment errors
//! - 6xxx: Kitchen ticket errors
//! - 7xxx: Invoice errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the same numbers can be shown in
/// logs and toasts regardless of which component raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Booking ====================
    /// Booking not found (direct lookup and listing scan both failed)
    BookingNotFound = 3001,
    /// Checkout record not found
    CheckoutNotFound = 3002,
    /// Room inspection must be acknowledged before payment
    RoomInspectionRequired = 3003,
    /// Checkout wizard is not in the step required by the action
    CheckoutStepInvalid = 3004,
    /// Checkout charges have not been loaded yet
    CheckoutNotLoaded = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Cart has no items
    CartEmpty = 4002,
    /// No room or table selected for the order
    DestinationMissing = 4003,
    /// An order submission is already in flight
    SubmissionInFlight = 4004,
    /// Menu item not found in cart or catalog
    ItemNotFound = 4005,

    // ==================== 5xxx: Payment ====================
    /// Payment amount is not a positive number
    PaymentInvalidAmount = 5001,
    /// Payment is below the balance due and partial payment is disabled
    PaymentInsufficientAmount = 5002,
    /// Checkout has already been paid
    CheckoutAlreadyPaid = 5003,

    // ==================== 6xxx: Kitchen ====================
    /// Kitchen ticket not found
    TicketNotFound = 6001,
    /// Item status may only move forward
    ItemStatusRegression = 6002,
    /// Item index outside the ticket's item list
    ItemIndexOutOfRange = 6003,
    /// Ticket status was written but the order status was not
    StatusPropagationFailed = 6004,

    // ==================== 7xxx: Invoice ====================
    /// A valid GST number is required
    GstinRequired = 7001,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network / transport error talking to the backend
    NetworkError = 9002,
    /// Backend rejected the request (4xx/5xx)
    BackendRejected = 9003,
    /// Backend response could not be understood
    InvalidResponse = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::CheckoutNotFound => "Checkout record not found",
            ErrorCode::RoomInspectionRequired => "Room inspection must be confirmed first",
            ErrorCode::CheckoutStepInvalid => "Action not available in the current checkout step",
            ErrorCode::CheckoutNotLoaded => "Checkout charges have not been loaded",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::CartEmpty => "Please add items to cart first",
            ErrorCode::DestinationMissing => "Please select a room or table",
            ErrorCode::SubmissionInFlight => "Order is already being placed",
            ErrorCode::ItemNotFound => "Item not found",

            // Payment
            ErrorCode::PaymentInvalidAmount => "Please enter a valid payment amount",
            ErrorCode::PaymentInsufficientAmount => "Payment is less than the balance due",
            ErrorCode::CheckoutAlreadyPaid => "Checkout has already been paid",

            // Kitchen
            ErrorCode::TicketNotFound => "Kitchen ticket not found",
            ErrorCode::ItemStatusRegression => "Item status cannot move backwards",
            ErrorCode::ItemIndexOutOfRange => "Item index is out of range",
            ErrorCode::StatusPropagationFailed => "Ticket updated but order status update failed",

            // Invoice
            ErrorCode::GstinRequired => "Valid GST Number is required to save details",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::BackendRejected => "Request was rejected by the server",
            ErrorCode::InvalidResponse => "Unexpected response from the server",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),

            2001 => Ok(ErrorCode::PermissionDenied),

            3001 => Ok(ErrorCode::BookingNotFound),
            3002 => Ok(ErrorCode::CheckoutNotFound),
            3003 => Ok(ErrorCode::RoomInspectionRequired),
            3004 => Ok(ErrorCode::CheckoutStepInvalid),
            3005 => Ok(ErrorCode::CheckoutNotLoaded),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::CartEmpty),
            4003 => Ok(ErrorCode::DestinationMissing),
            4004 => Ok(ErrorCode::SubmissionInFlight),
            4005 => Ok(ErrorCode::ItemNotFound),

            5001 => Ok(ErrorCode::PaymentInvalidAmount),
            5002 => Ok(ErrorCode::PaymentInsufficientAmount),
            5003 => Ok(ErrorCode::CheckoutAlreadyPaid),

            6001 => Ok(ErrorCode::TicketNotFound),
            6002 => Ok(ErrorCode::ItemStatusRegression),
            6003 => Ok(ErrorCode::ItemIndexOutOfRange),
            6004 => Ok(ErrorCode::StatusPropagationFailed),

            7001 => Ok(ErrorCode::GstinRequired),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::NetworkError),
            9003 => Ok(ErrorCode::BackendRejected),
            9004 => Ok(ErrorCode::InvalidResponse),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
