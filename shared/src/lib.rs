//! Shared types for the front-desk workspace
//!
//! Wire models exchanged with the property-management backend, the
//! unified error type, decimal money helpers and tolerant response
//! unwrapping used by both the HTTP client and the application crate.

pub mod error;
pub mod models;
pub mod money;
pub mod response;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use money::TaxRate;
