//! PMS Client - HTTP client for the property-management backend
//!
//! Provides the transport trait, its reqwest implementation, the explicit
//! session object and a typed facade over the REST endpoints used by the
//! front desk.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::HotelApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{Session, SessionData};
