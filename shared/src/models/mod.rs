//! Data models
//!
//! Wire records of the property-management backend. Ids are Mongo-style
//! strings (`_id`); field names are camelCase on the wire.

pub mod booking;
pub mod checkout;
pub mod invoice;
pub mod kitchen;
pub mod laundry;
pub mod menu;
pub mod order;
pub mod room;
pub mod staff;

// Re-exports
pub use booking::*;
pub use checkout::*;
pub use invoice::*;
pub use kitchen::*;
pub use laundry::*;
pub use menu::*;
pub use order::*;
pub use room::*;
pub use staff::*;
