//! Restaurant order placement

pub mod submitter;

pub use submitter::{OrderDraft, OrderSubmitter};
