//! Kitchen order ticket (KOT) workflow
//!
//! - [`merge`] - per-order merging of tickets
//! - [`tracker`] - board refresh, status propagation, item updates
//! - [`alert`] - new-order alerts
//! - [`monitor`] - polling loop with push hints
//! - [`render`] - printable ticket text

pub mod alert;
pub mod merge;
pub mod monitor;
pub mod render;
pub mod tracker;

pub use alert::{AlertSink, LogAlertSink, NewOrderAlert};
pub use merge::{MergedItem, MergedOrder, Segment, group_status, merge_tickets, resolve_name};
pub use monitor::{KitchenMonitor, PushHint};
pub use render::{PrintLog, render_ticket};
pub use tracker::{BoardEntry, KitchenBoard, KotTracker, StatusChange};
