//! Core module - configuration and process setup
//!
//! - [`Config`] - environment-driven settings

pub mod config;

pub use config::Config;
