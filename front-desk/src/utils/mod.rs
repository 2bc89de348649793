//! Utilities - logging and fixed-width text layout

pub mod logger;
pub mod text;

pub use text::TextBuilder;
