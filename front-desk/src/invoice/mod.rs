//! Invoices
//!
//! - [`document`] - invoice projection of an order or booking bill
//! - [`profile`] - GSTIN-keyed client profiles
//! - [`render`] - printable text layout

pub mod document;
pub mod profile;
pub mod render;

pub use document::{Invoice, InvoiceHeader, InvoiceKind, InvoiceLine, OtherCharge, TaxRow};
pub use profile::ClientProfiles;
pub use render::render_invoice;
