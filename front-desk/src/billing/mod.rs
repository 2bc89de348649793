//! Checkout and billing
//!
//! - [`charges`] - bill aggregation with CGST/SGST and round-off
//! - [`extra_bed`] - extra bed nights and charges
//! - [`checkout`] - Review → Payment → Complete wizard

pub mod charges;
pub mod checkout;
pub mod extra_bed;

pub use charges::{BillingSummary, ChargeInputs, summarize};
pub use checkout::{CheckoutReview, CheckoutStep, CheckoutWizard, PaymentPolicy, PaymentReceipt, RefreshSignal};
pub use extra_bed::{extra_bed_charge, extra_bed_nights};
