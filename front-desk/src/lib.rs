//! Front desk - restaurant ordering, kitchen tickets and checkout billing
//!
//! # Modules
//!
//! ```text
//! front-desk/src/
//! ├── core/      # configuration
//! ├── utils/     # logging, fixed-width text
//! ├── catalog    # menu, rooms, tables, vendors, chefs
//! ├── cart       # in-progress order
//! ├── orders/    # order submission
//! ├── kitchen/   # KOT merge, tracker, alerts, monitor, ticket text
//! ├── billing/   # charge aggregation and checkout wizard
//! └── invoice/   # invoice projection, client profiles, invoice text
//! ```
//!
//! Every component talks to the backend through [`pms_client::HotelApi`],
//! generic over the transport so tests run against a scripted client.

pub mod billing;
pub mod cart;
pub mod catalog;
pub mod core;
pub mod invoice;
pub mod kitchen;
pub mod orders;
pub mod utils;

// Re-exports
pub use billing::{BillingSummary, CheckoutStep, CheckoutWizard, PaymentPolicy};
pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogReader};
pub use crate::core::Config;
pub use invoice::{ClientProfiles, Invoice, render_invoice};
pub use kitchen::{KitchenBoard, KitchenMonitor, KotTracker, LogAlertSink, PushHint, render_ticket};
pub use orders::{OrderDraft, OrderSubmitter};
pub use utils::logger::{init_logger, init_logger_with_file};
