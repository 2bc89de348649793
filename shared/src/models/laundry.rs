//! Laundry and vendor models

use serde::{Deserialize, Serialize};

use crate::util::{lenient_f64, string_or_number};

/// Laundry status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaundryStatus {
    #[default]
    Pending,
    #[serde(alias = "in_progress")]
    Processing,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Laundry order billed to a room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryOrder {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub room_number: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(alias = "laundryStatus", default)]
    pub status: LaundryStatus,
    #[serde(default)]
    pub vendor_id: Option<String>,
}

impl LaundryOrder {
    pub fn is_billable(&self) -> bool {
        self.status != LaundryStatus::Cancelled
    }
}

/// External service vendor (laundry contractors)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(alias = "vendorName", default)]
    pub name: String,
    #[serde(alias = "phoneNumber", default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
