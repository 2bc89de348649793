//! Checkout Model

use serde::{Deserialize, Serialize};

use super::laundry::LaundryOrder;
use super::order::{RestaurantOrder, ServiceOrder};
use crate::util::{lenient_f64, opt_lenient_f64};

/// Checkout record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStatus {
    #[default]
    Pending,
    Paid,
    #[serde(other)]
    Unknown,
}

/// Finalized billing record of a booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "object_id")]
    pub booking_id: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "opt_lenient_f64")]
    pub paid_amount: Option<f64>,
    #[serde(default)]
    pub status: CheckoutStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// A reference that may be populated into a full object
fn object_id<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Object(map) => map
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    })
}

/// `PUT /api/checkout/{id}/payment` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub status: CheckoutStatus,
    pub paid_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// `roomCharges` block of the charges aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCharges {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_room_charges: f64,
    #[serde(default, deserialize_with = "opt_lenient_f64")]
    pub extra_bed_charges: Option<f64>,
}

/// `summary` block of the charges aggregate, as computed by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSummary {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_restaurant_charges: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_service_charges: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_laundry_charges: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub subtotal: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cgst_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sgst_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_tax: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub grand_total: f64,
}

/// `GET /api/bookings/charges/booking/{id}` payload (`charges`)
///
/// Linked order lists are optional; when present they are summed locally
/// so cancelled orders can be excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCharges {
    #[serde(default)]
    pub room_charges: RoomCharges,
    #[serde(default)]
    pub summary: ChargeSummary,
    #[serde(default)]
    pub restaurant_orders: Option<Vec<RestaurantOrder>>,
    #[serde(default)]
    pub service_orders: Option<Vec<ServiceOrder>>,
    #[serde(default)]
    pub laundry_orders: Option<Vec<LaundryOrder>>,
}
