//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::{flexible_datetime, lenient_f64, opt_lenient_f64, opt_string_or_number, string_or_number};

/// Restaurant order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Paid,
    Completed,
    Cancelled,
    /// Anything this build does not know about
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
            Self::Paid => "paid",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Served, paid, completed and cancelled orders belong to history
    pub fn is_history(&self) -> bool {
        matches!(
            self,
            Self::Served | Self::Paid | Self::Completed | Self::Cancelled
        )
    }

    /// No further kitchen or billing transitions are expected
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line on an order or a kitchen ticket
///
/// Legacy records store bare item names instead of objects; those read as a
/// line with quantity 1 and no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOrderItem")]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(rename = "itemName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub is_free: bool,
    /// Catalog id some older screens wrote as `id` instead of `itemId`
    #[serde(skip_serializing)]
    pub legacy_id: Option<String>,
}

impl OrderItem {
    pub fn named(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: None,
            name: Some(name.into()),
            price: None,
            quantity,
            note: None,
            is_free: false,
            legacy_id: None,
        }
    }

    /// Explicit, non-blank name carried by the record itself
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Catalog id to look the line up by: `itemId`, else the legacy `id`
    pub fn catalog_id(&self) -> Option<&str> {
        self.item_id.as_deref().or(self.legacy_id.as_deref())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOrderItem {
    Name(String),
    Full(OrderItemFields),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemFields {
    #[serde(default)]
    item_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default)]
    item_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "rate", alias = "Price", default, deserialize_with = "opt_lenient_f64")]
    price: Option<f64>,
    #[serde(default, deserialize_with = "opt_lenient_f64")]
    quantity: Option<f64>,
    #[serde(alias = "notes", alias = "specialInstructions", default)]
    note: Option<String>,
    #[serde(default)]
    is_free: bool,
}

impl From<RawOrderItem> for OrderItem {
    fn from(raw: RawOrderItem) -> Self {
        match raw {
            RawOrderItem::Name(name) => OrderItem::named(name, 1),
            RawOrderItem::Full(f) => OrderItem {
                item_id: f.item_id.filter(|id| !id.is_empty()),
                name: f.item_name.filter(|n| !n.is_empty()).or(f.name),
                price: f.price,
                quantity: f
                    .quantity
                    .filter(|q| *q >= 1.0)
                    .map(|q| q as u32)
                    .unwrap_or(1),
                note: f.note.filter(|n| !n.is_empty()),
                is_free: f.is_free,
                legacy_id: f.id.filter(|id| !id.is_empty()),
            },
        }
    }
}

/// Placed restaurant or room-service order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantOrder {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub staff_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Table number or room number the order is delivered to
    #[serde(default, deserialize_with = "string_or_number")]
    pub table_no: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Items across every KOT raised for this order, when the backend tracks them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_kot_items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Fixed at submission, never recomputed
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    /// Older records carry the total here instead of `amount`
    #[serde(default, deserialize_with = "opt_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub discount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(alias = "mobileNo", default)]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RestaurantOrder {
    /// Billed amount, whichever field carries it
    pub fn billed_amount(&self) -> f64 {
        if self.amount != 0.0 {
            self.amount
        } else {
            self.total_amount.unwrap_or_default()
        }
    }

    /// Counts toward a bill unless cancelled
    pub fn is_billable(&self) -> bool {
        self.status != OrderStatus::Cancelled
    }
}

/// Line of an order creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub item_id: String,
    pub item_name: String,
    pub price: f64,
    pub quantity: u32,
    pub note: String,
}

/// `POST /api/restaurant-orders/create` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub staff_name: String,
    pub customer_name: String,
    pub table_no: String,
    pub items: Vec<OrderItemInput>,
    pub notes: String,
    pub amount: f64,
    pub discount: f64,
    pub is_membership: bool,
    pub is_loyalty: bool,
}

/// `{status}` body for the status PATCH endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

impl StatusUpdate {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Room-service order linked to a booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub room_number: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "opt_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub status: OrderStatus,
}

impl ServiceOrder {
    pub fn billed_amount(&self) -> f64 {
        if self.total_amount != 0.0 {
            self.total_amount
        } else {
            self.amount.unwrap_or_default()
        }
    }

    pub fn is_billable(&self) -> bool {
        self.status != OrderStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_status_unknown_and_history() {
        let s: OrderStatus = serde_json::from_value(json!("on_hold")).unwrap();
        assert_eq!(s, OrderStatus::Unknown);
        assert!(OrderStatus::Served.is_history());
        assert!(OrderStatus::Paid.is_history());
        assert!(!OrderStatus::Ready.is_history());
        assert!(!OrderStatus::Served.is_terminal());
    }

    #[test]
    fn test_order_item_shapes() {
        let items: Vec<OrderItem> = serde_json::from_value(json!([
            "Masala Dosa",
            {"itemId": "m1", "itemName": "Idli", "price": 40, "quantity": 2},
            {"itemId": "", "name": "Vada", "rate": "35", "quantity": 0, "note": ""}
        ]))
        .unwrap();
        assert_eq!(items[0].name.as_deref(), Some("Masala Dosa"));
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[1].item_id.as_deref(), Some("m1"));
        assert_eq!(items[1].price, Some(40.0));
        assert_eq!(items[2].item_id, None);
        assert_eq!(items[2].price, Some(35.0));
        assert_eq!(items[2].quantity, 1);
        assert_eq!(items[2].note, None);
    }

    #[test]
    fn test_restaurant_order_lenient_fields() {
        let order: RestaurantOrder = serde_json::from_value(json!({
            "_id": "o1",
            "tableNo": 12,
            "totalAmount": "250",
            "status": "preparing",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(order.table_no, "12");
        assert_eq!(order.amount, 0.0);
        assert_eq!(order.billed_amount(), 250.0);
        assert_eq!(order.status, OrderStatus::Preparing);
        assert!(order.created_at.is_some());
        assert!(order.is_billable());
    }

    #[test]
    fn test_create_request_wire_names() {
        let req = CreateOrderRequest {
            staff_name: "Asha".into(),
            customer_name: "Guest".into(),
            table_no: "12".into(),
            items: vec![OrderItemInput {
                item_id: "m1".into(),
                item_name: "Tea".into(),
                price: 20.0,
                quantity: 2,
                note: String::new(),
            }],
            notes: String::new(),
            amount: 40.0,
            discount: 0.0,
            is_membership: false,
            is_loyalty: false,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["tableNo"], "12");
        assert_eq!(v["items"][0]["itemName"], "Tea");
        assert_eq!(v["isMembership"], false);
    }
}
