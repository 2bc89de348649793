//! Kitchen Order Ticket (KOT) Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::{OrderItem, OrderStatus};
use crate::util::{flexible_datetime, opt_lenient_f64, string_or_number};

/// Ticket-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Pending,
    /// Seen by the kitchen; ticket-only, never mirrored onto the order
    Acknowledged,
    Preparing,
    Ready,
    Served,
    Paid,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Acknowledged => "acknowledged",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
            Self::Paid => "paid",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Order status a ticket status propagates to
    ///
    /// Explicit allow-list: only pending, preparing, ready and served are
    /// mirrored onto the parent order.
    pub fn order_status(&self) -> Option<OrderStatus> {
        match self {
            Self::Pending => Some(OrderStatus::Pending),
            Self::Preparing => Some(OrderStatus::Preparing),
            Self::Ready => Some(OrderStatus::Ready),
            Self::Served => Some(OrderStatus::Served),
            _ => None,
        }
    }

    /// Ticket is off the live board
    pub fn is_history(&self) -> bool {
        matches!(self, Self::Served | Self::Paid | Self::Completed | Self::Cancelled)
    }

    /// Position in the kitchen flow; lower is less advanced
    pub fn progress(&self) -> u8 {
        match self {
            Self::Pending | Self::Unknown => 0,
            Self::Acknowledged => 1,
            Self::Preparing => 2,
            Self::Ready => 3,
            Self::Served => 4,
            Self::Paid => 5,
            Self::Completed => 6,
            Self::Cancelled => 7,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-item status inside a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    #[serde(alias = "delivered")]
    Served,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
        }
    }

    /// Only forward moves (or staying put) are allowed
    pub fn can_advance_to(&self, next: ItemStatus) -> bool {
        next >= *self
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{itemIndex, status}` entry of a ticket's status array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatusEntry {
    pub item_index: usize,
    pub status: ItemStatus,
}

/// `PATCH /api/kot/{id}/item-statuses` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatusUpdate {
    pub item_statuses: Vec<ItemStatusEntry>,
}

/// Ticket priority
///
/// Unrecognised or missing values read as normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Normal,
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde_json::Value;
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Self::parse(&s),
            _ => Self::Normal,
        })
    }
}

/// Kitchen-facing dispatch of some or all items of an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenTicket {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub table_no: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Sparse: items without an entry are pending
    #[serde(default)]
    pub item_statuses: Vec<ItemStatusEntry>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "chef_ref")]
    pub assigned_chef: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_f64")]
    pub estimated_time: Option<f64>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl KitchenTicket {
    /// Status of item `index`, defaulting to pending
    pub fn item_status(&self, index: usize) -> ItemStatus {
        self.item_statuses
            .iter()
            .rev()
            .find(|s| s.item_index == index)
            .map(|s| s.status)
            .unwrap_or_default()
    }
}

/// Assigned chef as an id, or the `_id` of a populated user record
fn chef_ref<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(map) => map.get("_id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    })
}

/// `POST /api/kot/create` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub order_id: String,
    pub table_no: String,
    pub items: Vec<OrderItem>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_chef: Option<String>,
}

/// `POST /api/notifications/create` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
    pub department: String,
    pub user_id: String,
}
