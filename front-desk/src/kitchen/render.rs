//! Plain-text kitchen ticket layout for 58mm / 80mm printers

use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};
use shared::models::Priority;

use super::merge::MergedOrder;
use super::tracker::KitchenBoard;
use crate::utils::TextBuilder;

/// Render a merged order as a kitchen ticket
pub fn render_ticket(order: &MergedOrder, width: usize) -> String {
    let mut b = TextBuilder::new(width);

    let title = if order.table_no.is_empty() {
        "KOT".to_string()
    } else {
        format!("KOT - Table {}", order.table_no)
    };
    b.center(&title);
    b.center(&format_timestamp(order.created_at));
    if matches!(order.priority, Priority::High | Priority::Urgent) {
        b.center(&format!("** {} **", order.priority.as_str().to_uppercase()));
    }
    b.sep_double();

    let ids: Vec<&str> = order.ticket_ids().map(short_id).collect();
    b.line_lr(&format!("Order #{}", short_id(&order.order_id)), &ids.join(","));
    b.sep_single();

    let qty_width = 4;
    let status_width = 9;
    let name_width = b.width().saturating_sub(qty_width + status_width + 2);
    for item in &order.items {
        let qty = format!("{}x", item.quantity);
        b.columns(&[
            (qty.as_str(), qty_width),
            (item.name.as_str(), name_width),
            (item.status.as_str(), status_width),
        ]);
        if let Some(note) = item.note.as_deref().filter(|n| !n.trim().is_empty()) {
            b.line(&format!("     > {}", note.trim()));
        }
    }

    b.sep_single();
    b.line_lr("Items", &order.item_count().to_string());
    let minutes = order.estimated_minutes();
    if minutes > 0.0 {
        b.line_lr("Est. time", &format!("{} min", minutes.ceil()));
    }
    b.sep_double();
    b.build()
}

/// Tickets already sent to the printer
///
/// Only ids still on the board are remembered.
#[derive(Debug, Default)]
pub struct PrintLog {
    printed: HashSet<String>,
}

impl PrintLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active orders carrying a ticket not printed yet, marked as printed
    pub fn take_unprinted<'a>(&mut self, board: &'a KitchenBoard) -> Vec<&'a MergedOrder> {
        let on_board: HashSet<&str> = board.entries().flat_map(|e| e.order.ticket_ids()).collect();
        self.printed.retain(|id| on_board.contains(id.as_str()));

        let mut fresh = Vec::new();
        for entry in &board.active {
            if entry.order.ticket_ids().any(|id| !self.printed.contains(id)) {
                self.printed.extend(entry.order.ticket_ids().map(str::to_string));
                fresh.push(&entry.order);
            }
        }
        fresh
    }

    pub fn len(&self) -> usize {
        self.printed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printed.is_empty()
    }
}

fn short_id(id: &str) -> &str {
    let start = id.len().saturating_sub(6);
    id.get(start..).unwrap_or(id)
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}
