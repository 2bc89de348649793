//! Merging kitchen tickets per order
//!
//! An order may be dispatched to the kitchen as several tickets. For display
//! they are merged into one item list: items are concatenated in fetch
//! order and each ticket's item indices are shifted by the running item
//! count. The segment table keeps the mapping back to `(ticket, local index)`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use shared::models::{ItemStatus, KitchenTicket, MenuItem, OrderItem, Priority, TicketStatus};
use shared::money;

use crate::catalog::{find_by_id, find_by_name};

/// Display name when no tier resolves one
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Index range of one ticket inside the merged item list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub ticket_id: String,
    pub offset: usize,
    pub len: usize,
    pub status: TicketStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedItem {
    pub item_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub note: Option<String>,
    pub price: f64,
    /// Minutes, from the catalog
    pub prep_time: f64,
    pub is_free: bool,
    pub status: ItemStatus,
}

/// All tickets of one order, presented as one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedOrder {
    pub order_id: String,
    pub table_no: String,
    pub segments: Vec<Segment>,
    pub items: Vec<MergedItem>,
    pub status: TicketStatus,
    pub priority: Priority,
    pub assigned_chef: Option<String>,
    /// Newest ticket timestamp
    pub created_at: Option<DateTime<Utc>>,
    pub amount: Decimal,
}

impl MergedOrder {
    pub fn ticket_ids(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.ticket_id.as_str())
    }

    pub fn contains_ticket(&self, ticket_id: &str) -> bool {
        self.segments.iter().any(|s| s.ticket_id == ticket_id)
    }

    /// Merged index → `(ticket id, local index)`
    pub fn locate(&self, index: usize) -> Option<(&str, usize)> {
        self.segments
            .iter()
            .find(|s| index >= s.offset && index < s.offset + s.len)
            .map(|s| (s.ticket_id.as_str(), index - s.offset))
    }

    /// Per-item statuses in merged order
    pub fn statuses(&self) -> Vec<ItemStatus> {
        self.items.iter().map(|i| i.status).collect()
    }

    /// Longest catalog preparation time among the items
    pub fn estimated_minutes(&self) -> f64 {
        self.items.iter().map(|i| i.prep_time).fold(0.0, f64::max)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Recompute the group status after a ticket status changed locally
    pub fn set_ticket_status(&mut self, ticket_id: &str, status: TicketStatus) -> bool {
        let mut changed = false;
        for segment in self.segments.iter_mut().filter(|s| s.ticket_id == ticket_id) {
            segment.status = status;
            changed = true;
        }
        if changed {
            self.status = group_status(self.segments.iter().map(|s| s.status));
        }
        changed
    }
}

/// Display name of a ticket item
///
/// Explicit name on the item (in the catalog's spelling when a catalog
/// entry has an equal name), then catalog lookup by id, then
/// [`UNKNOWN_ITEM`].
pub fn resolve_name(item: &OrderItem, menu: &[MenuItem]) -> String {
    if let Some(name) = item.explicit_name() {
        return find_by_name(menu, name)
            .map(|found| found.name.clone())
            .unwrap_or_else(|| name.to_string());
    }
    if let Some(found) = item.catalog_id().and_then(|id| find_by_id(menu, id)) {
        return found.name.clone();
    }
    UNKNOWN_ITEM.to_string()
}

fn catalog_entry<'a>(item: &OrderItem, menu: &'a [MenuItem]) -> Option<&'a MenuItem> {
    item.catalog_id()
        .and_then(|id| find_by_id(menu, id))
        .or_else(|| item.explicit_name().and_then(|name| find_by_name(menu, name)))
}

/// Status shown for a group of tickets
///
/// The least advanced non-cancelled ticket wins, so a group only reads
/// "ready" once every live ticket is ready. All cancelled means cancelled.
pub fn group_status(statuses: impl IntoIterator<Item = TicketStatus>) -> TicketStatus {
    let mut any = false;
    let mut least: Option<TicketStatus> = None;
    for status in statuses {
        any = true;
        if status == TicketStatus::Cancelled {
            continue;
        }
        if least.is_none_or(|l| status.progress() < l.progress()) {
            least = Some(status);
        }
    }
    match least {
        Some(status) => status,
        None if any => TicketStatus::Cancelled,
        None => TicketStatus::Pending,
    }
}

fn merge_group(tickets: &[&KitchenTicket], menu: &[MenuItem]) -> MergedOrder {
    let mut segments = Vec::with_capacity(tickets.len());
    let mut items = Vec::new();

    for ticket in tickets {
        let offset = items.len();
        for (local, item) in ticket.items.iter().enumerate() {
            let entry = catalog_entry(item, menu);
            items.push(MergedItem {
                item_id: item.catalog_id().map(str::to_string),
                name: resolve_name(item, menu),
                quantity: item.quantity,
                note: item.note.clone(),
                price: item
                    .price
                    .or_else(|| entry.map(|m| m.price))
                    .unwrap_or_default(),
                prep_time: entry.map(|m| m.prep_time).unwrap_or_default(),
                is_free: item.is_free,
                status: ticket.item_status(local),
            });
        }
        segments.push(Segment {
            ticket_id: ticket.id.clone(),
            offset,
            len: ticket.items.len(),
            status: ticket.status,
        });
    }

    let amount = items
        .iter()
        .filter(|i| !i.is_free)
        .map(|i| money::line_total(i.price, i.quantity))
        .sum();

    let first = tickets.first();
    MergedOrder {
        order_id: first.map(|t| t.order_id.clone()).unwrap_or_default(),
        table_no: tickets
            .iter()
            .map(|t| t.table_no.as_str())
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string(),
        status: group_status(tickets.iter().map(|t| t.status)),
        priority: tickets.iter().map(|t| t.priority).max().unwrap_or_default(),
        assigned_chef: tickets.iter().find_map(|t| t.assigned_chef.clone()),
        created_at: tickets.iter().filter_map(|t| t.created_at).max(),
        segments,
        items,
        amount,
    }
}

/// Group tickets by order id, keeping first-seen order
pub fn merge_tickets(tickets: &[KitchenTicket], menu: &[MenuItem]) -> Vec<MergedOrder> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&KitchenTicket>> = Vec::new();

    for ticket in tickets {
        // Tickets without an order id stay on their own
        let key = if ticket.order_id.is_empty() {
            ticket.id.as_str()
        } else {
            ticket.order_id.as_str()
        };
        match index.get(key) {
            Some(&pos) => groups[pos].push(ticket),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![ticket]);
            }
        }
    }

    groups
        .iter()
        .map(|group| merge_group(group, menu))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::ItemStatusEntry;

    fn ticket(id: &str, order_id: &str, items: usize, status: TicketStatus) -> KitchenTicket {
        KitchenTicket {
            id: id.into(),
            order_id: order_id.into(),
            table_no: "4".into(),
            items: (0..items)
                .map(|i| OrderItem::named(format!("{}-{}", id, i), 1))
                .collect(),
            status,
            ..Default::default()
        }
    }

    fn menu() -> Vec<MenuItem> {
        serde_json::from_value(json!([
            {"_id": "m1", "name": "Veg Biryani", "price": 180, "prepTime": 20},
            {"_id": "m2", "name": "Lassi", "price": 60, "prepTime": 5}
        ]))
        .unwrap()
    }

    #[test]
    fn test_offsets_keep_indices_unique() {
        let a = ticket("A", "X", 2, TicketStatus::Pending);
        let mut b = ticket("B", "X", 1, TicketStatus::Ready);
        b.item_statuses = vec![ItemStatusEntry {
            item_index: 0,
            status: ItemStatus::Ready,
        }];

        let merged = merge_tickets(&[a, b], &[]);
        assert_eq!(merged.len(), 1);
        let order = &merged[0];
        assert_eq!(order.items.len(), 3);
        assert_eq!(
            order.statuses(),
            vec![ItemStatus::Pending, ItemStatus::Pending, ItemStatus::Ready]
        );
        assert_eq!(order.locate(0), Some(("A", 0)));
        assert_eq!(order.locate(2), Some(("B", 0)));
        assert_eq!(order.locate(3), None);
    }

    #[test]
    fn test_every_status_recoverable_after_offset() {
        let mut tickets = Vec::new();
        for (t, n) in [3usize, 1, 4].iter().enumerate() {
            let mut tk = ticket(&format!("T{}", t), "X", *n, TicketStatus::Preparing);
            tk.item_statuses = (0..*n)
                .map(|i| ItemStatusEntry {
                    item_index: i,
                    status: if (i + t) % 2 == 0 {
                        ItemStatus::Ready
                    } else {
                        ItemStatus::Preparing
                    },
                })
                .collect();
            tickets.push(tk);
        }

        let merged = &merge_tickets(&tickets, &[])[0];
        assert_eq!(merged.items.len(), 8);
        for (i, item) in merged.items.iter().enumerate() {
            let (ticket_id, local) = merged.locate(i).unwrap();
            let source = tickets.iter().find(|t| t.id == ticket_id).unwrap();
            assert_eq!(item.status, source.item_status(local));
        }
    }

    #[test]
    fn test_name_resolution_tiers() {
        let menu = menu();
        let explicit: OrderItem = serde_json::from_value(json!({"itemName": "Chef Special"})).unwrap();
        let by_id: OrderItem = serde_json::from_value(json!({"itemId": "m2"})).unwrap();
        let nothing: OrderItem = serde_json::from_value(json!({"itemId": "zz"})).unwrap();

        assert_eq!(resolve_name(&explicit, &menu), "Chef Special");
        assert_eq!(resolve_name(&by_id, &menu), "Lassi");
        assert_eq!(resolve_name(&nothing, &menu), UNKNOWN_ITEM);
    }

    #[test]
    fn test_name_resolution_through_catalog() {
        let menu = menu();
        let spelled: OrderItem = serde_json::from_value(json!({"name": "  lassi "})).unwrap();
        let legacy: OrderItem = serde_json::from_value(json!({"id": "m2", "quantity": 1})).unwrap();

        assert_eq!(resolve_name(&spelled, &menu), "Lassi");
        assert_eq!(resolve_name(&legacy, &menu), "Lassi");
        assert_eq!(catalog_entry(&legacy, &menu).map(|m| m.id.as_str()), Some("m2"));
        assert_eq!(catalog_entry(&spelled, &menu).map(|m| m.id.as_str()), Some("m2"));
    }

    #[test]
    fn test_price_and_amount_from_catalog() {
        let mut t = ticket("A", "X", 0, TicketStatus::Pending);
        t.items = serde_json::from_value(json!([
            {"itemId": "m1", "quantity": 2},
            {"itemId": "m2", "quantity": 1, "price": 50},
            {"itemId": "m2", "quantity": 1, "isFree": true}
        ]))
        .unwrap();
        let merged = &merge_tickets(&[t], &menu())[0];
        assert_eq!(merged.items[0].price, 180.0);
        assert_eq!(merged.items[1].price, 50.0);
        assert_eq!(merged.amount, Decimal::from(410));
        assert_eq!(merged.estimated_minutes(), 20.0);
    }

    #[test]
    fn test_group_status_least_advanced_wins() {
        use TicketStatus::*;
        assert_eq!(group_status([Ready, Preparing, Served]), Preparing);
        assert_eq!(group_status([Cancelled, Ready]), Ready);
        assert_eq!(group_status([Cancelled, Cancelled]), Cancelled);
        assert_eq!(group_status([]), Pending);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let tickets = vec![
            ticket("1", "B", 1, TicketStatus::Pending),
            ticket("2", "A", 1, TicketStatus::Pending),
            ticket("3", "B", 1, TicketStatus::Ready),
        ];
        let merged = merge_tickets(&tickets, &[]);
        let ids: Vec<&str> = merged.iter().map(|m| m.order_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(merged[0].ticket_ids().collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(merged[0].status, TicketStatus::Pending);
    }
}
