//! KOT status tracker
//!
//! Fetches tickets, orders and the menu, merges tickets per order and splits
//! the result into an active board and a history list. Status changes are
//! written to the ticket first and then, for allow-listed statuses, to the
//! parent order. The two writes are independent: a failure of the second is
//! reported and nothing is rolled back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use pms_client::{HotelApi, HttpClient};
use shared::models::{
    CreateTicketRequest, ItemStatus, ItemStatusEntry, KitchenTicket, MenuItem,
    NotificationRequest, OrderStatus, Priority, RestaurantOrder, StaffMember, TicketStatus,
};
use shared::{AppError, AppResult, ErrorCode};

use super::alert::{AlertSink, AlertSlot, NewOrderAlert, NoopAlertSink};
use super::merge::{MergedOrder, merge_tickets};
use crate::catalog::find_by_id;

/// One merged order on the board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntry {
    #[serde(flatten)]
    pub order: MergedOrder,
    /// Status of the parent order, when it was found
    pub order_status: Option<OrderStatus>,
    pub customer_name: Option<String>,
}

impl BoardEntry {
    /// Served, paid, completed or cancelled ticket, or a terminal parent order
    pub fn is_history(&self) -> bool {
        self.order.status.is_history() || self.order_status.is_some_and(|s| s.is_terminal())
    }
}

/// Kitchen board snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenBoard {
    pub active: Vec<BoardEntry>,
    pub history: Vec<BoardEntry>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl KitchenBoard {
    pub fn entries(&self) -> impl Iterator<Item = &BoardEntry> {
        self.active.iter().chain(self.history.iter())
    }

    pub fn find(&self, order_id: &str) -> Option<&BoardEntry> {
        self.entries().find(|e| e.order.order_id == order_id)
    }

    pub fn find_by_ticket(&self, ticket_id: &str) -> Option<&BoardEntry> {
        self.entries().find(|e| e.order.contains_ticket(ticket_id))
    }

    fn from_entries(entries: Vec<BoardEntry>, refreshed_at: Option<DateTime<Utc>>) -> Self {
        let (history, active) = entries.into_iter().partition(BoardEntry::is_history);
        Self {
            active,
            history,
            refreshed_at,
        }
    }

    fn reclassify(&mut self) {
        let entries: Vec<BoardEntry> = self.active.drain(..).chain(self.history.drain(..)).collect();
        *self = Self::from_entries(entries, self.refreshed_at);
    }
}

/// Result of a status update
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub ticket_id: String,
    pub ticket_status: TicketStatus,
    /// Set when the status was also written to the order
    pub order_status: Option<OrderStatus>,
}

pub struct KotTracker<H> {
    api: HotelApi<H>,
    sink: Arc<dyn AlertSink>,
    alert_ttl: Duration,
    alerts: AlertSlot,
    last_seen: Mutex<Option<usize>>,
    board: RwLock<KitchenBoard>,
}

impl<H: HttpClient> KotTracker<H> {
    pub fn new(api: HotelApi<H>) -> Self {
        Self {
            api,
            sink: Arc::new(NoopAlertSink),
            alert_ttl: Duration::from_secs(10),
            alerts: AlertSlot::default(),
            last_seen: Mutex::new(None),
            board: RwLock::new(KitchenBoard::default()),
        }
    }

    pub fn with_alerts(mut self, sink: Arc<dyn AlertSink>, ttl: Duration) -> Self {
        self.sink = sink;
        self.alert_ttl = ttl;
        self
    }

    pub fn api(&self) -> &HotelApi<H> {
        &self.api
    }

    /// Last published board
    pub fn board(&self) -> KitchenBoard {
        self.board.read().clone()
    }

    /// Visible new-order alert, if not expired
    pub fn current_alert(&self) -> Option<NewOrderAlert> {
        self.alerts.current()
    }

    pub fn dismiss_alert(&self) -> Option<NewOrderAlert> {
        self.alerts.take()
    }

    /// Re-fetch and rebuild the board
    ///
    /// Tickets are authoritative and their failure fails the refresh. Orders
    /// and menu degrade to empty: names fall back and order statuses are
    /// simply unknown.
    pub async fn refresh(&self) -> AppResult<KitchenBoard> {
        let (tickets, orders, menu) = tokio::join!(
            self.api.tickets(),
            self.api.orders(),
            self.api.menu_items()
        );
        let tickets = tickets.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to fetch kitchen tickets");
        })?;
        let orders = orders.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Orders unavailable, board shows ticket status only");
            Vec::new()
        });
        let menu = menu.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Menu unavailable, item names may be unresolved");
            Vec::new()
        });

        let board = build_board(&tickets, &orders, &menu);
        tracing::debug!(
            tickets = tickets.len(),
            active = board.active.len(),
            history = board.history.len(),
            "Kitchen board refreshed"
        );

        self.detect_new(&tickets);
        *self.board.write() = board.clone();
        Ok(board)
    }

    /// Count-growth heuristic: the newest ticket is announced when the
    /// count went up since the previous refresh. The first refresh only sets
    /// the baseline.
    fn detect_new(&self, tickets: &[KitchenTicket]) -> Option<NewOrderAlert> {
        let count = tickets.len();
        let previous = self.last_seen.lock().replace(count);
        let grew = previous.is_some_and(|prev| count > prev);
        if !grew {
            return None;
        }

        let newest = tickets.iter().max_by_key(|t| t.created_at)?;
        let alert = NewOrderAlert {
            ticket_id: newest.id.clone(),
            order_id: newest.order_id.clone(),
            table_no: newest.table_no.clone(),
            created_at: newest.created_at,
            raised_at: Instant::now(),
            ttl: self.alert_ttl,
        };
        self.alerts.set(alert.clone());
        self.sink.notify(&alert);
        self.sink.chime();
        Some(alert)
    }

    /// Set a ticket's status and mirror allow-listed statuses onto the order
    pub async fn update_status(
        &self,
        ticket_id: &str,
        order_id: &str,
        status: TicketStatus,
    ) -> AppResult<StatusChange> {
        if status == TicketStatus::Unknown {
            return Err(AppError::validation("Unknown ticket status"));
        }

        self.api
            .update_ticket_status(ticket_id, status)
            .await
            .inspect_err(|e| {
                tracing::error!(ticket_id, status = %status, error = %e, "Ticket status update failed");
            })?;
        self.apply_ticket_status(ticket_id, status);
        tracing::info!(ticket_id, status = %status, "Ticket status updated");

        let mut change = StatusChange {
            ticket_id: ticket_id.to_string(),
            ticket_status: status,
            order_status: None,
        };

        let Some(order_status) = status.order_status() else {
            return Ok(change);
        };
        if order_id.is_empty() {
            tracing::warn!(ticket_id, "Ticket has no parent order, status not propagated");
            return Ok(change);
        }

        match self.api.update_order_status(order_id, order_status).await {
            Ok(()) => {
                self.apply_order_status(order_id, order_status);
                change.order_status = Some(order_status);
                Ok(change)
            }
            Err(e) => {
                tracing::error!(ticket_id, order_id, error = %e, "Ticket updated but order status propagation failed");
                Err(AppError::with_message(
                    ErrorCode::StatusPropagationFailed,
                    format!("Ticket updated but order status was not: {}", e.message),
                )
                .with_detail("ticket_id", ticket_id)
                .with_detail("order_id", order_id)
                .with_detail("status", order_status.as_str()))
            }
        }
    }

    /// Forward-only per-item updates, addressed by merged index
    ///
    /// Each affected ticket receives its full status array with local
    /// indices. Nothing is sent when any update is invalid.
    pub async fn mark_items(&self, order_id: &str, updates: &[(usize, ItemStatus)]) -> AppResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let plan = {
            let board = self.board.read();
            let entry = board.find(order_id).ok_or_else(|| {
                AppError::new(ErrorCode::TicketNotFound).with_detail("order_id", order_id)
            })?;
            plan_item_updates(&entry.order, updates)?
        };

        for (ticket_id, entries) in plan {
            self.api
                .update_item_statuses(&ticket_id, entries.clone())
                .await
                .inspect_err(|e| {
                    tracing::error!(ticket_id = %ticket_id, error = %e, "Item status update failed");
                })?;
            self.apply_item_statuses(&ticket_id, &entries);
            tracing::info!(ticket_id = %ticket_id, items = entries.len(), "Item statuses updated");
        }
        Ok(())
    }

    /// Dispatch an order to the kitchen, notifying the assigned chef
    ///
    /// The notification is best-effort; its failure is only logged.
    pub async fn create_ticket(
        &self,
        order: &RestaurantOrder,
        priority: Priority,
        chef: Option<&StaffMember>,
        menu: &[MenuItem],
    ) -> AppResult<KitchenTicket> {
        let request = ticket_request(order, priority, chef, menu);
        let ticket = self.api.create_ticket(&request).await.inspect_err(|e| {
            tracing::error!(order_id = %order.id, error = %e, "Failed to create kitchen ticket");
        })?;
        tracing::info!(ticket_id = %ticket.id, order_id = %order.id, "Kitchen ticket created");

        if let Some(chef) = chef {
            let notification = NotificationRequest {
                title: "New KOT Assigned".into(),
                message: format!(
                    "Table {}: {} item(s) assigned to you",
                    request.table_no,
                    request.items.len()
                ),
                kind: "kot".into(),
                priority,
                department: "kitchen".into(),
                user_id: chef.id.clone(),
            };
            if let Err(e) = self.api.notify(&notification).await {
                tracing::warn!(chef = %chef.display_name(), error = %e, "Chef notification failed");
            }
        }
        Ok(ticket)
    }

    fn apply_ticket_status(&self, ticket_id: &str, status: TicketStatus) {
        let mut guard = self.board.write();
        let board = &mut *guard;
        let mut changed = false;
        for entry in board.active.iter_mut().chain(board.history.iter_mut()) {
            changed |= entry.order.set_ticket_status(ticket_id, status);
        }
        if changed {
            board.reclassify();
        }
    }

    fn apply_order_status(&self, order_id: &str, status: OrderStatus) {
        let mut guard = self.board.write();
        let board = &mut *guard;
        for entry in board.active.iter_mut().chain(board.history.iter_mut()) {
            if entry.order.order_id == order_id {
                entry.order_status = Some(status);
            }
        }
        board.reclassify();
    }

    fn apply_item_statuses(&self, ticket_id: &str, entries: &[ItemStatusEntry]) {
        let mut guard = self.board.write();
        let board = &mut *guard;
        for entry in board.active.iter_mut().chain(board.history.iter_mut()) {
            let Some(segment) = entry.order.segments.iter().find(|s| s.ticket_id == ticket_id) else {
                continue;
            };
            let offset = segment.offset;
            let len = segment.len;
            for e in entries.iter().filter(|e| e.item_index < len) {
                if let Some(item) = entry.order.items.get_mut(offset + e.item_index) {
                    item.status = e.status;
                }
            }
        }
    }
}

fn build_board(tickets: &[KitchenTicket], orders: &[RestaurantOrder], menu: &[MenuItem]) -> KitchenBoard {
    let by_id: HashMap<&str, &RestaurantOrder> = orders.iter().map(|o| (o.id.as_str(), o)).collect();
    let entries = merge_tickets(tickets, menu)
        .into_iter()
        .map(|order| {
            let parent = by_id.get(order.order_id.as_str());
            BoardEntry {
                order_status: parent.map(|o| o.status),
                customer_name: parent.and_then(|o| o.customer_name.clone()),
                order,
            }
        })
        .collect();
    KitchenBoard::from_entries(entries, Some(Utc::now()))
}

/// Validate merged-index updates and group them per ticket
fn plan_item_updates(
    order: &MergedOrder,
    updates: &[(usize, ItemStatus)],
) -> AppResult<Vec<(String, Vec<ItemStatusEntry>)>> {
    let mut next = order.statuses();
    let mut touched: Vec<&str> = Vec::new();

    for &(index, status) in updates {
        let Some((ticket_id, _)) = order.locate(index) else {
            return Err(AppError::new(ErrorCode::ItemIndexOutOfRange)
                .with_detail("index", index)
                .with_detail("items", order.items.len()));
        };
        let current = next[index];
        if !current.can_advance_to(status) {
            return Err(AppError::with_message(
                ErrorCode::ItemStatusRegression,
                format!("Item {} cannot go from {} back to {}", index, current, status),
            ));
        }
        next[index] = status;
        if !touched.contains(&ticket_id) {
            touched.push(ticket_id);
        }
    }

    Ok(order
        .segments
        .iter()
        .filter(|s| touched.contains(&s.ticket_id.as_str()))
        .map(|s| {
            let entries = (0..s.len)
                .map(|local| ItemStatusEntry {
                    item_index: local,
                    status: next[s.offset + local],
                })
                .collect();
            (s.ticket_id.clone(), entries)
        })
        .collect())
}

/// Ticket creation payload for an order
pub fn ticket_request(
    order: &RestaurantOrder,
    priority: Priority,
    chef: Option<&StaffMember>,
    menu: &[MenuItem],
) -> CreateTicketRequest {
    let estimated = order
        .items
        .iter()
        .filter_map(|i| i.catalog_id().and_then(|id| find_by_id(menu, id)))
        .map(|m| m.prep_time)
        .fold(0.0, f64::max);
    CreateTicketRequest {
        order_id: order.id.clone(),
        table_no: order.table_no.clone(),
        items: order.items.clone(),
        priority,
        estimated_time: (estimated > 0.0).then(|| estimated.ceil() as u32),
        assigned_chef: chef.map(|c| c.id.clone()),
    }
}
