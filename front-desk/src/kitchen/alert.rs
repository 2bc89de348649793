//! New-order alerts
//!
//! The tracker raises at most one alert per refresh, when the ticket count
//! grew. Alerts expire after a fixed lifetime.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// A one-shot "new order" notification
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderAlert {
    pub ticket_id: String,
    pub order_id: String,
    pub table_no: String,
    pub created_at: Option<DateTime<Utc>>,
    pub raised_at: Instant,
    pub ttl: Duration,
}

impl NewOrderAlert {
    pub fn message(&self) -> String {
        if self.table_no.is_empty() {
            "New kitchen order received".to_string()
        } else {
            format!("New kitchen order for table {}", self.table_no)
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// Receives alerts raised by the tracker
pub trait AlertSink: Send + Sync {
    /// Show the notification
    fn notify(&self, alert: &NewOrderAlert);

    /// Audible cue accompanying the notification
    fn chime(&self) {}
}

/// Logs alerts and rings the terminal bell
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&self, alert: &NewOrderAlert) {
        tracing::info!(
            ticket_id = %alert.ticket_id,
            order_id = %alert.order_id,
            table_no = %alert.table_no,
            "{}",
            alert.message()
        );
    }

    fn chime(&self) {
        eprint!("\x07");
    }
}

/// Discards alerts
#[derive(Debug, Default)]
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn notify(&self, _alert: &NewOrderAlert) {}
}

/// Holds the currently visible alert until it expires
#[derive(Debug, Default)]
pub struct AlertSlot {
    current: Mutex<Option<NewOrderAlert>>,
}

impl AlertSlot {
    pub fn set(&self, alert: NewOrderAlert) {
        *self.current.lock() = Some(alert);
    }

    /// The visible alert; expired alerts are cleared on read
    pub fn current(&self) -> Option<NewOrderAlert> {
        let mut slot = self.current.lock();
        if slot.as_ref().is_some_and(NewOrderAlert::is_expired) {
            *slot = None;
        }
        slot.clone()
    }

    /// Dismiss the alert
    pub fn take(&self) -> Option<NewOrderAlert> {
        self.current.lock().take().filter(|a| !a.is_expired())
    }
}
