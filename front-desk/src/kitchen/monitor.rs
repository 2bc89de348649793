//! Kitchen board monitor
//!
//! Polls the tracker on a fixed interval and publishes each board on a
//! `watch` channel. Push hints (new order, ticket updates) trigger an
//! immediate refresh but are never authoritative: the poll keeps running
//! whether or not hints arrive.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use pms_client::HttpClient;

use super::tracker::{KitchenBoard, KotTracker};

/// Secondary change signal from a push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushHint {
    NewOrder,
    NewKot,
    KotStatusUpdate,
    KotItemUpdate,
    OrderStatusUpdate,
}

impl PushHint {
    /// Map a push event name; unrelated events yield `None`
    pub fn from_event(event: &str) -> Option<Self> {
        match event {
            "new-order" => Some(Self::NewOrder),
            "new-kot" => Some(Self::NewKot),
            "kot-status-update" | "kot-status-updated" => Some(Self::KotStatusUpdate),
            "kot-item-update" | "kot-item-status-update" => Some(Self::KotItemUpdate),
            "order-status-update" | "order-status-updated" => Some(Self::OrderStatusUpdate),
            _ => None,
        }
    }
}

pub struct KitchenMonitor<H> {
    tracker: Arc<KotTracker<H>>,
    interval: Duration,
    shutdown: CancellationToken,
    board_tx: watch::Sender<Arc<KitchenBoard>>,
}

impl<H: HttpClient + 'static> KitchenMonitor<H> {
    pub fn new(tracker: Arc<KotTracker<H>>, interval: Duration, shutdown: CancellationToken) -> Self {
        let (board_tx, _) = watch::channel(Arc::new(tracker.board()));
        Self {
            tracker,
            interval,
            shutdown,
            board_tx,
        }
    }

    /// Receiver of published boards
    pub fn subscribe(&self) -> watch::Receiver<Arc<KitchenBoard>> {
        self.board_tx.subscribe()
    }

    pub fn tracker(&self) -> &Arc<KotTracker<H>> {
        &self.tracker
    }

    /// Run until cancelled
    ///
    /// `hints` may be `None` when no push channel is available. A closed
    /// hint channel falls back to polling only.
    pub async fn run(self, hints: Option<mpsc::Receiver<PushHint>>) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Kitchen monitor started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut hints = hints;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Kitchen monitor shutting down");
                    break;
                }

                _ = ticker.tick() => {
                    tracing::debug!("Kitchen poll tick");
                    self.refresh().await;
                }

                hint = recv_hint(&mut hints), if hints.is_some() => {
                    match hint {
                        Some(hint) => {
                            tracing::debug!(?hint, "Push hint received, refreshing");
                            self.refresh().await;
                            ticker.reset();
                        }
                        None => {
                            tracing::warn!("Push channel closed, continuing with polling only");
                            hints = None;
                        }
                    }
                }
            }
        }
    }

    async fn refresh(&self) {
        match self.tracker.refresh().await {
            Ok(board) => {
                self.board_tx.send_replace(Arc::new(board));
            }
            Err(e) => {
                // Keep the last board; the next tick retries
                tracing::warn!(error = %e, "Kitchen refresh failed");
            }
        }
    }
}

async fn recv_hint(hints: &mut Option<mpsc::Receiver<PushHint>>) -> Option<PushHint> {
    match hints {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
