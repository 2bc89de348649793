use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use front_desk::kitchen::{AlertSink, KitchenMonitor, KotTracker, NewOrderAlert, PushHint};
use parking_lot::Mutex;
use pms_client::HotelApi;
use pms_client::testing::MockHttpClient;
use serde_json::json;
use shared::http::Method;
use shared::models::{ItemStatus, TicketStatus};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const TICKETS: &str = "/api/kot/all";

fn tracker() -> Arc<KotTracker<MockHttpClient>> {
    Arc::new(KotTracker::new(HotelApi::new(MockHttpClient::new())))
}

#[derive(Default)]
struct RecordingSink {
    alerts: Mutex<Vec<NewOrderAlert>>,
    chimes: AtomicUsize,
}

impl AlertSink for RecordingSink {
    fn notify(&self, alert: &NewOrderAlert) {
        self.alerts.lock().push(alert.clone());
    }

    fn chime(&self) {
        self.chimes.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_two_tickets_merge_into_one_order() {
    let tracker = tracker();
    tracker.api().http().on(
        Method::GET,
        TICKETS,
        json!({"kots": [
            {"_id": "A", "orderId": "X", "tableNo": "4",
             "items": [{"itemName": "Dal Makhani"}, {"itemName": "Jeera Rice"}],
             "itemStatuses": [{"itemIndex": 0, "status": "pending"}, {"itemIndex": 1, "status": "pending"}]},
            {"_id": "B", "orderId": "X", "tableNo": "4",
             "items": [{"itemName": "Butter Naan"}],
             "itemStatuses": [{"itemIndex": 0, "status": "ready"}]}
        ]}),
    );

    let board = tracker.refresh().await.unwrap();
    let x = &board.find("X").unwrap().order;
    assert_eq!(x.items.len(), 3);
    assert_eq!(
        x.statuses(),
        vec![ItemStatus::Pending, ItemStatus::Pending, ItemStatus::Ready]
    );
    assert_eq!(x.ticket_ids().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(board.find_by_ticket("B").map(|e| e.order.order_id.as_str()), Some("X"));
}

#[tokio::test]
async fn test_only_kitchen_flow_statuses_reach_the_order() {
    let all = [
        (TicketStatus::Pending, true),
        (TicketStatus::Acknowledged, false),
        (TicketStatus::Preparing, true),
        (TicketStatus::Ready, true),
        (TicketStatus::Served, true),
        (TicketStatus::Paid, false),
        (TicketStatus::Completed, false),
        (TicketStatus::Cancelled, false),
    ];

    for (status, propagates) in all {
        let tracker = tracker();
        tracker
            .api()
            .http()
            .on(Method::PATCH, "/api/kot/A/status", json!({}))
            .on(Method::PATCH, "/api/restaurant-orders/X/status", json!({}));

        let change = tracker.update_status("A", "X", status).await.unwrap();
        let order_calls = tracker
            .api()
            .http()
            .calls_to(Method::PATCH, "/api/restaurant-orders/X/status");

        assert_eq!(order_calls.len(), usize::from(propagates), "{status}");
        assert_eq!(change.order_status.is_some(), propagates, "{status}");
        if propagates {
            assert_eq!(order_calls[0].body, Some(json!({"status": status.as_str()})));
        }
    }
}

#[tokio::test]
async fn test_new_ticket_raises_one_alert() {
    let sink = Arc::new(RecordingSink::default());
    let tracker = KotTracker::new(HotelApi::new(MockHttpClient::new()))
        .with_alerts(sink.clone(), Duration::from_secs(10));
    tracker
        .api()
        .http()
        .on(
            Method::GET,
            TICKETS,
            json!([{"_id": "A", "orderId": "X", "items": ["Tea"], "createdAt": "2024-05-01T10:00:00Z"}]),
        )
        .on(
            Method::GET,
            TICKETS,
            json!([
                {"_id": "A", "orderId": "X", "items": ["Tea"], "createdAt": "2024-05-01T10:00:00Z"},
                {"_id": "B", "orderId": "Y", "tableNo": 9, "items": ["Coffee"], "createdAt": "2024-05-01T10:05:00Z"}
            ]),
        );

    // 1. First refresh only sets the baseline
    tracker.refresh().await.unwrap();
    assert!(sink.alerts.lock().is_empty());

    // 2. Count grew: newest ticket announced
    tracker.refresh().await.unwrap();
    let alert = tracker.current_alert().unwrap();
    assert_eq!(alert.ticket_id, "B");
    assert_eq!(alert.message(), "New kitchen order for table 9");
    assert_eq!(sink.chimes.load(Ordering::SeqCst), 1);

    // 3. Same count: nothing new
    tracker.refresh().await.unwrap();
    assert_eq!(sink.alerts.lock().len(), 1);
    assert!(tracker.dismiss_alert().is_some());
    assert!(tracker.current_alert().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_monitor_polls_on_interval() {
    let tracker = tracker();
    tracker
        .api()
        .http()
        .on(Method::GET, TICKETS, json!([{"_id": "A", "orderId": "X", "items": ["Tea"]}]));

    let shutdown = CancellationToken::new();
    let monitor = KitchenMonitor::new(tracker.clone(), Duration::from_secs(5), shutdown.clone());
    let boards = monitor.subscribe();
    let handle = tokio::spawn(monitor.run(None));

    // Ticks at 0s, 5s and 10s
    tokio::time::sleep(Duration::from_millis(12_500)).await;
    assert_eq!(tracker.api().http().calls_to(Method::GET, TICKETS).len(), 3);
    assert_eq!(boards.borrow().active.len(), 1);

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_push_hint_refreshes_immediately() {
    let tracker = tracker();
    tracker.api().http().on(Method::GET, TICKETS, json!([]));

    let shutdown = CancellationToken::new();
    let monitor = KitchenMonitor::new(tracker.clone(), Duration::from_secs(60), shutdown.clone());
    let (tx, rx) = mpsc::channel(4);
    let handle = tokio::spawn(monitor.run(Some(rx)));
    let polls = || tracker.api().http().calls_to(Method::GET, TICKETS).len();

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(polls(), 1);

    tx.send(PushHint::NewKot).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(polls(), 2);

    // Closed channel: polling continues on its own
    drop(tx);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(polls(), 2);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(polls(), 3);

    shutdown.cancel();
    handle.await.unwrap();
}
