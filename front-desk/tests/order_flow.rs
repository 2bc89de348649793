use std::time::Duration;

use front_desk::{Cart, CatalogReader, OrderDraft, OrderSubmitter};
use pms_client::HotelApi;
use pms_client::testing::MockHttpClient;
use rust_decimal::Decimal;
use serde_json::json;
use shared::ErrorCode;
use shared::http::Method;

const CREATE_ORDER: &str = "/api/restaurant-orders/create";

fn api() -> HotelApi<MockHttpClient> {
    let api = HotelApi::new(MockHttpClient::new());
    api.http()
        .on(
            Method::GET,
            "/api/items/all",
            json!({"items": [
                {"_id": "m1", "name": "Paneer Tikka", "Price": 100, "category": "starters"},
                {"_id": "m2", "name": "Lassi", "Price": 50, "category": "drinks"}
            ]}),
        )
        .on(
            Method::POST,
            CREATE_ORDER,
            json!({"success": true, "order": {"_id": "o1", "status": "pending", "amount": 250}}),
        );
    api
}

#[tokio::test]
async fn test_cart_to_order_requires_destination() {
    // 1. Build the cart from the catalog
    let api = api();
    let menu = CatalogReader::new(api.clone()).menu().await;
    let mut cart = Cart::new();
    cart.open();
    cart.add_item(menu.iter().find(|m| m.id == "m1").unwrap());
    cart.add_item(menu.iter().find(|m| m.id == "m1").unwrap());
    cart.add_item(menu.iter().find(|m| m.id == "m2").unwrap());
    assert_eq!(cart.total(), Decimal::from(250));

    // 2. No table: rejected locally, nothing posted
    let submitter = OrderSubmitter::new(api.clone());
    let err = submitter
        .submit(&mut cart, &OrderDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DestinationMissing);
    assert!(api.http().calls_to(Method::POST, CREATE_ORDER).is_empty());
    assert_eq!(cart.item_count(), 3);

    // 3. Table 12: posted with the cart total
    let order = submitter
        .submit(&mut cart, &OrderDraft::to("12"))
        .await
        .unwrap();
    assert_eq!(order.id, "o1");

    let posts = api.http().calls_to(Method::POST, CREATE_ORDER);
    assert_eq!(posts.len(), 1);
    let body = posts[0].body.as_ref().unwrap();
    assert_eq!(body["tableNo"], "12");
    assert_eq!(body["amount"], 250.0);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_quantity_edits_never_drop_below_one() {
    let api = api();
    let menu = CatalogReader::new(api).menu().await;
    let mut cart = Cart::new();
    for item in &menu {
        cart.add_item(item);
    }

    assert!(cart.change_quantity("m1", 4));
    assert!(cart.change_quantity("m2", -10));
    assert!(!cart.change_quantity("missing", 1));
    assert!(cart.lines().iter().all(|l| l.quantity >= 1));
    // 5 × 100 + 1 × 50
    assert_eq!(cart.total(), Decimal::from(550));

    assert!(cart.remove_item("m1"));
    assert_eq!(cart.total(), Decimal::from(50));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_submit_is_rejected_while_in_flight() {
    let api = api();
    api.http().delay(Method::POST, CREATE_ORDER, Duration::from_millis(500));
    let menu = CatalogReader::new(api.clone()).menu().await;
    let mut first = Cart::new();
    let mut second = Cart::new();
    for item in &menu {
        first.add_item(item);
        second.add_item(item);
    }

    let submitter = OrderSubmitter::new(api.clone());
    let draft = OrderDraft::to("7");
    let (a, b) = tokio::join!(
        submitter.submit(&mut first, &draft),
        submitter.submit(&mut second, &draft)
    );

    assert_eq!(a.unwrap().id, "o1");
    assert_eq!(b.unwrap_err().code, ErrorCode::SubmissionInFlight);
    assert_eq!(api.http().calls_to(Method::POST, CREATE_ORDER).len(), 1);
    assert!(first.is_empty());
    assert_eq!(second.item_count(), 2);

    // Guard released once the first submit settles
    assert!(!submitter.is_submitting());
    submitter.submit(&mut second, &draft).await.unwrap();
    assert_eq!(api.http().calls_to(Method::POST, CREATE_ORDER).len(), 2);
}
