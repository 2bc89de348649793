//! Typed facade over the backend REST endpoints
//!
//! Every method returns [`AppResult`]; transport errors are converted via
//! `From<ClientError>`. Listing envelopes are unwrapped tolerantly.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Booking, BookingCharges, Category, Checkout, CreateOrderRequest, CreateTicketRequest,
    DiningTable, GstProfile, ItemStatusEntry, ItemStatusUpdate, KitchenTicket, MenuItem,
    NotificationRequest, OrderStatus, PaymentRequest, RestaurantInvoiceRecord, RestaurantOrder,
    Room, RoomCategory, SaveRestaurantInvoice, StaffMember, StatusUpdate, TicketStatus, Vendor,
};
use shared::response::{extract, extract_list, failure_message};

use crate::{ClientError, HttpClient, Session};

/// Typed backend API
#[derive(Debug)]
pub struct HotelApi<H> {
    http: Arc<H>,
}

impl<H> Clone for HotelApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<H: HttpClient> HotelApi<H> {
    pub fn new(http: H) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    pub fn from_arc(http: Arc<H>) -> Self {
        Self { http }
    }

    /// Underlying transport
    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    /// End the session locally; the token is simply forgotten
    pub fn logout(&self) {
        self.http.session().clear();
    }

    async fn list<T: DeserializeOwned>(&self, path: &str, keys: &[&str]) -> AppResult<Vec<T>> {
        let value: Value = self.http.get(path).await?;
        extract_list(value, keys)
    }

    async fn one<T: DeserializeOwned>(&self, path: &str, keys: &[&str]) -> AppResult<T> {
        let value: Value = self.http.get(path).await?;
        extract(value, keys)
    }

    // ==================== Catalog ====================

    pub async fn menu_items(&self) -> AppResult<Vec<MenuItem>> {
        self.list("/api/items/all", &["items"]).await
    }

    pub async fn restaurant_categories(&self) -> AppResult<Vec<Category>> {
        self.list("/api/restaurant-categories/all", &["categories"])
            .await
    }

    pub async fn rooms(&self) -> AppResult<Vec<Room>> {
        self.list("/api/rooms/all", &["rooms"]).await
    }

    pub async fn room_categories(&self) -> AppResult<Vec<RoomCategory>> {
        self.list("/api/categories/all", &["categories"]).await
    }

    pub async fn dining_tables(&self) -> AppResult<Vec<DiningTable>> {
        self.list("/api/restaurant/tables", &["tables"]).await
    }

    pub async fn active_vendors(&self) -> AppResult<Vec<Vendor>> {
        self.list("/api/vendors/active", &["vendors"]).await
    }

    /// Restaurant users (chefs and floor staff)
    pub async fn restaurant_users(&self) -> AppResult<Vec<StaffMember>> {
        self.list(
            "/api/search/field?model=users&field=role&value=restaurant",
            &["users"],
        )
        .await
    }

    // ==================== Bookings ====================

    pub async fn bookings(&self) -> AppResult<Vec<Booking>> {
        self.list("/api/bookings/all", &["bookings"]).await
    }

    pub async fn booking(&self, id: &str) -> AppResult<Booking> {
        self.one(&format!("/api/bookings/{}", id), &["booking"])
            .await
    }

    /// Direct lookup, falling back to scanning the full listing
    pub async fn find_booking(&self, id: &str) -> AppResult<Booking> {
        match self.booking(id).await {
            Ok(booking) if !booking.id.is_empty() => return Ok(booking),
            Ok(_) => tracing::warn!(booking_id = id, "Direct booking lookup returned no record"),
            Err(e) => {
                tracing::warn!(booking_id = id, error = %e, "Direct booking lookup failed, scanning listing")
            }
        }
        self.bookings()
            .await?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::BookingNotFound).with_detail("booking_id", id)
            })
    }

    // ==================== Orders ====================

    pub async fn orders(&self) -> AppResult<Vec<RestaurantOrder>> {
        self.list("/api/restaurant-orders/all", &["orders"]).await
    }

    pub async fn create_order(&self, req: &CreateOrderRequest) -> AppResult<RestaurantOrder> {
        let value: Value = self.http.post("/api/restaurant-orders/create", req).await?;
        extract(value, &["order"])
    }

    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> AppResult<()> {
        let _: Value = self
            .http
            .patch(
                &format!("/api/restaurant-orders/{}/status", order_id),
                &StatusUpdate::new(status.as_str()),
            )
            .await?;
        Ok(())
    }

    // ==================== Kitchen ====================

    pub async fn tickets(&self) -> AppResult<Vec<KitchenTicket>> {
        self.list("/api/kot/all", &["kots"]).await
    }

    pub async fn create_ticket(&self, req: &CreateTicketRequest) -> AppResult<KitchenTicket> {
        let value: Value = self.http.post("/api/kot/create", req).await?;
        extract(value, &["kot"])
    }

    pub async fn update_ticket_status(&self, ticket_id: &str, status: TicketStatus) -> AppResult<()> {
        let _: Value = self
            .http
            .patch(
                &format!("/api/kot/{}/status", ticket_id),
                &StatusUpdate::new(status.as_str()),
            )
            .await?;
        Ok(())
    }

    pub async fn update_item_statuses(
        &self,
        ticket_id: &str,
        entries: Vec<ItemStatusEntry>,
    ) -> AppResult<()> {
        let _: Value = self
            .http
            .patch(
                &format!("/api/kot/{}/item-statuses", ticket_id),
                &ItemStatusUpdate {
                    item_statuses: entries,
                },
            )
            .await?;
        Ok(())
    }

    pub async fn notify(&self, req: &NotificationRequest) -> AppResult<()> {
        let _: Value = self.http.post("/api/notifications/create", req).await?;
        Ok(())
    }

    // ==================== Checkout ====================

    pub async fn booking_charges(&self, booking_id: &str) -> AppResult<BookingCharges> {
        self.one(
            &format!("/api/bookings/charges/booking/{}", booking_id),
            &["charges"],
        )
        .await
    }

    /// Existing checkout for a booking; `None` when the backend has none yet
    pub async fn checkout_for_booking(&self, booking_id: &str) -> AppResult<Option<Checkout>> {
        let path = format!("/api/checkout/booking/{}", booking_id);
        match self.http.get::<Value>(&path).await {
            Ok(Value::Null) => Ok(None),
            Ok(value) => {
                if value.get("checkout").is_some_and(Value::is_null) {
                    return Ok(None);
                }
                extract(value, &["checkout"]).map(Some)
            }
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn create_checkout(&self, booking_id: &str) -> AppResult<Checkout> {
        let value: Value = self
            .http
            .post("/api/checkout/create", &json!({ "bookingId": booking_id }))
            .await?;
        extract(value, &["checkout"])
    }

    pub async fn pay_checkout(&self, checkout_id: &str, req: &PaymentRequest) -> AppResult<()> {
        let _: Value = self
            .http
            .put(&format!("/api/checkout/{}/payment", checkout_id), req)
            .await?;
        Ok(())
    }

    // ==================== Invoice profiles ====================

    /// Saved GST profile; `None` when the number is unknown
    pub async fn gst_profile(&self, gstin: &str) -> AppResult<Option<GstProfile>> {
        let path = format!("/api/gst-numbers/details/{}", gstin);
        let value: Value = match self.http.get(&path).await {
            Ok(v) => v,
            Err(ClientError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if failure_message(&value).is_some() {
            return Ok(None);
        }
        match value.get("gstNumber") {
            Some(profile @ Value::Object(_)) => {
                let mut profile: GstProfile = serde_json::from_value(profile.clone())?;
                if profile.gst_number.is_empty() {
                    profile.gst_number = gstin.to_string();
                }
                Ok(Some(profile))
            }
            _ => Ok(None),
        }
    }

    pub async fn save_gst_profile(&self, profile: &GstProfile) -> AppResult<()> {
        let value: Value = self.http.post("/api/gst-numbers/create", profile).await?;
        match failure_message(&value) {
            Some(msg) => Err(AppError::backend(msg)),
            None => Ok(()),
        }
    }

    pub async fn save_restaurant_invoice(&self, req: &SaveRestaurantInvoice) -> AppResult<()> {
        let value: Value = self.http.post("/api/restaurant-invoices/save", req).await?;
        match failure_message(&value) {
            Some(msg) => Err(AppError::backend(msg)),
            None => Ok(()),
        }
    }

    /// Saved restaurant invoice client snapshot; `None` when absent
    pub async fn restaurant_invoice(
        &self,
        order_id: &str,
    ) -> AppResult<Option<RestaurantInvoiceRecord>> {
        let path = format!("/api/restaurant-invoices/{}", order_id);
        let value: Value = match self.http.get(&path).await {
            Ok(v) => v,
            Err(ClientError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if failure_message(&value).is_some() {
            return Ok(None);
        }
        match value.get("invoice") {
            Some(invoice @ Value::Object(_)) => Ok(Some(serde_json::from_value(invoice.clone())?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHttpClient;
    use http::{Method, StatusCode};

    fn api() -> HotelApi<MockHttpClient> {
        HotelApi::new(MockHttpClient::new())
    }

    #[tokio::test]
    async fn test_find_booking_falls_back_to_listing() {
        let api = api();
        api.http().fail(
            Method::GET,
            "/api/bookings/b2",
            StatusCode::NOT_FOUND,
            "missing",
        );
        api.http().on(
            Method::GET,
            "/api/bookings/all",
            json!({"bookings": [{"_id": "b1"}, {"_id": "b2", "grcNo": "GRC-2"}]}),
        );

        let booking = api.find_booking("b2").await.unwrap();
        assert_eq!(booking.grc_no, "GRC-2");

        let err = api.find_booking("b9").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BookingNotFound);
    }

    #[tokio::test]
    async fn test_checkout_for_booking_not_found_is_none() {
        let api = api();
        api.http().fail(
            Method::GET,
            "/api/checkout/booking/b1",
            StatusCode::NOT_FOUND,
            "Checkout not found",
        );
        assert!(api.checkout_for_booking("b1").await.unwrap().is_none());

        api.http().on(
            Method::GET,
            "/api/checkout/booking/b2",
            json!({"checkout": {"_id": "c2", "bookingId": "b2"}}),
        );
        let checkout = api.checkout_for_booking("b2").await.unwrap().unwrap();
        assert_eq!(checkout.id, "c2");
    }

    #[tokio::test]
    async fn test_checkout_lookup_propagates_server_errors() {
        let api = api();
        api.http().fail(
            Method::GET,
            "/api/checkout/booking/b1",
            StatusCode::INTERNAL_SERVER_ERROR,
            "db down",
        );
        let err = api.checkout_for_booking("b1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BackendRejected);
    }

    #[tokio::test]
    async fn test_gst_profile_lookup() {
        let api = api();
        api.http().on(
            Method::GET,
            "/api/gst-numbers/details/29ABC",
            json!({"success": true, "gstNumber": {"name": "Acme", "mobileNumber": "98"}}),
        );
        api.http().on(
            Method::GET,
            "/api/gst-numbers/details/00XYZ",
            json!({"success": false, "message": "not found"}),
        );

        let profile = api.gst_profile("29ABC").await.unwrap().unwrap();
        assert_eq!(profile.gst_number, "29ABC");
        assert_eq!(profile.mobile_number, "98");
        assert!(api.gst_profile("00XYZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_patch_bodies() {
        let api = api();
        api.http()
            .on(Method::PATCH, "/api/kot/k1/status", json!({}))
            .on(Method::PATCH, "/api/restaurant-orders/o1/status", json!({}));

        api.update_ticket_status("k1", TicketStatus::Acknowledged)
            .await
            .unwrap();
        api.update_order_status("o1", OrderStatus::Ready).await.unwrap();

        let calls = api.http().calls();
        assert_eq!(calls[0].body, Some(json!({"status": "acknowledged"})));
        assert_eq!(calls[1].body, Some(json!({"status": "ready"})));
    }

    #[tokio::test]
    async fn test_listing_envelopes() {
        let api = api();
        api.http()
            .on(Method::GET, "/api/items/all", json!({"items": [{"_id": "m1", "Price": 10}]}))
            .on(Method::GET, "/api/restaurant/tables", json!([{"_id": "t1", "tableNumber": 4}]));

        assert_eq!(api.menu_items().await.unwrap()[0].price, 10.0);
        assert_eq!(api.dining_tables().await.unwrap()[0].table_number, "4");
    }
}
