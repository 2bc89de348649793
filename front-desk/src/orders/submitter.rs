//! Order submitter
//!
//! Validates a cart plus its destination and posts it as a restaurant
//! order. An in-flight flag rejects overlapping submissions; it is released
//! on every exit path by a drop guard.

use std::sync::atomic::{AtomicBool, Ordering};

use pms_client::{HotelApi, HttpClient};
use shared::models::{CreateOrderRequest, RestaurantOrder};
use shared::money;
use shared::{AppError, AppResult, ErrorCode};

use crate::cart::Cart;

/// Order fields that do not come from the cart
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    /// Table or room number
    pub destination: Option<String>,
    pub customer_name: String,
    /// Falls back to the session operator
    pub staff_name: Option<String>,
    pub notes: Option<String>,
    pub discount: f64,
    pub is_membership: bool,
    pub is_loyalty: bool,
}

impl OrderDraft {
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            ..Default::default()
        }
    }

    pub fn customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self
    }

    fn destination(&self) -> Option<&str> {
        self.destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Posts carts as restaurant orders
#[derive(Debug)]
pub struct OrderSubmitter<H> {
    api: HotelApi<H>,
    in_flight: AtomicBool,
}

impl<H: HttpClient> OrderSubmitter<H> {
    pub fn new(api: HotelApi<H>) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Build the creation payload; fails without touching the network
    pub fn build_request(&self, cart: &Cart, draft: &OrderDraft) -> AppResult<CreateOrderRequest> {
        if cart.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::CartEmpty,
                "Add at least one item before placing the order",
            ));
        }
        let Some(destination) = draft.destination() else {
            return Err(AppError::with_message(
                ErrorCode::DestinationMissing,
                "Select a table or room for the order",
            ));
        };

        let mut notes = draft.notes.clone().unwrap_or_default();
        let item_notes = cart.combined_notes();
        if !item_notes.is_empty() {
            if !notes.is_empty() {
                notes.push_str("; ");
            }
            notes.push_str(&item_notes);
        }

        let staff_name = draft
            .staff_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.api.session().operator())
            .unwrap_or_default();

        Ok(CreateOrderRequest {
            staff_name,
            customer_name: draft.customer_name.trim().to_string(),
            table_no: destination.to_string(),
            items: cart.to_inputs(),
            notes,
            amount: money::to_f64(cart.total()),
            discount: draft.discount.max(0.0),
            is_membership: draft.is_membership,
            is_loyalty: draft.is_loyalty,
        })
    }

    /// Submit the cart
    ///
    /// On success the cart is cleared and closed. On any failure the cart is
    /// left untouched so the user can retry.
    pub async fn submit(&self, cart: &mut Cart, draft: &OrderDraft) -> AppResult<RestaurantOrder> {
        let request = match self.build_request(cart, draft) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(code = %e.code, "Order rejected: {}", e.message);
                return Err(e);
            }
        };

        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::warn!(table_no = %request.table_no, "Order submission already in flight");
            return Err(AppError::new(ErrorCode::SubmissionInFlight));
        };

        match self.api.create_order(&request).await {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id,
                    table_no = %request.table_no,
                    amount = request.amount,
                    items = request.items.len(),
                    "Order placed"
                );
                cart.clear();
                cart.close();
                Ok(order)
            }
            Err(e) => {
                tracing::error!(table_no = %request.table_no, error = %e, "Order submission failed");
                Err(e)
            }
        }
    }
}
