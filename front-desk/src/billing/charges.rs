//! Booking charge aggregation
//!
//! subtotal = room + extra bed + restaurant + service + laundry - discount
//! cgst/sgst = subtotal × rate
//! total = round2(subtotal + cgst + sgst), round_off = total - exact

use rust_decimal::Decimal;
use serde::Serialize;

use shared::TaxRate;
use shared::models::{Booking, BookingCharges, LaundryOrder, RestaurantOrder, ServiceOrder};
use shared::money::{self, round_money};

use super::extra_bed::extra_bed_charge;

/// Raw components of a bill
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChargeInputs {
    pub room: Decimal,
    pub extra_bed: Decimal,
    pub restaurant: Decimal,
    pub service: Decimal,
    pub laundry: Decimal,
    pub discount: Decimal,
    pub cgst_rate: TaxRate,
    pub sgst_rate: TaxRate,
}

/// Computed bill
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    pub room_charges: Decimal,
    pub extra_bed_charges: Decimal,
    pub restaurant_charges: Decimal,
    pub service_charges: Decimal,
    pub laundry_charges: Decimal,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub cgst_rate: TaxRate,
    pub sgst_rate: TaxRate,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub total_tax: Decimal,
    /// Unrounded total
    pub exact_total: Decimal,
    /// `round2(exact_total)`
    pub total_amount: Decimal,
    /// `total_amount - exact_total`, |·| < 0.01
    pub round_off: Decimal,
}

impl BillingSummary {
    /// `max(0, total - advances)`
    pub fn balance_due(&self, advances: Decimal) -> Decimal {
        (self.total_amount - advances).max(Decimal::ZERO)
    }
}

/// Compute a bill from its components
pub fn summarize(inputs: &ChargeInputs) -> BillingSummary {
    let gross = inputs.room + inputs.extra_bed + inputs.restaurant + inputs.service + inputs.laundry;
    let discount = inputs.discount.max(Decimal::ZERO).min(gross.max(Decimal::ZERO));
    let subtotal = gross - discount;

    let cgst_amount = inputs.cgst_rate.apply(subtotal);
    let sgst_amount = inputs.sgst_rate.apply(subtotal);
    let exact_total = subtotal + cgst_amount + sgst_amount;
    let total_amount = round_money(exact_total);

    BillingSummary {
        room_charges: inputs.room,
        extra_bed_charges: inputs.extra_bed,
        restaurant_charges: inputs.restaurant,
        service_charges: inputs.service,
        laundry_charges: inputs.laundry,
        discount,
        subtotal,
        cgst_rate: inputs.cgst_rate,
        sgst_rate: inputs.sgst_rate,
        cgst_amount: round_money(cgst_amount),
        sgst_amount: round_money(sgst_amount),
        total_tax: round_money(cgst_amount + sgst_amount),
        exact_total,
        total_amount,
        round_off: total_amount - exact_total,
    }
}

/// Restaurant orders billed to the room, cancelled excluded
pub fn restaurant_total(orders: &[RestaurantOrder]) -> Decimal {
    money::sum(orders.iter().filter(|o| o.is_billable()).map(RestaurantOrder::billed_amount))
}

/// Room-service orders, cancelled excluded
pub fn service_total(orders: &[ServiceOrder]) -> Decimal {
    money::sum(orders.iter().filter(|o| o.is_billable()).map(ServiceOrder::billed_amount))
}

/// Laundry orders, cancelled excluded
pub fn laundry_total(orders: &[LaundryOrder]) -> Decimal {
    money::sum(orders.iter().filter(|o| o.is_billable()).map(|o| o.total_amount))
}

fn positive(value: f64) -> Option<Decimal> {
    Some(money::to_decimal(value)).filter(|v| *v > Decimal::ZERO)
}

impl ChargeInputs {
    /// Components of a booking's bill
    ///
    /// Room charges are the booking's taxable room amount, falling back to
    /// its rate and then to the backend aggregate. Linked order lists are
    /// summed locally when the aggregate carries them; otherwise the
    /// aggregate's own totals are used. Rates missing on the booking take
    /// the configured defaults.
    pub fn from_booking(booking: &Booking, charges: &BookingCharges, defaults: (TaxRate, TaxRate)) -> Self {
        let room = booking
            .taxable_amount
            .and_then(positive)
            .or_else(|| positive(booking.rate))
            .unwrap_or_else(|| money::to_decimal(charges.room_charges.total_room_charges));

        let extra_bed = charges
            .room_charges
            .extra_bed_charges
            .and_then(positive)
            .unwrap_or_else(|| extra_bed_charge(booking));

        let restaurant = match &charges.restaurant_orders {
            Some(orders) => restaurant_total(orders),
            None => money::to_decimal(charges.summary.total_restaurant_charges),
        };
        let service = match &charges.service_orders {
            Some(orders) => service_total(orders),
            None => money::to_decimal(charges.summary.total_service_charges),
        };
        let laundry = match &charges.laundry_orders {
            Some(orders) => laundry_total(orders),
            None => money::to_decimal(charges.summary.total_laundry_charges),
        };

        let discount = positive(booking.discount).unwrap_or_else(|| {
            positive(booking.discount_percent)
                .map(|pct| round_money(room * pct / Decimal::ONE_HUNDRED))
                .unwrap_or_default()
        });

        Self {
            room,
            extra_bed,
            restaurant,
            service,
            laundry,
            discount,
            cgst_rate: booking.cgst_rate.unwrap_or(defaults.0),
            sgst_rate: booking.sgst_rate.unwrap_or(defaults.1),
        }
    }
}
