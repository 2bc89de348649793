//! Invoice projection
//!
//! Builds a printable invoice from a finalized restaurant order or a
//! booking bill. Nothing here feeds back into billing figures.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use shared::TaxRate;
use shared::models::{AdvancePayment, Booking, ClientDetails, NOT_AVAILABLE, RestaurantOrder};
use shared::money::{self, round_money, round_to_unit};

use crate::billing::BillingSummary;

/// SAC code for restaurant services
pub const HSN_RESTAURANT: &str = "996331";
/// SAC code for room accommodation
pub const HSN_ROOM: &str = "996311";
/// SAC code for laundry services
pub const HSN_LAUNDRY: &str = "999712";

const UNKNOWN_ITEM: &str = "Unknown Item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    Restaurant,
    Booking,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceHeader {
    pub bill_no: String,
    pub bill_date: Option<NaiveDate>,
    pub grc_no: String,
    pub room_no: String,
    pub room_type: String,
    pub adults: u32,
    pub children: u32,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

/// One invoice line
///
/// `declared_rate` is the unit rate on the menu or tariff, `amount` what
/// was actually charged. Free lines keep their declared rate for display
/// and charge nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub date: Option<NaiveDate>,
    pub particulars: String,
    pub quantity: u32,
    pub declared_rate: Decimal,
    pub hsn: &'static str,
    pub amount: Decimal,
    pub is_free: bool,
}

impl InvoiceLine {
    fn charged(particulars: impl Into<String>, hsn: &'static str, amount: Decimal, date: Option<NaiveDate>) -> Self {
        Self {
            date,
            particulars: particulars.into(),
            quantity: 1,
            declared_rate: amount,
            hsn,
            amount,
            is_free: false,
        }
    }
}

/// Tax table row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRow {
    pub taxable_amount: Decimal,
    pub cgst_rate: TaxRate,
    pub cgst: Decimal,
    pub sgst_rate: TaxRate,
    pub sgst: Decimal,
    pub total: Decimal,
}

impl TaxRow {
    fn new(taxable_amount: Decimal, cgst_rate: TaxRate, sgst_rate: TaxRate) -> Self {
        let cgst = round_money(cgst_rate.apply(taxable_amount));
        let sgst = round_money(sgst_rate.apply(taxable_amount));
        Self {
            taxable_amount,
            cgst_rate,
            cgst,
            sgst_rate,
            sgst,
            total: taxable_amount + cgst + sgst,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherCharge {
    pub particulars: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub kind: InvoiceKind,
    /// Order or booking id the invoice belongs to
    pub source_id: String,
    pub client: ClientDetails,
    pub header: InvoiceHeader,
    pub lines: Vec<InvoiceLine>,
    pub taxes: TaxRow,
    pub other_charges: Vec<OtherCharge>,
    /// Taxable + taxes + other charges, before rounding
    pub exact_total: Decimal,
    /// `round(exact_total) - exact_total`, signed
    pub round_off: Decimal,
    pub net_amount: Decimal,
    pub advances: Vec<AdvancePayment>,
    pub advance_total: Decimal,
    /// Present only when advance payments exist; never negative
    pub balance_due: Option<Decimal>,
}

impl Invoice {
    /// Invoice for a restaurant order
    ///
    /// The taxable amount is the order's billed amount as fixed at
    /// submission; lines are informational.
    pub fn for_restaurant_order(order: &RestaurantOrder, rates: (TaxRate, TaxRate)) -> Self {
        let date = order.created_at.map(|t| t.with_timezone(&Local).date_naive());

        let client = ClientDetails {
            name: or_default(order.customer_name.as_deref(), "Guest"),
            address: or_default(order.address.as_deref(), NOT_AVAILABLE),
            city: or_default(order.city.as_deref(), NOT_AVAILABLE),
            company: or_default(order.company.as_deref(), NOT_AVAILABLE),
            mobile_no: or_default(order.phone_number.as_deref(), NOT_AVAILABLE),
            gstin: or_default(order.gstin.as_deref(), NOT_AVAILABLE),
        };

        let header = InvoiceHeader {
            bill_no: format!("REST-{}", id_suffix(&order.id)),
            bill_date: date,
            grc_no: format!("GRC-{}", id_suffix(&order.id)),
            room_no: format!("Table {}", or_default(Some(order.table_no.as_str()), NOT_AVAILABLE)),
            room_type: "Restaurant".into(),
            adults: 1,
            children: 0,
            check_in: date,
            check_out: date,
        };

        let lines = order
            .items
            .iter()
            .map(|item| {
                let declared_rate = money::to_decimal(item.price.unwrap_or_default());
                InvoiceLine {
                    date,
                    particulars: item.explicit_name().unwrap_or(UNKNOWN_ITEM).to_string(),
                    quantity: item.quantity,
                    declared_rate,
                    hsn: HSN_RESTAURANT,
                    amount: if item.is_free {
                        Decimal::ZERO
                    } else {
                        declared_rate * Decimal::from(item.quantity)
                    },
                    is_free: item.is_free,
                }
            })
            .collect();

        let taxable = money::to_decimal(order.billed_amount());
        let other_charges = vec![OtherCharge {
            particulars: "Service Charge".into(),
            amount: Decimal::ZERO,
        }];

        Self::assemble(
            InvoiceKind::Restaurant,
            order.id.clone(),
            client,
            header,
            lines,
            TaxRow::new(taxable, rates.0, rates.1),
            other_charges,
            Vec::new(),
        )
    }

    /// Invoice for a booking bill
    pub fn for_booking(booking: &Booking, summary: &BillingSummary) -> Self {
        let client = ClientDetails {
            name: or_default(booking.name.as_deref(), "Guest"),
            address: or_default(booking.address.as_deref(), NOT_AVAILABLE),
            city: or_default(booking.city.as_deref(), NOT_AVAILABLE),
            company: or_default(booking.company_name.as_deref(), NOT_AVAILABLE),
            mobile_no: or_default(booking.mobile_no.as_deref(), NOT_AVAILABLE),
            gstin: or_default(booking.company_gstin.as_deref(), NOT_AVAILABLE),
        };

        let grc_no = if booking.grc_no.trim().is_empty() {
            format!("GRC-{}", id_suffix(&booking.id))
        } else {
            booking.grc_no.clone()
        };
        let (adults, children) = booking.guest_count();
        let header = InvoiceHeader {
            bill_no: format!("INV-{}", id_suffix(&booking.id)),
            bill_date: booking.check_out_date,
            grc_no,
            room_no: or_default(Some(booking.room_number.as_str()), NOT_AVAILABLE),
            room_type: "Room".into(),
            adults,
            children,
            check_in: booking.check_in_date,
            check_out: booking.check_out_date,
        };

        let nights = stay_nights(booking);
        let checkout_date = booking.check_out_date;
        let mut lines = Vec::new();

        if !summary.room_charges.is_zero() {
            let declared_rate = if nights > 1 {
                round_money(summary.room_charges / Decimal::from(nights))
            } else {
                summary.room_charges
            };
            lines.push(InvoiceLine {
                date: booking.check_in_date,
                particulars: "Room Rent".into(),
                quantity: nights.max(1),
                declared_rate,
                hsn: HSN_ROOM,
                amount: summary.room_charges,
                is_free: false,
            });
        }
        let extras = [
            ("Extra Bed", HSN_ROOM, summary.extra_bed_charges),
            ("Restaurant", HSN_RESTAURANT, summary.restaurant_charges),
            ("Room Service", HSN_RESTAURANT, summary.service_charges),
            ("Laundry", HSN_LAUNDRY, summary.laundry_charges),
        ];
        for (particulars, hsn, amount) in extras {
            if !amount.is_zero() {
                lines.push(InvoiceLine::charged(particulars, hsn, amount, checkout_date));
            }
        }
        if !summary.discount.is_zero() {
            lines.push(InvoiceLine::charged("Discount", HSN_ROOM, -summary.discount, checkout_date));
        }

        Self::assemble(
            InvoiceKind::Booking,
            booking.id.clone(),
            client,
            header,
            lines,
            TaxRow::new(summary.subtotal, summary.cgst_rate, summary.sgst_rate),
            Vec::new(),
            booking.advance_payments.clone(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        kind: InvoiceKind,
        source_id: String,
        client: ClientDetails,
        header: InvoiceHeader,
        lines: Vec<InvoiceLine>,
        taxes: TaxRow,
        other_charges: Vec<OtherCharge>,
        advances: Vec<AdvancePayment>,
    ) -> Self {
        let others: Decimal = other_charges.iter().map(|c| c.amount).sum();
        let exact_total = taxes.total + others;
        let net_amount = round_to_unit(exact_total);
        let advance_total = money::sum(advances.iter().map(|p| p.amount));
        let balance_due = (!advances.is_empty()).then(|| (net_amount - advance_total).max(Decimal::ZERO));

        Self {
            kind,
            source_id,
            client,
            header,
            lines,
            taxes,
            other_charges,
            exact_total,
            round_off: net_amount - exact_total,
            net_amount,
            advances,
            advance_total,
            balance_due,
        }
    }

    /// Sum of charged line amounts (free lines excluded)
    pub fn lines_total(&self) -> Decimal {
        self.lines.iter().filter(|l| !l.is_free).map(|l| l.amount).sum()
    }

    pub fn other_charges_total(&self) -> Decimal {
        self.other_charges.iter().map(|c| c.amount).sum()
    }

    /// Overwrite client details, e.g. after editing on screen
    pub fn set_client(&mut self, client: ClientDetails) {
        self.client = client;
    }
}

fn or_default(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Last six characters of an id
fn id_suffix(id: &str) -> String {
    let skip = id.chars().count().saturating_sub(6);
    id.chars().skip(skip).collect()
}

fn stay_nights(booking: &Booking) -> u32 {
    match (booking.check_in_date, booking.check_out_date) {
        (Some(check_in), Some(check_out)) => {
            u32::try_from((check_out - check_in).num_days()).unwrap_or(0)
        }
        _ => booking
            .days
            .filter(|d| *d >= 1.0)
            .map(|d| d.round() as u32)
            .unwrap_or(1),
    }
}
