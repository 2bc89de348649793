//! Booking Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::TaxRate;
use crate::util::{
    flexible_date, flexible_datetime, lenient_f64, opt_lenient_f64, string_or_number,
};

/// Booking lifecycle status (wire values are title case with spaces)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BookingStatus {
    #[default]
    Booked,
    #[serde(rename = "Checked In")]
    CheckedIn,
    #[serde(rename = "Checked Out")]
    CheckedOut,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }
}

/// Booking payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Partial payment recorded against a booking; append-only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePayment {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(alias = "mode", default)]
    pub payment_mode: Option<String>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Per-room rate override on a booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRate {
    #[serde(default, deserialize_with = "string_or_number")]
    pub room_number: String,
    #[serde(alias = "customPrice", default, deserialize_with = "opt_lenient_f64")]
    pub custom_rate: Option<f64>,
    #[serde(default)]
    pub extra_bed: bool,
    /// Extra bed billed from this date; the check-in date when absent
    #[serde(default, deserialize_with = "flexible_date")]
    pub extra_bed_start_date: Option<NaiveDate>,
}

/// Occupancy of one room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomGuestDetail {
    #[serde(default, deserialize_with = "string_or_number")]
    pub room_number: String,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

/// Stay amendment (extension / shortening)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amendment {
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub amended_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub original_check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub original_check_out: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub new_check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub new_check_out: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_adjustment: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Hotel stay reservation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub grc_no: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(rename = "companyGSTIN", default)]
    pub company_gstin: Option<String>,
    /// Comma-separated room numbers
    #[serde(default, deserialize_with = "string_or_number")]
    pub room_number: String,
    #[serde(default, deserialize_with = "flexible_date")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_lenient_f64")]
    pub days: Option<f64>,
    /// Taxable room amount for the stay
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,
    #[serde(default, deserialize_with = "opt_lenient_f64")]
    pub taxable_amount: Option<f64>,
    #[serde(default)]
    pub room_rates: Vec<RoomRate>,
    #[serde(default)]
    pub room_guest_details: Vec<RoomGuestDetail>,
    #[serde(default)]
    pub advance_payments: Vec<AdvancePayment>,
    #[serde(default)]
    pub amendment_history: Vec<Amendment>,
    #[serde(default)]
    pub extra_bed: bool,
    /// Per-day extra bed charge
    #[serde(default, deserialize_with = "lenient_f64")]
    pub extra_bed_charge: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub discount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub discount_percent: f64,
    #[serde(default)]
    pub cgst_rate: Option<TaxRate>,
    #[serde(default)]
    pub sgst_rate: Option<TaxRate>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub no_of_adults: Option<u32>,
    #[serde(default)]
    pub no_of_children: Option<u32>,
}

impl Booking {
    /// Individual room numbers of the stay
    pub fn room_numbers(&self) -> Vec<&str> {
        self.room_number
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect()
    }

    /// Sum of recorded advance payments
    pub fn total_advance(&self) -> f64 {
        self.advance_payments.iter().map(|p| p.amount).sum()
    }

    /// Adults and children across all rooms, falling back to booking totals
    pub fn guest_count(&self) -> (u32, u32) {
        if self.room_guest_details.is_empty() {
            return (
                self.no_of_adults.unwrap_or_default(),
                self.no_of_children.unwrap_or_default(),
            );
        }
        self.room_guest_details
            .iter()
            .fold((0, 0), |(a, c), r| (a + r.adults, c + r.children))
    }

    pub fn is_checked_in(&self) -> bool {
        self.status == BookingStatus::CheckedIn
    }
}
