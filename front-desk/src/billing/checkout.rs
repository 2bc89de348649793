//! Checkout wizard: Review → Payment → Complete
//!
//! Review loads the booking and its charges and gets or creates the
//! checkout record. Payment is reachable only once the room-inspected
//! checklist is ticked. Complete is terminal. The only backward move is
//! Payment → Review.

use rust_decimal::Decimal;
use serde::Serialize;

use pms_client::{HotelApi, HttpClient};
use shared::TaxRate;
use shared::models::{Booking, BookingCharges, Checkout, CheckoutStatus, PaymentRequest};
use shared::money::{self, MONEY_TOLERANCE};
use shared::{AppError, AppResult, ErrorCode};

use super::charges::{BillingSummary, ChargeInputs, summarize};

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Review,
    Payment,
    Complete,
}

/// Whether payments below the balance due are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaymentPolicy {
    pub allow_partial: bool,
}

impl PaymentPolicy {
    pub fn strict() -> Self {
        Self {
            allow_partial: false,
        }
    }

    pub fn partial() -> Self {
        Self {
            allow_partial: true,
        }
    }

    /// Validate an amount against the balance due
    pub fn check(&self, amount: Decimal, balance_due: Decimal) -> AppResult<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::with_message(
                ErrorCode::PaymentInvalidAmount,
                "Payment amount must be greater than zero",
            ));
        }
        if !self.allow_partial && amount + MONEY_TOLERANCE < balance_due {
            return Err(AppError::with_message(
                ErrorCode::PaymentInsufficientAmount,
                format!(
                    "Payment of {} is less than the balance due of {}",
                    money::format_amount(amount),
                    money::format_amount(balance_due)
                ),
            )
            .with_detail("balance_due", money::to_f64(balance_due)));
        }
        Ok(())
    }
}

/// Review-step data
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReview {
    pub booking: Booking,
    pub charges: BookingCharges,
    pub summary: BillingSummary,
    pub checkout: Checkout,
    pub advances: Decimal,
    pub balance_due: Decimal,
}

/// Outcome of a successful payment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub checkout_id: String,
    pub booking_id: String,
    pub paid_amount: Decimal,
    pub payment_method: String,
    /// Balance left after this payment, never negative
    pub remaining: Decimal,
}

/// Signal for the caller to reload booking and room state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSignal {
    pub booking_id: String,
}

pub struct CheckoutWizard<H> {
    api: HotelApi<H>,
    booking_id: String,
    default_rates: (TaxRate, TaxRate),
    policy: PaymentPolicy,
    step: CheckoutStep,
    review: Option<CheckoutReview>,
    room_inspected: bool,
    payment_method: String,
    amount: Option<Decimal>,
    receipt: Option<PaymentReceipt>,
}

impl<H: HttpClient> CheckoutWizard<H> {
    pub fn new(api: HotelApi<H>, booking_id: impl Into<String>) -> Self {
        Self {
            api,
            booking_id: booking_id.into(),
            default_rates: (
                TaxRate::from_percent(Decimal::new(25, 1)),
                TaxRate::from_percent(Decimal::new(25, 1)),
            ),
            policy: PaymentPolicy::default(),
            step: CheckoutStep::Review,
            review: None,
            room_inspected: false,
            payment_method: "cash".into(),
            amount: None,
            receipt: None,
        }
    }

    pub fn with_policy(mut self, policy: PaymentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_default_rates(mut self, cgst: TaxRate, sgst: TaxRate) -> Self {
        self.default_rates = (cgst, sgst);
        self
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn review(&self) -> Option<&CheckoutReview> {
        self.review.as_ref()
    }

    pub fn receipt(&self) -> Option<&PaymentReceipt> {
        self.receipt.as_ref()
    }

    pub fn room_inspected(&self) -> bool {
        self.room_inspected
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Amount to be paid: the entered value, else the balance due
    pub fn amount(&self) -> Option<Decimal> {
        self.amount
            .or_else(|| self.review.as_ref().map(|r| r.balance_due))
    }

    /// Load the Review step
    ///
    /// The booking lookup falls back to the full listing. A missing charges
    /// aggregate degrades to the booking's own figures. The checkout record
    /// is created only when none exists yet.
    pub async fn load(&mut self) -> AppResult<&CheckoutReview> {
        self.ensure_step(CheckoutStep::Review)?;

        let booking = self.api.find_booking(&self.booking_id).await?;

        let charges = match self.api.booking_charges(&self.booking_id).await {
            Ok(charges) => charges,
            Err(e) => {
                tracing::warn!(booking_id = %self.booking_id, error = %e, "Charges aggregate unavailable, using booking figures");
                BookingCharges::default()
            }
        };

        let checkout = match self.api.checkout_for_booking(&self.booking_id).await? {
            Some(checkout) => checkout,
            None => {
                tracing::info!(booking_id = %self.booking_id, "Creating checkout record");
                self.api.create_checkout(&self.booking_id).await?
            }
        };

        let summary = summarize(&ChargeInputs::from_booking(
            &booking,
            &charges,
            self.default_rates,
        ));
        let advances = money::sum(booking.advance_payments.iter().map(|p| p.amount));
        let balance_due = summary.balance_due(advances);

        tracing::info!(
            booking_id = %self.booking_id,
            checkout_id = %checkout.id,
            total = %summary.total_amount,
            balance_due = %balance_due,
            "Checkout review loaded"
        );

        Ok(&*self.review.insert(CheckoutReview {
            booking,
            charges,
            summary,
            checkout,
            advances,
            balance_due,
        }))
    }

    /// Tick or untick the room-inspected checklist
    pub fn set_room_inspected(&mut self, inspected: bool) {
        self.room_inspected = inspected;
    }

    /// Review → Payment
    pub fn proceed_to_payment(&mut self) -> AppResult<()> {
        self.ensure_step(CheckoutStep::Review)?;
        let review = self.review.as_ref().ok_or_else(|| AppError::new(ErrorCode::CheckoutNotLoaded))?;
        if review.checkout.status == CheckoutStatus::Paid {
            return Err(AppError::new(ErrorCode::CheckoutAlreadyPaid)
                .with_detail("checkout_id", review.checkout.id.as_str()));
        }
        if !self.room_inspected {
            return Err(AppError::with_message(
                ErrorCode::RoomInspectionRequired,
                "Confirm the room has been inspected before taking payment",
            ));
        }
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Payment → Review; every other backward move is rejected
    pub fn back(&mut self) -> AppResult<()> {
        self.ensure_step(CheckoutStep::Payment)?;
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Free-form payment method (cash, card, UPI, bank transfer, ...)
    pub fn set_payment_method(&mut self, method: impl Into<String>) {
        self.payment_method = method.into();
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = Some(money::to_decimal(amount));
    }

    /// Submit the payment and move to Complete
    pub async fn pay(&mut self) -> AppResult<&PaymentReceipt> {
        self.ensure_step(CheckoutStep::Payment)?;
        let review = self.review.as_ref().ok_or_else(|| AppError::new(ErrorCode::CheckoutNotLoaded))?;

        let amount = round_amount(self.amount.unwrap_or(review.balance_due));
        if let Err(e) = self.policy.check(amount, review.balance_due) {
            tracing::warn!(booking_id = %self.booking_id, code = %e.code, "Payment rejected: {}", e.message);
            return Err(e);
        }

        let method = self.payment_method.trim();
        let request = PaymentRequest {
            status: CheckoutStatus::Paid,
            paid_amount: money::to_f64(amount),
            payment_method: (!method.is_empty()).then(|| method.to_string()),
        };
        let checkout_id = review.checkout.id.clone();

        self.api
            .pay_checkout(&checkout_id, &request)
            .await
            .inspect_err(|e| {
                tracing::error!(checkout_id = %checkout_id, error = %e, "Checkout payment failed");
            })?;

        // Within tolerance counts as settled
        let mut remaining = (review.balance_due - amount).max(Decimal::ZERO);
        if remaining <= MONEY_TOLERANCE {
            remaining = Decimal::ZERO;
        }
        tracing::info!(
            checkout_id = %checkout_id,
            paid = %amount,
            remaining = %remaining,
            "Checkout paid"
        );

        if let Some(review) = self.review.as_mut() {
            review.checkout.status = CheckoutStatus::Paid;
            review.checkout.paid_amount = Some(request.paid_amount);
            review.checkout.payment_method = request.payment_method.clone();
        }
        self.step = CheckoutStep::Complete;

        Ok(&*self.receipt.insert(PaymentReceipt {
            checkout_id,
            booking_id: self.booking_id.clone(),
            paid_amount: amount,
            payment_method: request.payment_method.unwrap_or_default(),
            remaining,
        }))
    }

    /// Close the wizard from Complete
    pub fn complete(&self) -> AppResult<RefreshSignal> {
        self.ensure_step(CheckoutStep::Complete)?;
        Ok(RefreshSignal {
            booking_id: self.booking_id.clone(),
        })
    }

    fn ensure_step(&self, expected: CheckoutStep) -> AppResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(AppError::with_message(
                ErrorCode::CheckoutStepInvalid,
                format!("Checkout is at {:?}, expected {:?}", self.step, expected),
            ))
        }
    }
}

fn round_amount(amount: Decimal) -> Decimal {
    money::round_money(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejects_non_positive() {
        let err = PaymentPolicy::partial()
            .check(Decimal::ZERO, Decimal::from(10))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);
    }

    #[test]
    fn test_policy_partial_payment() {
        let balance = Decimal::from(1000);
        let err = PaymentPolicy::strict()
            .check(Decimal::from(999), balance)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInsufficientAmount);
        assert!(PaymentPolicy::partial().check(Decimal::from(999), balance).is_ok());
        assert!(PaymentPolicy::strict().check(Decimal::new(99999, 2), balance).is_ok());
        assert!(PaymentPolicy::strict().check(Decimal::from(1200), balance).is_ok());
    }
}
