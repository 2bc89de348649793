//! Client profiles keyed by GSTIN
//!
//! A payer's details are saved under their GST number and reused on later
//! invoices to the same payer. Restaurant invoices additionally keep a
//! per-order snapshot of the edited client block.

use pms_client::{HotelApi, HttpClient};
use shared::models::{ClientDetails, GstProfile, SaveRestaurantInvoice, valid_gstin};
use shared::{AppError, AppResult, ErrorCode};

use super::document::{Invoice, InvoiceKind};

pub struct ClientProfiles<H> {
    api: HotelApi<H>,
}

impl<H: HttpClient> ClientProfiles<H> {
    pub fn new(api: HotelApi<H>) -> Self {
        Self { api }
    }

    /// Persist client details under `gstin`
    ///
    /// Blank or "N/A" numbers are rejected before any request is made.
    /// When `order_id` is given the restaurant invoice snapshot is saved
    /// as well.
    pub async fn save_client_details(
        &self,
        gstin: &str,
        fields: &ClientDetails,
        order_id: Option<&str>,
    ) -> AppResult<GstProfile> {
        let gstin = valid_gstin(gstin).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::GstinRequired,
                "Valid GST Number is required to save details",
            )
        })?;

        let profile = GstProfile::from_client(gstin, fields);
        self.api.save_gst_profile(&profile).await?;
        tracing::info!(gstin = %gstin, "GST profile saved");

        if let Some(order_id) = order_id {
            let snapshot = SaveRestaurantInvoice {
                order_id: order_id.to_string(),
                client_details: ClientDetails {
                    gstin: gstin.to_string(),
                    ..fields.clone()
                },
            };
            self.api.save_restaurant_invoice(&snapshot).await?;
            tracing::info!(order_id = %order_id, "Restaurant invoice details saved");
        }

        Ok(profile)
    }

    /// Save the client block currently on an invoice
    pub async fn save_invoice_client(&self, invoice: &Invoice) -> AppResult<GstProfile> {
        let order_id = match invoice.kind {
            InvoiceKind::Restaurant => Some(invoice.source_id.as_str()),
            InvoiceKind::Booking => None,
        };
        self.save_client_details(&invoice.client.gstin, &invoice.client, order_id)
            .await
    }

    /// Fill client details from the saved profile of its GSTIN
    ///
    /// Returns whether a profile was applied. Unknown numbers and lookup
    /// failures leave the details untouched.
    pub async fn backfill(&self, client: &mut ClientDetails) -> bool {
        let Some(gstin) = client.valid_gstin().map(str::to_string) else {
            return false;
        };
        match self.api.gst_profile(&gstin).await {
            Ok(Some(profile)) => {
                client.backfill_from(&profile);
                tracing::debug!(gstin = %gstin, "Client details backfilled from GST profile");
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(gstin = %gstin, error = %e, "GST profile lookup failed");
                false
            }
        }
    }

    /// Apply saved client details to a freshly built invoice
    ///
    /// Restaurant invoices prefer their saved snapshot and fall back to the
    /// GST profile; booking invoices use the GST profile only.
    pub async fn hydrate(&self, invoice: &mut Invoice) {
        if invoice.kind == InvoiceKind::Restaurant {
            match self.api.restaurant_invoice(&invoice.source_id).await {
                Ok(Some(saved)) => {
                    invoice.client.merge(&saved.client_details);
                    return;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(order_id = %invoice.source_id, error = %e, "Saved invoice lookup failed");
                }
            }
        }
        self.backfill(&mut invoice.client).await;
    }
}
