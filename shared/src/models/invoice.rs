//! Invoice client details and saved GST profiles

use serde::{Deserialize, Serialize};

/// Placeholder the invoice shows for missing client fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Payer details printed on an invoice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub company: String,
    #[serde(alias = "mobileNumber", default)]
    pub mobile_no: String,
    #[serde(default)]
    pub gstin: String,
}

impl ClientDetails {
    /// The GSTIN when it is usable as a lookup key
    pub fn valid_gstin(&self) -> Option<&str> {
        valid_gstin(&self.gstin)
    }

    /// Fill blank or placeholder fields from a saved profile
    pub fn backfill_from(&mut self, profile: &GstProfile) {
        fn pick(current: &mut String, saved: &str) {
            if !saved.trim().is_empty() {
                *current = saved.to_string();
            }
        }
        pick(&mut self.name, &profile.name);
        pick(&mut self.address, &profile.address);
        pick(&mut self.city, &profile.city);
        pick(&mut self.company, &profile.company);
        pick(&mut self.mobile_no, &profile.mobile_number);
    }

    /// Overlay a previously saved invoice snapshot (non-empty fields win)
    pub fn merge(&mut self, saved: &ClientDetails) {
        let fields = [
            (&mut self.name, &saved.name),
            (&mut self.address, &saved.address),
            (&mut self.city, &saved.city),
            (&mut self.company, &saved.company),
            (&mut self.mobile_no, &saved.mobile_no),
            (&mut self.gstin, &saved.gstin),
        ];
        for (current, saved) in fields {
            if !saved.trim().is_empty() {
                *current = saved.clone();
            }
        }
    }
}

/// A GSTIN that is neither blank nor the "N/A" placeholder
pub fn valid_gstin(gstin: &str) -> Option<&str> {
    let trimmed = gstin.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
        None
    } else {
        Some(trimmed)
    }
}

/// Client profile persisted by GST number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstProfile {
    #[serde(default)]
    pub gst_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub mobile_number: String,
}

impl GstProfile {
    pub fn from_client(gstin: &str, client: &ClientDetails) -> Self {
        Self {
            gst_number: gstin.to_string(),
            name: client.name.clone(),
            address: client.address.clone(),
            city: client.city.clone(),
            company: client.company.clone(),
            mobile_number: client.mobile_no.clone(),
        }
    }
}

/// `POST /api/restaurant-invoices/save` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRestaurantInvoice {
    pub order_id: String,
    pub client_details: ClientDetails,
}

/// Saved restaurant invoice snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInvoiceRecord {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub client_details: ClientDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_gstin() {
        assert_eq!(valid_gstin(" 29ABCDE1234F1Z5 "), Some("29ABCDE1234F1Z5"));
        assert_eq!(valid_gstin(""), None);
        assert_eq!(valid_gstin("N/A"), None);
        assert_eq!(valid_gstin("n/a"), None);
    }

    #[test]
    fn test_backfill_keeps_current_when_profile_blank() {
        let mut client = ClientDetails {
            name: "Walk-in".into(),
            city: "Pune".into(),
            ..Default::default()
        };
        let profile = GstProfile {
            name: "Acme Pvt Ltd".into(),
            mobile_number: "98200".into(),
            ..Default::default()
        };
        client.backfill_from(&profile);
        assert_eq!(client.name, "Acme Pvt Ltd");
        assert_eq!(client.city, "Pune");
        assert_eq!(client.mobile_no, "98200");
    }

    #[test]
    fn test_merge_saved_snapshot() {
        let mut client = ClientDetails {
            name: "Guest".into(),
            gstin: NOT_AVAILABLE.into(),
            ..Default::default()
        };
        let saved = ClientDetails {
            gstin: "29ABCDE1234F1Z5".into(),
            company: "Acme".into(),
            ..Default::default()
        };
        client.merge(&saved);
        assert_eq!(client.name, "Guest");
        assert_eq!(client.gstin, "29ABCDE1234F1Z5");
        assert_eq!(client.company, "Acme");
    }
}
