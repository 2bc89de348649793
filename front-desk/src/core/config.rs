use std::time::Duration;

use pms_client::ClientConfig;
use shared::TaxRate;

use crate::billing::PaymentPolicy;

/// Front-desk configuration
///
/// # Environment
///
/// Every field can be overridden by an environment variable:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | API_BASE_URL | http://localhost:5000 | backend base URL |
/// | API_TOKEN | - | pre-issued bearer token |
/// | REQUEST_TIMEOUT_SECS | 30 | HTTP client timeout |
/// | KOT_POLL_INTERVAL_MS | 5000 | kitchen board poll period |
/// | ALERT_TTL_MS | 10000 | new-order alert lifetime |
/// | DEFAULT_CGST_RATE | 2.5 | CGST half (percent or fraction) |
/// | DEFAULT_SGST_RATE | 2.5 | SGST half (percent or fraction) |
/// | ALLOW_PARTIAL_PAYMENT | false | accept payments below the balance due |
/// | PAPER_WIDTH | 48 | ticket width in characters |
/// | LOG_LEVEL | info | log level |
/// | LOG_DIR | - | daily rolling log directory |
///
/// # Example
///
/// ```ignore
/// API_BASE_URL=https://pms.example.com KOT_POLL_INTERVAL_MS=3000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub kot_poll_interval_ms: u64,
    pub alert_ttl_ms: u64,
    pub default_cgst_rate: TaxRate,
    pub default_sgst_rate: TaxRate,
    pub allow_partial_payment: bool,
    /// 58mm paper: 32, 80mm paper: 48
    pub paper_width: usize,
    pub log_level: String,
    pub log_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_rate(key: &str) -> TaxRate {
    TaxRate::from_wire(env_or(key, 2.5))
}

impl Config {
    /// Load from the environment (call `dotenv().ok()` first)
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".into()),
            api_token: std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            kot_poll_interval_ms: env_or("KOT_POLL_INTERVAL_MS", 5000),
            alert_ttl_ms: env_or("ALERT_TTL_MS", 10_000),
            default_cgst_rate: env_rate("DEFAULT_CGST_RATE"),
            default_sgst_rate: env_rate("DEFAULT_SGST_RATE"),
            allow_partial_payment: env_or("ALLOW_PARTIAL_PAYMENT", false),
            paper_width: env_or("PAPER_WIDTH", 48),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// HTTP client settings
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_base_url).with_timeout(self.request_timeout_secs);
        match &self.api_token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.kot_poll_interval_ms.max(1))
    }

    pub fn alert_ttl(&self) -> Duration {
        Duration::from_millis(self.alert_ttl_ms)
    }

    pub fn default_rates(&self) -> (TaxRate, TaxRate) {
        (self.default_cgst_rate, self.default_sgst_rate)
    }

    pub fn payment_policy(&self) -> PaymentPolicy {
        PaymentPolicy {
            allow_partial: self.allow_partial_payment,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            api_token: None,
            request_timeout_secs: 30,
            kot_poll_interval_ms: 5000,
            alert_ttl_ms: 10_000,
            default_cgst_rate: TaxRate::from_wire(2.5),
            default_sgst_rate: TaxRate::from_wire(2.5),
            allow_partial_payment: false,
            paper_width: 48,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_default_rates_are_fractions() {
        let config = Config::default();
        assert_eq!(config.default_cgst_rate.fraction(), Decimal::new(25, 3));
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert!(!config.allow_partial_payment);
        assert_eq!(config.payment_policy(), PaymentPolicy::strict());
    }

    #[test]
    fn test_client_config_carries_token() {
        let config = Config {
            api_token: Some("abc".into()),
            request_timeout_secs: 5,
            ..Config::default()
        };
        let client = config.client_config();
        assert_eq!(client.token.as_deref(), Some("abc"));
        assert_eq!(client.timeout, 5);
    }
}
