//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which gateway adapter charges donations.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Tappay,
    Mock,
}

/// Payment configuration (TapPay)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub mode: PaymentMode,

    /// TapPay partner key
    #[serde(default = "empty_secret")]
    pub partner_key: SecretString,

    /// Merchant charged for every donation
    #[serde(default)]
    pub merchant_id: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Gateway call budget in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_order_number_prefix")]
    pub order_number_prefix: String,

    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl PaymentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn is_sandbox(&self) -> bool {
        self.api_base_url.contains("sandbox")
    }

    /// Validate payment configuration
    ///
    /// The gateway budget has to fit inside the server's request timeout so a
    /// slow charge still produces a JSend error instead of a dropped request.
    pub fn validate(&self, request_timeout: Duration) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 || self.timeout() >= request_timeout {
            return Err(ValidationError::PaymentTimeoutTooLong);
        }
        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.mode == PaymentMode::Mock {
            return Ok(());
        }
        if self.partner_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PARTNER_KEY"));
        }
        if self.merchant_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__MERCHANT_ID"));
        }
        if reqwest::Url::parse(&self.api_base_url).is_err() {
            return Err(ValidationError::InvalidUrl("PAYMENT__API_BASE_URL"));
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            mode: PaymentMode::default(),
            partner_key: empty_secret(),
            merchant_id: String::new(),
            api_base_url: default_api_base_url(),
            timeout_ms: default_timeout_ms(),
            order_number_prefix: default_order_number_prefix(),
            default_currency: default_currency(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_api_base_url() -> String {
    "https://sandbox.tappaysdk.com".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_order_number_prefix() -> String {
    "donation".to_string()
}

fn default_currency() -> String {
    "TWD".to_string()
}
