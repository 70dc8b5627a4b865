//! TapPay payment gateway adapter.
//!
//! Implements `PaymentGateway` with TapPay's pay-by-prime endpoint.
//!
//! # Security
//!
//! - The partner key is held as `secrecy::SecretString` and sent only in the
//!   `x-api-key` header and request body
//! - Primes and partner keys are never logged
//!
//! # Configuration
//!
//! ```ignore
//! let config = TapPayConfig::new(partner_key).with_base_url("https://sandbox.tappaysdk.com");
//! let gateway = TapPayGateway::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{ChargeReceipt, ChargeRequest, PaymentError, PaymentGateway};

use super::wire::{PayByPrimeRequest, PayByPrimeResponse};

const PAY_BY_PRIME_PATH: &str = "/tpc/payment/pay-by-prime";

/// TapPay API configuration.
#[derive(Clone)]
pub struct TapPayConfig {
    partner_key: SecretString,

    /// Base URL (default: TapPay sandbox).
    api_base_url: String,

    /// Whole-request timeout.
    timeout: Duration,

    connect_timeout: Duration,
}

impl TapPayConfig {
    pub fn new(partner_key: SecretString) -> Self {
        Self {
            partner_key,
            api_base_url: "https://sandbox.tappaysdk.com".to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        if self.connect_timeout > timeout {
            self.connect_timeout = timeout;
        }
        self
    }
}

/// TapPay gateway adapter.
pub struct TapPayGateway {
    config: TapPayConfig,
    http_client: reqwest::Client,
}

impl TapPayGateway {
    pub fn new(config: TapPayConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| PaymentError::provider(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.config.api_base_url, PAY_BY_PRIME_PATH)
    }
}

#[async_trait]
impl PaymentGateway for TapPayGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, PaymentError> {
        let partner_key = self.config.partner_key.expose_secret();
        let body = PayByPrimeRequest::from_charge(&request, partner_key);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-api-key", partner_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::timeout(format!("TapPay did not answer in time: {}", e))
                } else {
                    PaymentError::network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(
                order_number = %request.order_number,
                http_status = %status,
                "TapPay pay-by-prime returned an HTTP error"
            );
            return Err(PaymentError::provider(format!(
                "TapPay API error: HTTP {}",
                status
            )));
        }

        let parsed: PayByPrimeResponse = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse TapPay response: {}", e))
        })?;

        if !parsed.is_success() {
            tracing::warn!(
                order_number = %request.order_number,
                gateway_status = parsed.status,
                gateway_msg = %parsed.msg,
                "TapPay declined charge"
            );
            return Err(PaymentError::card_declined(parsed.msg.clone())
                .with_provider_code(parsed.status.to_string()));
        }

        tracing::info!(
            order_number = %request.order_number,
            transaction_id = %parsed.rec_trade_id,
            "TapPay charge succeeded"
        );
        Ok(parsed.into_receipt())
    }
}
