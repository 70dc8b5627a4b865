//! Payment gateway port for charging donations.
//!
//! A charge is a single pay-by-prime call: the client-side SDK tokenised the
//! card into a one-time `prime`, and the gateway turns it into a transaction.
//!
//! # Design
//!
//! - **Single attempt**: callers never retry a charge; a retried prime could
//!   double-bill, so failures are surfaced and logged with the order number.
//! - **Gateway agnostic**: the domain sees only [`ChargeReceipt`] and [`PaymentError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::donation::{Amount, CardInfo, Cardholder, Currency, OrderNumber, ResultUrl};
use crate::domain::foundation::{DomainError, ErrorCode};

/// Port for the card payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge the card behind `request.prime`.
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, PaymentError>;
}

/// Everything the gateway needs for one charge.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// One-time card token. Never logged.
    pub prime: String,
    pub amount: Amount,
    pub currency: Currency,
    /// Configured merchant; request bodies cannot override it.
    pub merchant_id: String,
    pub details: String,
    pub order_number: OrderNumber,
    pub cardholder: Cardholder,
    /// Ask the gateway for a reusable card secret (periodic donations).
    pub remember: bool,
    pub result_url: Option<ResultUrl>,
}

/// Successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeReceipt {
    /// Gateway transaction id (`rec_trade_id` for TapPay).
    pub transaction_id: String,
    pub bank_transaction_id: Option<String>,
    pub card_info: CardInfo,
    /// Gateway-side acquirer identifier, when reported.
    pub acquirer: Option<String>,
    /// Redirect for wallet flows that need a second step.
    pub payment_url: Option<String>,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Gateway's own status code (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Timeout, message)
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::CardDeclined => ErrorCode::PaymentFailed,
            PaymentErrorCode::Timeout => ErrorCode::Timeout,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Gateway unreachable or connection dropped.
    NetworkError,

    /// No answer within the configured timeout.
    Timeout,

    /// Gateway answered with a non-zero status.
    CardDeclined,

    /// Response could not be understood.
    ProviderError,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::Timeout => "timeout",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn declined_error_maps_to_payment_failed() {
        let err: DomainError = PaymentError::card_declined("insufficient funds").into();
        assert_eq!(err.code, ErrorCode::PaymentFailed);
    }

    #[test]
    fn timeout_maps_to_timeout_code() {
        let err: DomainError = PaymentError::timeout("10s elapsed").into();
        assert_eq!(err.code, ErrorCode::Timeout);
    }

    #[test]
    fn provider_code_is_kept() {
        let err = PaymentError::card_declined("declined").with_provider_code("10003");
        assert_eq!(err.provider_code.as_deref(), Some("10003"));
        assert_eq!(err.to_string(), "card_declined: declined");
    }
}
