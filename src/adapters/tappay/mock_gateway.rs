//! Mock payment gateway for tests and local development.
//!
//! Behaves like the TapPay sandbox:
//! - every charge succeeds with the `424242…4242` test card
//! - registered failing primes are declined with `card_declined`
//! - errors can be injected and calls are recorded

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::donation::CardInfo;
use crate::domain::foundation::Timestamp;
use crate::ports::{ChargeReceipt, ChargeRequest, PaymentError, PaymentGateway};

/// Prime the sandbox always declines.
pub const FAILING_TEST_PRIME: &str = "test_prime_which_will_occurs_error";

/// Mock payment gateway.
///
/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// gateway.set_error(PaymentError::network("connection reset"));
/// assert!(gateway.charge(request).await.is_err());
/// assert_eq!(gateway.call_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

struct MockState {
    failing_primes: HashSet<String>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Artificial latency per call.
    delay: Option<Duration>,

    call_log: Vec<ChargeCall>,

    sequence: u64,
}

/// Recorded charge for assertions. The prime itself is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeCall {
    pub order_number: String,
    pub amount: i64,
    pub merchant_id: String,
    pub remember: bool,
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        let mut failing_primes = HashSet::new();
        failing_primes.insert(FAILING_TEST_PRIME.to_string());
        Self {
            inner: Arc::new(Mutex::new(MockState {
                failing_primes,
                next_error: None,
                delay: None,
                call_log: Vec::new(),
                sequence: 0,
            })),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Decline every charge made with `prime`.
    pub fn fail_prime(&self, prime: impl Into<String>) {
        self.inner.lock().unwrap().failing_primes.insert(prime.into());
    }

    /// Return `error` from the next charge.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Sleep before answering each charge.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertion Helpers
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<ChargeCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeReceipt, PaymentError> {
        let delay = {
            let mut state = self.inner.lock().unwrap();
            state.call_log.push(ChargeCall {
                order_number: request.order_number.to_string(),
                amount: request.amount.value(),
                merchant_id: request.merchant_id.clone(),
                remember: request.remember,
            });
            state.delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.inner.lock().unwrap();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if state.failing_primes.contains(&request.prime) {
            return Err(PaymentError::card_declined("Card Error").with_provider_code("10003"));
        }

        state.sequence += 1;
        Ok(ChargeReceipt {
            transaction_id: format!("D{}{:06}", Timestamp::now().compact(), state.sequence),
            bank_transaction_id: Some(format!("TP{:010}", state.sequence)),
            card_info: CardInfo {
                bin_code: "424242".to_string(),
                last_four: "4242".to_string(),
                funding: 0,
                issuer: None,
                card_type: Some(1),
                country: Some("UNITED KINGDOM".to_string()),
            },
            acquirer: Some("TW_CTBC".to_string()),
            payment_url: None,
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_request(prime: &str) -> ChargeRequest {
    use crate::domain::donation::{Amount, Cardholder, Currency, OrderNumber};

    ChargeRequest {
        prime: prime.to_string(),
        amount: Amount::new(500).unwrap(),
        currency: Currency::default(),
        merchant_id: "GlobalTesting_CTBC".to_string(),
        details: "Donation".to_string(),
        order_number: OrderNumber::generate("test", Timestamp::now()),
        cardholder: Cardholder::new("donor@example.com").unwrap(),
        remember: false,
        result_url: None,
    }
}
