//! TapPay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port with TapPay's pay-by-prime API, plus
//! a sandbox-like mock used in tests and `payment.mode = "mock"`.
//!
//! # Configuration
//!
//! - `DONATION__PAYMENT__PARTNER_KEY`: partner key (sent as `x-api-key`)
//! - `DONATION__PAYMENT__MERCHANT_ID`: merchant charged on every donation
//! - `DONATION__PAYMENT__API_BASE_URL`: sandbox or production host

pub(crate) mod mock_gateway;
mod tappay_gateway;
mod wire;

pub use mock_gateway::{ChargeCall, MockPaymentGateway, FAILING_TEST_PRIME};
pub use tappay_gateway::{TapPayConfig, TapPayGateway};
