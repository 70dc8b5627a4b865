//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - Card charging by one-time prime
//! - `DonationRepository` - Donation storage, separated by kind
//! - `AccountRepository` - Donor accounts and activation tokens
//! - `IdentityTokenCodec` - Bearer and cookie token strategies
//! - `Mailer` - Activation links and receipts

mod account_repository;
mod donation_repository;
mod identity_token;
mod mailer;
mod payment_gateway;

pub use account_repository::AccountRepository;
pub use donation_repository::{DonationPage, DonationQuery, DonationRepository};
pub use identity_token::IdentityTokenCodec;
pub use mailer::Mailer;
pub use payment_gateway::{
    ChargeReceipt, ChargeRequest, PaymentError, PaymentErrorCode, PaymentGateway,
};
