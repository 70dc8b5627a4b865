//! Donor accounts and passwordless activation.

mod activation;
mod aggregate;
mod errors;

pub use activation::{hash_token, verify_token, ActivationToken};
pub use aggregate::Account;
pub use errors::AccountError;
