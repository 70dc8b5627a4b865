//! Account aggregate.

use crate::domain::foundation::{Identity, Timestamp, UserId};

use super::activation::verify_token;
use super::AccountError;

/// A donor account, identified by email.
///
/// Accounts are created inactive on first sign-in and become active the first
/// time an activation token is redeemed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub email: String,
    pub active: bool,
    pub activation_hash: Option<String>,
    pub activation_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Account {
    /// New inactive account for `email`.
    pub fn register(email: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            active: false,
            activation_hash: None,
            activation_expires_at: None,
            created_at: Timestamp::now(),
        }
    }

    /// Checks a presented activation token against the stored digest.
    ///
    /// Missing, expired and mismatched tokens are all reported the same way.
    pub fn check_activation(&self, presented: &str, now: Timestamp) -> Result<(), AccountError> {
        let (hash, expires_at) = match (&self.activation_hash, &self.activation_expires_at) {
            (Some(hash), Some(expires_at)) => (hash, *expires_at),
            _ => return Err(AccountError::InvalidActivation),
        };
        if !verify_token(presented, hash) {
            return Err(AccountError::InvalidActivation);
        }
        if expires_at.is_before(&now) {
            return Err(AccountError::InvalidActivation);
        }
        Ok(())
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.id.clone(), self.email.clone())
    }
}
