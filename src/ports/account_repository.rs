//! Account repository port.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Repository port for donor accounts.
///
/// Email is unique across accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, DomainError>;

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the email is already registered
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, account: &Account) -> Result<(), DomainError>;

    /// Replace the pending activation token digest.
    async fn set_activation(
        &self,
        id: &UserId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), DomainError>;

    /// Mark the account active and clear its activation token.
    async fn activate(&self, id: &UserId) -> Result<(), DomainError>;
}
