//! Account handlers.
//!
//! Passwordless sign-in: a sign-in mails a one-time activation link, redeeming
//! the link yields an identity token, and a valid token can be renewed.

mod activate;
mod renew_token;
mod sign_in;

use std::future::Future;
use std::time::Duration;

use crate::domain::account::AccountError;
use crate::domain::foundation::DomainError;

pub use activate::{ActivateCommand, ActivateHandler, ActivateResult};
pub use renew_token::{RenewTokenCommand, RenewTokenHandler, RenewTokenResult};
pub use sign_in::{SignInCommand, SignInHandler, SignInResult};

/// Settings shared by the account handlers.
#[derive(Debug, Clone)]
pub struct AccountSettings {
    /// Lifetime of an activation token in seconds.
    pub activation_ttl_secs: i64,
    /// Base of the link mailed on sign-in; email, token and destination are appended.
    pub activation_base_url: String,
    pub storage_timeout: Duration,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            activation_ttl_secs: 15 * 60,
            activation_base_url: "http://localhost:8080/v2/auth/activate".to_string(),
            storage_timeout: Duration::from_secs(3),
        }
    }
}

pub(crate) async fn within<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, AccountError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(AccountError::from),
        Err(_) => {
            tracing::error!(operation, timeout_ms = limit.as_millis() as u64, "Storage call timed out");
            Err(AccountError::infrastructure(format!(
                "{} timed out after {:?}",
                operation, limit
            )))
        }
    }
}
