//! Outbound mail port.
//!
//! Mail is best effort: callers log failures and carry on.

use async_trait::async_trait;

use crate::domain::donation::Donation;
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the sign-in link. `link` carries a one-time token.
    async fn send_activation(&self, email: &str, link: &str) -> Result<(), DomainError>;

    /// Send the receipt for a newly created donation.
    async fn send_donation_receipt(&self, donation: &Donation) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailer_is_object_safe() {
        fn _accepts_dyn(_mailer: &dyn Mailer) {}
    }
}
