//! Donation handlers.
//!
//! ## Commands
//! - Creating one-time and periodic donations (charge, then persist)
//! - Patching the editable fields of a stored donation
//!
//! ## Queries
//! - Get one donation
//! - List an owner's donations across both kinds

mod create_donation;
mod get_donation;
mod list_donations;
mod patch_donation;

use std::future::Future;
use std::time::Duration;

use crate::domain::donation::DonationError;
use crate::domain::foundation::DonationId;

// Commands
pub use create_donation::{CreateDonationCommand, CreateDonationHandler, CreateDonationResult};
pub use patch_donation::{PatchDonationCommand, PatchDonationHandler};

// Queries
pub use get_donation::{GetDonationHandler, GetDonationQuery};
pub use list_donations::{ListDonationsHandler, ListDonationsQuery, ListDonationsResult};

/// Settings shared by the donation handlers.
#[derive(Debug, Clone)]
pub struct DonationSettings {
    /// Merchant charged on every donation.
    pub merchant_id: String,
    pub order_number_prefix: String,
    /// Used when a create request names no currency.
    pub default_currency: String,
    /// Ceiling for one gateway charge.
    pub gateway_timeout: Duration,
    /// Ceiling for one storage call.
    pub storage_timeout: Duration,
}

impl Default for DonationSettings {
    fn default() -> Self {
        Self {
            merchant_id: String::new(),
            order_number_prefix: "donation".to_string(),
            default_currency: "TWD".to_string(),
            gateway_timeout: Duration::from_secs(10),
            storage_timeout: Duration::from_secs(3),
        }
    }
}

/// Runs a storage call under the storage ceiling.
pub(crate) async fn within<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, DonationError>
where
    F: Future<Output = Result<T, crate::domain::foundation::DomainError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(DonationError::from),
        Err(_) => {
            tracing::error!(operation, timeout_ms = limit.as_millis() as u64, "Storage call timed out");
            Err(DonationError::infrastructure(format!(
                "{} timed out after {:?}",
                operation, limit
            )))
        }
    }
}

/// Parses a path id. Anything that is not a donation id cannot exist.
pub(crate) fn parse_id(raw: &str) -> Result<DonationId, DonationError> {
    raw.parse::<DonationId>().map_err(|_| DonationError::NotFound)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::mailer::LoggingMailer;
    use crate::adapters::memory::InMemoryDonationRepository;
    use crate::adapters::tappay::MockPaymentGateway;
    use crate::domain::donation::{CardholderDraft, DonationDraft};
    use crate::domain::foundation::{Identity, UserId};

    pub struct Fixture {
        pub repo: Arc<InMemoryDonationRepository>,
        pub gateway: Arc<MockPaymentGateway>,
        pub mailer: Arc<LoggingMailer>,
        pub settings: DonationSettings,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                repo: Arc::new(InMemoryDonationRepository::new()),
                gateway: Arc::new(MockPaymentGateway::new()),
                mailer: Arc::new(LoggingMailer::new()),
                settings: DonationSettings {
                    merchant_id: "GlobalTesting_CTBC".to_string(),
                    ..Default::default()
                },
            }
        }

        pub fn create_handler(&self) -> CreateDonationHandler {
            CreateDonationHandler::new(
                self.repo.clone(),
                self.gateway.clone(),
                self.mailer.clone(),
                self.settings.clone(),
            )
        }
    }

    pub fn identity(id: &str) -> Identity {
        Identity::new(UserId::new(id).unwrap(), format!("{}@example.com", id))
    }

    pub fn draft_for(user: &str) -> DonationDraft {
        DonationDraft {
            amount: Some(500),
            cardholder: Some(CardholderDraft {
                email: Some("developer@example.org".to_string()),
                phone_number: Some("+886912345678".to_string()),
                name: Some("Wang".to_string()),
                ..Default::default()
            }),
            pay_method: Some("credit_card".to_string()),
            prime: Some("test_prime".to_string()),
            user_id: Some(UserId::new(user).unwrap()),
            ..Default::default()
        }
    }
}
