//! GetDonationHandler - Query handler for a single donation.

use std::sync::Arc;

use crate::domain::donation::{Donation, DonationError, DonationKind};
use crate::domain::foundation::{check_claim, Identity, OwnedByUser, UserId};
use crate::ports::DonationRepository;

use super::{parse_id, within, DonationSettings};

#[derive(Debug, Clone)]
pub struct GetDonationQuery {
    pub identity: Identity,
    pub kind: DonationKind,
    pub id: String,
    /// `user_id` from the query string, if given.
    pub claimed_user_id: Option<UserId>,
}

pub struct GetDonationHandler {
    repository: Arc<dyn DonationRepository>,
    settings: DonationSettings,
}

impl GetDonationHandler {
    pub fn new(repository: Arc<dyn DonationRepository>, settings: DonationSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn handle(&self, query: GetDonationQuery) -> Result<Donation, DonationError> {
        check_claim(&query.identity, query.claimed_user_id.as_ref())?;

        let id = parse_id(&query.id)?;
        let donation = within(
            self.settings.storage_timeout,
            "find donation",
            self.repository.find_by_id(query.kind, &id),
        )
        .await?
        .ok_or(DonationError::NotFound)?;

        donation.check_ownership(&query.identity.id)?;
        Ok(donation)
    }
}
