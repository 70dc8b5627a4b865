//! ListDonationsHandler - Query handler for an owner's donations of both kinds.

use std::sync::Arc;

use crate::domain::donation::{Donation, DonationError, DonationKind, PayMethod};
use crate::domain::foundation::{Identity, UserId};
use crate::ports::{DonationQuery, DonationRepository};

use super::{within, DonationSettings};

#[derive(Debug, Clone)]
pub struct ListDonationsQuery {
    pub identity: Identity,
    /// Owner named in the path.
    pub owner: UserId,
    pub offset: u32,
    pub limit: u32,
    /// Empty means every pay method.
    pub pay_methods: Vec<PayMethod>,
}

#[derive(Debug, Clone)]
pub struct ListDonationsResult {
    /// Prime and periodic records, newest first.
    pub records: Vec<Donation>,
    pub total: u64,
    pub offset: u32,
    pub limit: u32,
}

pub struct ListDonationsHandler {
    repository: Arc<dyn DonationRepository>,
    settings: DonationSettings,
}

impl ListDonationsHandler {
    pub fn new(repository: Arc<dyn DonationRepository>, settings: DonationSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn handle(
        &self,
        query: ListDonationsQuery,
    ) -> Result<ListDonationsResult, DonationError> {
        if query.owner != query.identity.id {
            return Err(DonationError::forbidden(
                "Donations of another user cannot be listed",
            ));
        }

        if query.offset > DonationQuery::MAX_OFFSET {
            return Err(DonationError::validation(
                "offset",
                format!("must not exceed {}", DonationQuery::MAX_OFFSET),
            ));
        }
        let limit = query.limit.min(DonationQuery::MAX_LIMIT);

        // Each kind is paged from zero up to offset + limit so the merged
        // window is complete before it is cut. The offset ceiling bounds
        // how many rows that reads.
        let per_kind = DonationQuery {
            offset: 0,
            limit: query.offset.saturating_add(limit),
            pay_methods: query.pay_methods.clone(),
        };

        let mut records = Vec::new();
        let mut total = 0u64;
        for kind in [DonationKind::Prime, DonationKind::Periodic] {
            let page = within(
                self.settings.storage_timeout,
                "list donations",
                self.repository.find_by_owner(kind, &query.owner, &per_kind),
            )
            .await?;
            total += page.total;
            records.extend(page.records);
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let records = records
            .into_iter()
            .skip(query.offset as usize)
            .take(limit as usize)
            .collect();

        Ok(ListDonationsResult {
            records,
            total,
            offset: query.offset,
            limit,
        })
    }
}
