//! In-memory donation repository.
//!
//! Used by tests and by `storage = "memory"` development runs. Each kind has
//! its own map, mirroring the separate tables in PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::donation::{Donation, DonationKind, DonationPatch};
use crate::domain::foundation::{DomainError, DonationId, ErrorCode, UserId};
use crate::ports::{DonationPage, DonationQuery, DonationRepository};

#[derive(Default)]
struct Tables {
    prime: HashMap<DonationId, Donation>,
    periodic: HashMap<DonationId, Donation>,
}

impl Tables {
    fn table(&self, kind: DonationKind) -> &HashMap<DonationId, Donation> {
        match kind {
            DonationKind::Prime => &self.prime,
            DonationKind::Periodic => &self.periodic,
        }
    }

    fn table_mut(&mut self, kind: DonationKind) -> &mut HashMap<DonationId, Donation> {
        match kind {
            DonationKind::Prime => &mut self.prime,
            DonationKind::Periodic => &mut self.periodic,
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryDonationRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDonationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored donations of `kind`.
    pub async fn count(&self, kind: DonationKind) -> usize {
        self.tables.read().await.table(kind).len()
    }
}

#[async_trait]
impl DonationRepository for InMemoryDonationRepository {
    async fn insert(&self, donation: &Donation) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;

        let duplicate = tables
            .prime
            .values()
            .chain(tables.periodic.values())
            .any(|d| d.order_number == donation.order_number);
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "duplicate order number",
            )
            .with_detail("order_number", donation.order_number.to_string()));
        }

        tables
            .table_mut(donation.kind)
            .insert(donation.id, donation.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        kind: DonationKind,
        id: &DonationId,
    ) -> Result<Option<Donation>, DomainError> {
        Ok(self.tables.read().await.table(kind).get(id).cloned())
    }

    async fn find_by_owner(
        &self,
        kind: DonationKind,
        owner: &UserId,
        query: &DonationQuery,
    ) -> Result<DonationPage, DomainError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Donation> = tables
            .table(kind)
            .values()
            .filter(|d| &d.owner_id == owner && query.matches(d.pay_method))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let records = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        Ok(DonationPage { records, total })
    }

    async fn update_fields(
        &self,
        kind: DonationKind,
        id: &DonationId,
        patch: &DonationPatch,
    ) -> Result<Option<Donation>, DomainError> {
        let mut tables = self.tables.write().await;
        match tables.table_mut(kind).get_mut(id) {
            Some(donation) => {
                patch.apply(donation);
                Ok(Some(donation.clone()))
            }
            None => Ok(None),
        }
    }
}
