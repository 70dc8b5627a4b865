//! Donation repository port.
//!
//! Prime and periodic donations live in separate collections. Every lookup
//! names the kind, so an id of one kind is never found through the other.
//!
//! # Example
//!
//! ```ignore
//! let donation = repo
//!     .find_by_id(DonationKind::Periodic, &id)
//!     .await?
//!     .ok_or(DonationError::NotFound)?;
//! donation.check_ownership(&identity.id)?;
//! ```

use async_trait::async_trait;

use crate::domain::donation::{Donation, DonationKind, DonationPatch, PayMethod};
use crate::domain::foundation::{DomainError, DonationId, UserId};

/// Paging and filtering for owner listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationQuery {
    pub offset: u32,
    pub limit: u32,
    /// Empty means every pay method.
    pub pay_methods: Vec<PayMethod>,
}

impl DonationQuery {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;
    /// Deepest offset a merged listing may page to.
    pub const MAX_OFFSET: u32 = 1_000;

    /// Builds a query, clamping `limit` to [`Self::MAX_LIMIT`].
    pub fn new(offset: u32, limit: u32, pay_methods: Vec<PayMethod>) -> Self {
        Self {
            offset,
            limit: limit.min(Self::MAX_LIMIT),
            pay_methods,
        }
    }

    pub fn matches(&self, method: PayMethod) -> bool {
        self.pay_methods.is_empty() || self.pay_methods.contains(&method)
    }
}

impl Default for DonationQuery {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT, Vec::new())
    }
}

/// One page of an owner's donations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationPage {
    pub records: Vec<Donation>,
    /// Matching records before paging.
    pub total: u64,
}

/// Repository port for donation persistence.
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Insert a newly charged donation.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure, including a duplicate order number
    async fn insert(&self, donation: &Donation) -> Result<(), DomainError>;

    /// Find a donation of `kind` by id. Returns `None` if not found.
    async fn find_by_id(
        &self,
        kind: DonationKind,
        id: &DonationId,
    ) -> Result<Option<Donation>, DomainError>;

    /// An owner's donations of `kind`, newest first.
    async fn find_by_owner(
        &self,
        kind: DonationKind,
        owner: &UserId,
        query: &DonationQuery,
    ) -> Result<DonationPage, DomainError>;

    /// Apply the supplied fields atomically and return the updated record.
    ///
    /// Returns `None` if the donation does not exist.
    async fn update_fields(
        &self,
        kind: DonationKind,
        id: &DonationId,
        patch: &DonationPatch,
    ) -> Result<Option<Donation>, DomainError>;
}
