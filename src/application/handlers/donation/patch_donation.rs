//! PatchDonationHandler - Command handler for editing a stored donation.

use std::sync::Arc;

use crate::domain::donation::{DonationError, DonationKind, DonationPatch};
use crate::domain::foundation::{check_claim, Identity, OwnedByUser, UserId};
use crate::ports::DonationRepository;

use super::{parse_id, within, DonationSettings};

/// Command to patch a donation of `kind`.
#[derive(Debug, Clone)]
pub struct PatchDonationCommand {
    pub identity: Identity,
    pub kind: DonationKind,
    /// Raw path id.
    pub id: String,
    pub claimed_user_id: Option<UserId>,
    pub patch: DonationPatch,
}

/// Handler for donation patches.
///
/// Only the verified owner can edit; the claim in the body can narrow access
/// but never widens it.
pub struct PatchDonationHandler {
    repository: Arc<dyn DonationRepository>,
    settings: DonationSettings,
}

impl PatchDonationHandler {
    pub fn new(repository: Arc<dyn DonationRepository>, settings: DonationSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn handle(&self, cmd: PatchDonationCommand) -> Result<(), DonationError> {
        // 1. Field formats
        cmd.patch.validate()?;

        // 2. Claim must match the caller
        check_claim(&cmd.identity, cmd.claimed_user_id.as_ref())?;

        // 3. Load and check ownership
        let id = parse_id(&cmd.id)?;
        let donation = within(
            self.settings.storage_timeout,
            "find donation",
            self.repository.find_by_id(cmd.kind, &id),
        )
        .await?
        .ok_or(DonationError::NotFound)?;
        donation.check_ownership(&cmd.identity.id)?;

        if cmd.patch.is_empty() {
            return Ok(());
        }

        // 4. Write the present keys
        within(
            self.settings.storage_timeout,
            "update donation",
            self.repository.update_fields(cmd.kind, &id, &cmd.patch),
        )
        .await?
        .ok_or(DonationError::NotFound)?;

        tracing::info!(
            donation_id = %id,
            kind = %cmd.kind,
            user_id = %cmd.identity.id,
            "Donation updated"
        );

        Ok(())
    }
}
