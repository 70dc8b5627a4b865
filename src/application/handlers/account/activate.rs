//! ActivateHandler - Redeems an activation token for an identity token.

use std::sync::Arc;

use crate::domain::account::AccountError;
use crate::domain::foundation::{Identity, Timestamp};
use crate::ports::{AccountRepository, IdentityTokenCodec};

use super::{within, AccountSettings};

#[derive(Debug, Clone)]
pub struct ActivateCommand {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct ActivateResult {
    pub identity: Identity,
    /// Signed identity token in the codec's format.
    pub token: String,
}

/// Handler for activation.
///
/// The codec decides the token format: the bearer codec for the JSON endpoint,
/// the id-token codec for the cookie redirect.
pub struct ActivateHandler {
    accounts: Arc<dyn AccountRepository>,
    codec: Arc<dyn IdentityTokenCodec>,
    settings: AccountSettings,
}

impl ActivateHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        codec: Arc<dyn IdentityTokenCodec>,
        settings: AccountSettings,
    ) -> Self {
        Self {
            accounts,
            codec,
            settings,
        }
    }

    pub async fn handle(&self, cmd: ActivateCommand) -> Result<ActivateResult, AccountError> {
        let timeout = self.settings.storage_timeout;

        // 1. Unknown email and bad token look the same
        let account = within(
            timeout,
            "find account",
            self.accounts.find_by_email(cmd.email.trim()),
        )
        .await?
        .ok_or(AccountError::InvalidActivation)?;

        // 2. Digest, expiry
        account.check_activation(&cmd.token, Timestamp::now())?;

        // 3. Consume the token
        within(timeout, "activate account", self.accounts.activate(&account.id)).await?;

        // 4. Issue
        let identity = account.identity();
        let token = self.codec.issue(&identity)?;

        tracing::info!(user_id = %identity.id, "Account activated");

        Ok(ActivateResult { identity, token })
    }
}
