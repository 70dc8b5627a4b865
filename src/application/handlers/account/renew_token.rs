//! RenewTokenHandler - Issues a fresh bearer token for a still-valid identity.

use std::sync::Arc;

use crate::domain::account::AccountError;
use crate::domain::foundation::Identity;
use crate::ports::{AccountRepository, IdentityTokenCodec};

use super::{within, AccountSettings};

#[derive(Debug, Clone)]
pub struct RenewTokenCommand {
    /// Identity verified from the request, if any.
    pub identity: Option<Identity>,
    /// Account id named in the path.
    pub requested_id: String,
}

#[derive(Debug, Clone)]
pub struct RenewTokenResult {
    pub identity: Identity,
    pub token: String,
}

pub struct RenewTokenHandler {
    accounts: Arc<dyn AccountRepository>,
    codec: Arc<dyn IdentityTokenCodec>,
    settings: AccountSettings,
}

impl RenewTokenHandler {
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

    /// Returns a new token. Any mismatch is reported as unauthenticated.
    pub async fn handle(&self, cmd: RenewTokenCommand) -> Result<RenewTokenResult, AccountError> {
        let identity = cmd.identity.ok_or(AccountError::Unauthenticated)?;
        if identity.id.as_str() != cmd.requested_id {
            return Err(AccountError::Unauthenticated);
        }

        let account = within(
            self.settings.storage_timeout,
            "find account",
            self.accounts.find_by_id(&identity.id),
        )
        .await?
        .ok_or(AccountError::Unauthenticated)?;

        let identity = account.identity();
        let token = self.codec.issue(&identity)?;
        tracing::debug!(user_id = %identity.id, "Token renewed");
        Ok(RenewTokenResult { identity, token })
    }
}
