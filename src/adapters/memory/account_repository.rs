//! In-memory account repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::Account;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AccountRepository;

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<UserId, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::AccountNotFound, "account not found")
        .with_detail("account_id", id.to_string())
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, DomainError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::new(ErrorCode::Conflict, "email already registered"));
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn set_activation(
        &self,
        id: &UserId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(id).ok_or_else(|| not_found(id))?;
        account.activation_hash = Some(token_hash.to_string());
        account.activation_expires_at = Some(expires_at);
        Ok(())
    }

    async fn activate(&self, id: &UserId) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(id).ok_or_else(|| not_found(id))?;
        account.active = true;
        account.activation_hash = None;
        account.activation_expires_at = None;
        Ok(())
    }
}
