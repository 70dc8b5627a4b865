//! SignInHandler - Registers or finds an account and mails an activation link.

use std::sync::Arc;

use reqwest::Url;

use crate::domain::account::{Account, AccountError, ActivationToken};
use crate::domain::donation::check_email;
use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::ports::{AccountRepository, Mailer};

use super::{within, AccountSettings};

#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub email: String,
    /// Where the activation redirect should land.
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInResult {
    pub email: String,
    /// True when this sign-in registered the account.
    pub created: bool,
}

pub struct SignInHandler {
    accounts: Arc<dyn AccountRepository>,
    mailer: Arc<dyn Mailer>,
    settings: AccountSettings,
}

impl SignInHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        mailer: Arc<dyn Mailer>,
        settings: AccountSettings,
    ) -> Self {
        Self {
            accounts,
            mailer,
            settings,
        }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<SignInResult, AccountError> {
        let email = cmd.email.trim().to_string();
        check_email("email", &email)?;

        // 1. Find or register
        let (account, created) = self.find_or_register(&email).await?;

        // 2. Fresh one-time token, replacing any pending one
        let token = ActivationToken::generate();
        let expires_at = Timestamp::now().add_secs(self.settings.activation_ttl_secs);
        within(
            self.settings.storage_timeout,
            "store activation token",
            self.accounts.set_activation(&account.id, &token.hash(), expires_at),
        )
        .await?;

        // 3. Mail the link
        let link = self.activation_link(&email, &token, cmd.destination.as_deref())?;
        if let Err(err) = self.mailer.send_activation(&email, link.as_str()).await {
            tracing::warn!(user_id = %account.id, error = %err, "Activation mail could not be sent");
        }

        tracing::info!(user_id = %account.id, created, "Sign-in requested");

        Ok(SignInResult { email, created })
    }

    async fn find_or_register(&self, email: &str) -> Result<(Account, bool), AccountError> {
        let timeout = self.settings.storage_timeout;
        if let Some(account) =
            within(timeout, "find account", self.accounts.find_by_email(email)).await?
        {
            return Ok((account, false));
        }

        let account = Account::register(email);
        match tokio::time::timeout(timeout, self.accounts.insert(&account)).await {
            Ok(Ok(())) => Ok((account, true)),
            // Lost a race with a concurrent sign-in for the same email.
            Ok(Err(err)) if err.code == ErrorCode::Conflict => {
                within(timeout, "find account", self.accounts.find_by_email(email))
                    .await?
                    .map(|existing| (existing, false))
                    .ok_or_else(|| AccountError::infrastructure("account vanished after conflict"))
            }
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(AccountError::infrastructure(format!(
                "insert account timed out after {:?}",
                timeout
            ))),
        }
    }

    fn activation_link(
        &self,
        email: &str,
        token: &ActivationToken,
        destination: Option<&str>,
    ) -> Result<Url, AccountError> {
        let mut params = vec![("email", email), ("token", token.expose())];
        if let Some(destination) = destination {
            params.push(("destination", destination));
        }
        Url::parse_with_params(&self.settings.activation_base_url, &params)
            .map_err(|e| AccountError::infrastructure(format!("invalid activation base url: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::adapters::mailer::SentMail;

    fn command(email: &str) -> SignInCommand {
        SignInCommand {
            email: email.to_string(),
            destination: None,
        }
    }

    #[tokio::test]
    async fn first_sign_in_registers_inactive_account() {
        let fx = Fixture::new();
        let result = fx
            .sign_in_handler()
            .handle(command("donor@example.com"))
            .await
            .unwrap();
        assert!(result.created);

        let account = fx
            .accounts
            .find_by_email("donor@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(!account.active);
        assert!(account.activation_hash.is_some());
    }

    #[tokio::test]
    async fn second_sign_in_finds_existing_account() {
        let fx = Fixture::new();
        let handler = fx.sign_in_handler();
        handler.handle(command("donor@example.com")).await.unwrap();
        let again = handler.handle(command("donor@example.com")).await.unwrap();
        assert!(!again.created);
    }

    #[tokio::test]
    async fn mailed_link_carries_destination_and_plain_token() {
        let fx = Fixture::new();
        fx.sign_in_handler()
            .handle(SignInCommand {
                email: "donor@example.com".to_string(),
                destination: Some("https://www.example.org/thanks".to_string()),
            })
            .await
            .unwrap();

        let link = match &fx.mailer.sent()[0] {
            SentMail::Activation { link, .. } => Url::parse(link).unwrap(),
            other => panic!("unexpected mail {:?}", other),
        };
        let pairs: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("email".into(), "donor@example.com".into())));
        assert!(pairs.contains(&("destination".into(), "https://www.example.org/thanks".into())));

        let token = pairs.iter().find(|(k, _)| k == "token").unwrap().1.clone();
        let account = fx
            .accounts
            .find_by_email("donor@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(account.check_activation(&token, Timestamp::now()).is_ok());
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let fx = Fixture::new();
        let err = fx
            .sign_in_handler()
            .handle(command("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation { ref field, .. } if field == "email"));
        assert!(fx.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn mailer_failure_is_not_surfaced() {
        let fx = Fixture::new();
        fx.mailer.fail_sends();
        let result = fx.sign_in_handler().handle(command("donor@example.com")).await;
        assert!(result.is_ok());
    }
}
