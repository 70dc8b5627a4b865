//! Shared application state.

use std::sync::Arc;

use crate::adapters::http::middleware::AuthState;
use crate::application::handlers::{
    AccountSettings, ActivateHandler, CreateDonationHandler, DonationSettings, GetDonationHandler,
    ListDonationsHandler, PatchDonationHandler, RenewTokenHandler, SignInHandler,
};
use crate::ports::{
    AccountRepository, DonationRepository, IdentityTokenCodec, Mailer, PaymentGateway,
};

/// Attributes of the `id_token` cookie.
#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    pub secure: bool,
    pub domain: Option<String>,
}

/// Dependencies shared by every request.
///
/// Cloned per request; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub donations: Arc<dyn DonationRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
    pub bearer_codec: Arc<dyn IdentityTokenCodec>,
    pub id_token_codec: Arc<dyn IdentityTokenCodec>,
    pub donation_settings: DonationSettings,
    pub account_settings: AccountSettings,
    pub cookie: CookieSettings,
    /// Redirect target when an activation names no usable destination.
    pub default_redirect_url: String,
}

impl AppState {
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            bearer: self.bearer_codec.clone(),
            id_token: self.id_token_codec.clone(),
        }
    }

    // Donation handlers

    pub fn create_donation_handler(&self) -> CreateDonationHandler {
        CreateDonationHandler::new(
            self.donations.clone(),
            self.gateway.clone(),
            self.mailer.clone(),
            self.donation_settings.clone(),
        )
    }

    pub fn patch_donation_handler(&self) -> PatchDonationHandler {
        PatchDonationHandler::new(self.donations.clone(), self.donation_settings.clone())
    }

    pub fn get_donation_handler(&self) -> GetDonationHandler {
        GetDonationHandler::new(self.donations.clone(), self.donation_settings.clone())
    }

    pub fn list_donations_handler(&self) -> ListDonationsHandler {
        ListDonationsHandler::new(self.donations.clone(), self.donation_settings.clone())
    }

    // Account handlers

    pub fn sign_in_handler(&self) -> SignInHandler {
        SignInHandler::new(
            self.accounts.clone(),
            self.mailer.clone(),
            self.account_settings.clone(),
        )
    }

    /// Activation issuing bearer tokens (`/v1/activate`).
    pub fn bearer_activate_handler(&self) -> ActivateHandler {
        ActivateHandler::new(
            self.accounts.clone(),
            self.bearer_codec.clone(),
            self.account_settings.clone(),
        )
    }

    /// Activation issuing cookie tokens (`/v2/auth/activate`).
    pub fn cookie_activate_handler(&self) -> ActivateHandler {
        ActivateHandler::new(
            self.accounts.clone(),
            self.id_token_codec.clone(),
            self.account_settings.clone(),
        )
    }

    pub fn renew_token_handler(&self) -> RenewTokenHandler {
        RenewTokenHandler::new(
            self.accounts.clone(),
            self.bearer_codec.clone(),
            self.account_settings.clone(),
        )
    }
}
