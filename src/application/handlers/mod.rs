//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod donation;

pub use account::{
    AccountSettings, ActivateCommand, ActivateHandler, ActivateResult, RenewTokenCommand,
    RenewTokenHandler, RenewTokenResult, SignInCommand, SignInHandler, SignInResult,
};
pub use donation::{
    CreateDonationCommand, CreateDonationHandler, CreateDonationResult, DonationSettings,
    GetDonationHandler, GetDonationQuery, ListDonationsHandler, ListDonationsQuery,
    ListDonationsResult, PatchDonationCommand, PatchDonationHandler,
};
