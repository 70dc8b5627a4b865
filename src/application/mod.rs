//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Donation handlers
    CreateDonationCommand, CreateDonationHandler, CreateDonationResult, DonationSettings,
    GetDonationHandler, GetDonationQuery, ListDonationsHandler, ListDonationsQuery,
    ListDonationsResult, PatchDonationCommand, PatchDonationHandler,
    // Account handlers
    AccountSettings, ActivateCommand, ActivateHandler, ActivateResult, RenewTokenCommand,
    RenewTokenHandler, RenewTokenResult, SignInCommand, SignInHandler, SignInResult,
};
