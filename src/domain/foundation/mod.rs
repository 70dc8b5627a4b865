//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, identities, and error types
//! that form the vocabulary of the donation domain.

mod auth;
mod errors;
mod ids;
mod ownership;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, Identity};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DonationId, UserId};
pub use ownership::{check_claim, OwnedByUser};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
