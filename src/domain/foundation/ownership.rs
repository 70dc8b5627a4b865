//! Ownership checks for user-owned resources.
//!
//! Two kinds of check exist:
//! - [`OwnedByUser::check_ownership`] compares the verified caller with the
//!   owner recorded on a stored resource. This is the authoritative check.
//! - [`check_claim`] compares the verified caller with a `user_id` the client
//!   put in the request. A claim can only ever narrow access; it is never used
//!   as the owner of anything.
//!
//! # Example
//!
//! ```ignore
//! check_claim(&identity, cmd.claimed_user_id.as_ref())?;
//! let donation = repo.find_by_id(kind, &id).await?.ok_or(NotFound)?;
//! donation.check_ownership(&identity.id)?;
//! ```

use super::{DomainError, ErrorCode, Identity, UserId};

/// Trait for aggregates that have a single owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates ownership, returning a `Forbidden` error if the user is not the owner.
    fn check_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", user_id.to_string()))
        }
    }
}

/// Validates a client-supplied `user_id` claim against the verified identity.
///
/// An absent claim passes; whether a claim is required is a validation concern.
pub fn check_claim(identity: &Identity, claim: Option<&UserId>) -> Result<(), DomainError> {
    match claim {
        Some(claimed) if claimed != &identity.id => Err(DomainError::new(
            ErrorCode::Forbidden,
            "Claimed user does not match the authenticated identity",
        )
        .with_detail("claimed", claimed.to_string())
        .with_detail("requested_by", identity.id.to_string())),
        _ => Ok(()),
    }
}
