//! Identity token port.
//!
//! Two strategies implement this contract: a bearer token carried in the
//! `Authorization` header and an id token carried in the `id_token` cookie.
//! Each strategy only accepts tokens it issued itself.
//!
//! # Contract
//!
//! Implementations must:
//! - Validate the signature, issuer, audience and expiry
//! - Return `AuthError::TokenExpired` for an expired but otherwise valid token
//! - Return `AuthError::InvalidToken` for everything else that fails
//! - Never log the token

use crate::domain::foundation::{AuthError, Identity};

/// Issues and verifies signed identity tokens.
///
/// Signing is CPU-only, so the contract is synchronous.
pub trait IdentityTokenCodec: Send + Sync {
    /// Issue a token for `identity`.
    fn issue(&self, identity: &Identity) -> Result<String, AuthError>;

    /// Verify a raw token (no `Bearer ` prefix) and return its identity.
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}
