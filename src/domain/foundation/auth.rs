//! Authentication types for the domain layer.
//!
//! An [`Identity`] is what every ownership decision is made against. It is only
//! ever produced by verifying a signed token through an `IdentityTokenCodec`;
//! nothing in a request body can construct one.
//!
//! # Example
//!
//! ```ignore
//! // In HTTP middleware, after token verification:
//! let identity = codec.verify(token)?;
//! request.extensions_mut().insert(identity);
//! ```

use super::UserId;
use thiserror::Error;

/// Verified identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The account identifier.
    pub id: UserId,

    /// Email address carried in the token claims.
    pub email: String,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Authentication errors that can occur during token handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, for another audience, or has an invalid signature.
    #[error("Invalid token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Bearer and cookie credentials were both supplied but name different identities.
    #[error("Conflicting credentials")]
    ConflictingCredentials,

    /// Token could not be produced (key misconfiguration).
    #[error("Token issuance failed: {0}")]
    IssuanceFailed(String),
}

impl AuthError {
    /// Returns true if this error indicates the caller should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        !matches!(self, AuthError::IssuanceFailed(_))
    }
}
