//! One-time activation tokens.
//!
//! The plaintext token only ever exists in the activation link handed to the
//! mailer. Storage keeps its SHA-256 digest.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Freshly generated activation token. Deliberately not `Debug`.
pub struct ActivationToken(String);

impl ActivationToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Plaintext value for the activation link.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Digest to persist.
    pub fn hash(&self) -> String {
        hash_token(&self.0)
    }
}

/// Hex SHA-256 digest of a token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Compares a presented token against a stored digest in constant time.
pub fn verify_token(presented: &str, stored_hash: &str) -> bool {
    let candidate = hash_token(presented);
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}
