//! Mock identity token codec for testing.
//!
//! # Example
//!
//! ```ignore
//! let codec = MockTokenCodec::new().with_test_user("valid-token", "user-123");
//! assert!(codec.verify("valid-token").is_ok());
//! assert_eq!(codec.verify("other"), Err(AuthError::InvalidToken));
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{AuthError, Identity, UserId};
use crate::ports::IdentityTokenCodec;

/// Maps fixed token strings to identities.
///
/// Issued tokens have the form `mock:{id}` and verify back to the identity.
#[derive(Debug, Default)]
pub struct MockTokenCodec {
    tokens: RwLock<HashMap<String, Identity>>,
    /// Optional error returned by every verification.
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.write().unwrap().insert(token.into(), identity);
        self
    }

    /// Adds a token for user `user_id` with a derived email.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let identity = Identity::new(
            UserId::new(&user_id).unwrap(),
            format!("{}@test.example.com", user_id),
        );
        self.with_identity(token, identity)
    }

    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }
}

impl IdentityTokenCodec for MockTokenCodec {
    fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let token = format!("mock:{}", identity.id);
        self.tokens
            .write()
            .unwrap()
            .insert(token.clone(), identity.clone());
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }
        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
