//! HTTP middleware for axum.
//!
//! - `auth` - Credential verification and identity extractors

pub mod auth;

pub use auth::{auth_middleware, AuthState, OptionalAuth, RequireAuth, ID_TOKEN_COOKIE};
