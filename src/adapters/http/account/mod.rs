//! HTTP adapter for account endpoints.
//!
//! Passwordless sign-in with one-time activation links. See [`routes`] for
//! the endpoint list.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{account_routes, token_routes};
