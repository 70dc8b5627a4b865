//! HTTP adapter - axum REST API.
//!
//! - `donation` - Donation endpoints under `/v1`
//! - `account` - Sign-in, activation and token renewal
//! - `middleware` - Credential verification
//! - `response` - JSend envelope and error mapping

pub mod account;
pub mod donation;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use response::ApiError;
pub use router::build_router;
pub use state::{AppState, CookieSettings};
