//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum REST API
//! - `tappay` - Card gateway over HTTP, plus a sandbox mock
//! - `postgres` / `memory` - Donation and account storage
//! - `auth` - HS256 identity token codecs
//! - `mailer` - Outgoing mail hand-off

pub mod auth;
pub mod http;
pub mod mailer;
pub mod memory;
pub mod postgres;
pub mod tappay;
