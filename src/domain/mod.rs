//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, identity, errors, ownership)
//! - `donation` - One-time and periodic donations, validation and patching
//! - `account` - Donor accounts and activation tokens

pub mod account;
pub mod donation;
pub mod foundation;
