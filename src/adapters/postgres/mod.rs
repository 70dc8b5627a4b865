//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDonationRepository` - Prime and periodic donation tables
//! - `PostgresAccountRepository` - Donor accounts and activation tokens

mod account_repository;
mod donation_repository;

pub use account_repository::PostgresAccountRepository;
pub use donation_repository::PostgresDonationRepository;
