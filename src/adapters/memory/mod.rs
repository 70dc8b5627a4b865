//! In-memory repositories backed by `tokio::sync::RwLock`.

mod account_repository;
mod donation_repository;

pub use account_repository::InMemoryAccountRepository;
pub use donation_repository::InMemoryDonationRepository;
