//! HTTP adapter for donation endpoints.
//!
//! - `POST /v1/donations/prime` - Charge and record a one-time donation
//! - `POST /v1/periodic-donations` - Charge and record a recurring donation
//! - `GET /v1/donations/prime/:id`, `GET /v1/periodic-donations/:id` - Read an owned donation
//! - `PATCH /v1/donations/prime/:id`, `PATCH /v1/periodic-donations/:id` - Edit an owned donation
//! - `GET /v1/users/:user_id/donations` - List the caller's donations

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::donation_routes;
