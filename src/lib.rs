//! Donation service
//!
//! Accepts one-time and periodic card donations, charges them through a
//! payment gateway and stores them per donor. Donors sign in without a
//! password: a mailed activation link yields a bearer token or a session
//! cookie.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
