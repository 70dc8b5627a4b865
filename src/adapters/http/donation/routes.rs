//! Axum router configuration for donation endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    create_periodic_donation, create_prime_donation, get_periodic_donation, get_prime_donation,
    list_user_donations, patch_periodic_donation, patch_prime_donation,
};

/// Donation routes, mounted under `/v1`.
///
/// - `POST /donations/prime`, `POST /periodic-donations`
/// - `GET|PATCH /donations/prime/:id`, `GET|PATCH /periodic-donations/:id`
/// - `GET /users/:user_id/donations`
pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/donations/prime", post(create_prime_donation))
        .route(
            "/donations/prime/:id",
            get(get_prime_donation).patch(patch_prime_donation),
        )
        .route("/periodic-donations", post(create_periodic_donation))
        .route(
            "/periodic-donations/:id",
            get(get_periodic_donation).patch(patch_periodic_donation),
        )
        .route("/users/:user_id/donations", get(list_user_donations))
}
