//! Axum router configuration for account endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{activate_v1, activate_v2, renew_token, sign_in};

/// Account routes that work without a session, mounted at the root.
///
/// These sit outside the auth middleware: a stale `id_token` cookie must not
/// stop a browser from signing in again or following an activation link.
///
/// - `POST /v1/signin` - Register or find an account and mail an activation link
/// - `GET /v1/activate` - Redeem the link for a bearer token
/// - `GET /v2/auth/activate` - Redeem the link for a session cookie (307)
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/signin", post(sign_in))
        .route("/v1/activate", get(activate_v1))
        .route("/v2/auth/activate", get(activate_v2))
}

/// Token renewal, mounted at the root behind the auth middleware.
///
/// - `GET /v1/token/:id` - Renew a bearer token
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/v1/token/:id", get(renew_token))
}
