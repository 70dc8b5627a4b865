//! Application router.
//!
//! [`build_router`] is shared by `main.rs` and the integration tests so both
//! run the same middleware stack.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::domain::foundation::ErrorCode;

use super::account::{account_routes, token_routes};
use super::donation::donation_routes;
use super::middleware::auth_middleware;
use super::response::{success, ApiError};
use super::state::AppState;

/// Builds the full router with all middleware layers.
///
/// Layers, outermost first:
/// 1. CORS
/// 2. Request id assignment
/// 3. Request/response tracing
/// 4. Request id propagation to the response
/// 5. Request timeout
/// 6. Authentication (donation and token renewal routes only)
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let authenticated = Router::new()
        .nest("/v1", donation_routes())
        .merge(token_routes())
        .layer(middleware::from_fn_with_state(
            state.auth_state(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(account_routes())
        .merge(authenticated)
        .fallback(route_not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors_layer(&config.cors_origins_list()))
        .with_state(state)
}

/// CORS for the configured front-end origins. Unparsable origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

async fn health() -> Response {
    success(StatusCode::OK, json!({ "healthy": true }))
}

async fn route_not_found() -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        "path",
        "Route not found",
    )
}
