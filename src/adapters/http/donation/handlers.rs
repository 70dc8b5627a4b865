//! HTTP handlers for donation endpoints.
//!
//! Extractor order fixes the status precedence: the identity is resolved before
//! the body is parsed, so a missing credential is 401 even for a broken body.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::response::{success, ApiError};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CreateDonationCommand, GetDonationQuery, ListDonationsQuery, PatchDonationCommand,
};
use crate::domain::donation::{DonationKind, PayMethod};
use crate::domain::foundation::UserId;
use crate::ports::DonationQuery;

use super::dto::{
    ClaimParams, CreateDonationRequest, DonationListResponse, DonationRecordResponse,
    DonationResponse, ListMeta, ListParams, PatchDonationRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════════

/// POST /v1/donations/prime
pub async fn create_prime_donation(
    state: State<AppState>,
    auth: RequireAuth,
    body: Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    create(state, auth, DonationKind::Prime, body).await
}

/// POST /v1/periodic-donations
pub async fn create_periodic_donation(
    state: State<AppState>,
    auth: RequireAuth,
    body: Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    create(state, auth, DonationKind::Periodic, body).await
}

async fn create(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    kind: DonationKind,
    body: Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let result = state
        .create_donation_handler()
        .handle(CreateDonationCommand {
            identity,
            kind,
            draft: request.into_draft(),
        })
        .await?;

    Ok(success(
        StatusCode::CREATED,
        DonationResponse::from(result.donation),
    ))
}

/// PATCH /v1/donations/prime/:id
pub async fn patch_prime_donation(
    state: State<AppState>,
    auth: RequireAuth,
    id: Path<String>,
    body: Result<Json<PatchDonationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    patch(state, auth, DonationKind::Prime, id, body).await
}

/// PATCH /v1/periodic-donations/:id
pub async fn patch_periodic_donation(
    state: State<AppState>,
    auth: RequireAuth,
    id: Path<String>,
    body: Result<Json<PatchDonationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    patch(state, auth, DonationKind::Periodic, id, body).await
}

async fn patch(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    kind: DonationKind,
    Path(id): Path<String>,
    body: Result<Json<PatchDonationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let (patch, claimed_user_id) = request.into_patch()?;

    state
        .patch_donation_handler()
        .handle(PatchDonationCommand {
            identity,
            kind,
            id,
            claimed_user_id,
            patch,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Queries
// ════════════════════════════════════════════════════════════════════════════════

/// GET /v1/donations/prime/:id
pub async fn get_prime_donation(
    state: State<AppState>,
    auth: RequireAuth,
    id: Path<String>,
    params: Query<ClaimParams>,
) -> Result<Response, ApiError> {
    get(state, auth, DonationKind::Prime, id, params).await
}

/// GET /v1/periodic-donations/:id
pub async fn get_periodic_donation(
    state: State<AppState>,
    auth: RequireAuth,
    id: Path<String>,
    params: Query<ClaimParams>,
) -> Result<Response, ApiError> {
    get(state, auth, DonationKind::Periodic, id, params).await
}

async fn get(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    kind: DonationKind,
    Path(id): Path<String>,
    Query(params): Query<ClaimParams>,
) -> Result<Response, ApiError> {
    let claimed_user_id = match params.user_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            UserId::new(raw).map_err(|_| ApiError::forbidden("Claimed user does not match"))?,
        ),
    };

    let donation = state
        .get_donation_handler()
        .handle(GetDonationQuery {
            identity,
            kind,
            id,
            claimed_user_id,
        })
        .await?;

    Ok(success(StatusCode::OK, DonationResponse::from(donation)))
}

/// GET /v1/users/:user_id/donations
pub async fn list_user_donations(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(user_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let owner = UserId::new(user_id.trim())
        .map_err(|_| ApiError::forbidden("Donations of another user cannot be listed"))?;

    let offset = parse_or(params.offset.as_deref(), 0);
    let limit = parse_or(params.limit.as_deref(), DonationQuery::DEFAULT_LIMIT);
    let pay_methods = params
        .pay_methods
        .as_deref()
        .map(parse_pay_methods)
        .unwrap_or_default();

    let result = state
        .list_donations_handler()
        .handle(ListDonationsQuery {
            identity,
            owner,
            offset,
            limit,
            pay_methods,
        })
        .await?;

    Ok(success(
        StatusCode::OK,
        DonationListResponse {
            records: result
                .records
                .into_iter()
                .map(DonationRecordResponse::from)
                .collect(),
            meta: ListMeta {
                total: result.total,
                offset: result.offset,
                limit: result.limit,
            },
        },
    ))
}

/// Unparsable or negative values fall back to the default.
fn parse_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

/// Comma separated list; unknown entries are dropped.
fn parse_pay_methods(raw: &str) -> Vec<PayMethod> {
    raw.split(',')
        .filter_map(|m| m.trim().parse::<PayMethod>().ok())
        .collect()
}
