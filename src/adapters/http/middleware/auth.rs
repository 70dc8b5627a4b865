//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Verifies the bearer header and the `id_token` cookie
//!   and injects the resulting [`Identity`] into extensions
//! - `RequireAuth` - Extractor that requires an identity
//! - `OptionalAuth` - Extractor for routes that decide themselves
//!
//! ```text
//! Request → auth_middleware → Identity in extensions
//!                                  ↓
//!                          Handler → RequireAuth reads it
//! ```
//!
//! # Credential rules
//!
//! | bearer | cookie | outcome |
//! |--------|--------|---------|
//! | none | none | continue unauthenticated |
//! | valid | none / valid, same id | authenticated |
//! | none | valid | authenticated |
//! | invalid | any | 401 |
//! | any | invalid | 401 |
//! | valid | valid, other id | 401 |

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::adapters::http::response::ApiError;
use crate::domain::foundation::{AuthError, Identity};
use crate::ports::IdentityTokenCodec;

/// Name of the session cookie carrying the id token.
pub const ID_TOKEN_COOKIE: &str = "id_token";

/// The two codecs the middleware verifies with.
#[derive(Clone)]
pub struct AuthState {
    pub bearer: Arc<dyn IdentityTokenCodec>,
    pub id_token: Arc<dyn IdentityTokenCodec>,
}

/// Authentication middleware.
///
/// No credential is not an error here; handlers that need one use [`RequireAuth`].
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&auth, request.headers()) {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected credentials");
            ApiError::from(err).into_response()
        }
    }
}

/// Resolves the caller from the request headers.
pub fn authenticate(auth: &AuthState, headers: &HeaderMap) -> Result<Option<Identity>, AuthError> {
    let from_bearer = match bearer_token(headers)? {
        Some(token) => Some(auth.bearer.verify(token)?),
        None => None,
    };
    let jar = CookieJar::from_headers(headers);
    let from_cookie = match jar.get(ID_TOKEN_COOKIE).map(|c| c.value()) {
        Some(token) if !token.is_empty() => Some(auth.id_token.verify(token)?),
        _ => None,
    };

    match (from_bearer, from_cookie) {
        (Some(bearer), Some(cookie)) if bearer.id != cookie.id => {
            Err(AuthError::ConflictingCredentials)
        }
        (Some(identity), _) | (None, Some(identity)) => Ok(Some(identity)),
        (None, None) => Ok(None),
    }
}

/// Extracts the bearer token. An `Authorization` header with any other scheme is invalid.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or(AuthError::InvalidToken)
}

/// Extractor that requires authentication.
///
/// ```ignore
/// async fn my_handler(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| ApiError::unauthenticated("Authentication required"))
    }
}

/// Extractor for optional authentication.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Identity>().cloned()))
    }
}
