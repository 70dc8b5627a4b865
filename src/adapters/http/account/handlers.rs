//! HTTP handlers for account endpoints.

use async_trait::async_trait;
use axum::extract::{FromRequest, Path, Query, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::adapters::http::middleware::{OptionalAuth, ID_TOKEN_COOKIE};
use crate::adapters::http::response::{success, ApiError};
use crate::adapters::http::state::{AppState, CookieSettings};
use crate::application::handlers::{ActivateCommand, RenewTokenCommand, SignInCommand};

use super::dto::{
    ActivateParams, RenewedTokenResponse, SignInRequest, SignInResponse, TokenResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Sign-in Body
// ════════════════════════════════════════════════════════════════════════════════

/// Sign-in body in either of the two accepted encodings.
pub struct SignInBody(pub SignInRequest);

#[async_trait]
impl<S> FromRequest<S> for SignInBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<SignInRequest>::from_request(req, state).await?;
            Ok(SignInBody(body))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(body) = Form::<SignInRequest>::from_request(req, state).await?;
            Ok(SignInBody(body))
        } else {
            Err(ApiError::bad_request(
                "body",
                "expected application/json or application/x-www-form-urlencoded",
            ))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /v1/signin
pub async fn sign_in(
    State(state): State<AppState>,
    SignInBody(body): SignInBody,
) -> Result<Response, ApiError> {
    let result = state
        .sign_in_handler()
        .handle(SignInCommand {
            email: body.email,
            destination: body.destination,
        })
        .await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(success(status, SignInResponse { email: result.email }))
}

/// GET /v1/activate - legacy activation answering with a bearer token.
pub async fn activate_v1(
    State(state): State<AppState>,
    Query(params): Query<ActivateParams>,
) -> Result<Response, ApiError> {
    let (email, token) = match (params.email, params.token) {
        (Some(email), Some(token)) => (email, token),
        _ => return Err(ApiError::unauthenticated("Invalid or expired activation token")),
    };

    let result = state
        .bearer_activate_handler()
        .handle(ActivateCommand { email, token })
        .await?;

    Ok(success(
        StatusCode::OK,
        TokenResponse::bearer(
            result.identity.id.as_str(),
            result.identity.email,
            result.token,
        ),
    ))
}

/// GET /v2/auth/activate - activation by redirect with a session cookie.
///
/// Always answers 307. The cookie is only set when activation succeeded.
pub async fn activate_v2(
    State(state): State<AppState>,
    Query(params): Query<ActivateParams>,
) -> Response {
    let location = redirect_target(params.destination.as_deref(), &state.default_redirect_url);

    let jar = CookieJar::new();
    let jar = match (params.email, params.token) {
        (Some(email), Some(token)) => match state
            .cookie_activate_handler()
            .handle(ActivateCommand { email, token })
            .await
        {
            Ok(result) => jar.add(id_token_cookie(result.token, &state.cookie)),
            Err(err) => {
                tracing::info!(error = %err, "Activation by redirect failed");
                jar
            }
        },
        _ => jar,
    };

    (jar, temporary_redirect(&location)).into_response()
}

/// GET /v1/token/:id
pub async fn renew_token(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .renew_token_handler()
        .handle(RenewTokenCommand {
            identity,
            requested_id: id,
        })
        .await?;

    Ok(success(
        StatusCode::OK,
        RenewedTokenResponse::bearer(result.token),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

/// Absolute http(s) URLs and same-site paths are honoured; anything else
/// falls back to the configured default.
fn redirect_target(destination: Option<&str>, default: &str) -> String {
    match destination.map(str::trim) {
        Some(d)
            if d.starts_with("https://")
                || d.starts_with("http://")
                || (d.starts_with('/') && !d.starts_with("//")) =>
        {
            d.to_string()
        }
        _ => default.to_string(),
    }
}

/// Session cookie: no `Max-Age`, so it ends with the browser session.
fn id_token_cookie(token: String, settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = Cookie::build((ID_TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(settings.secure);
    if let Some(domain) = &settings.domain {
        cookie = cookie.domain(domain.clone());
    }
    cookie.build()
}

/// 307 to `location`. An unencodable location falls back to `/`.
fn temporary_redirect(location: &str) -> Response {
    let location =
        HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
    (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "https://www.example.org/";

    #[test]
    fn absolute_and_relative_destinations_are_kept() {
        assert_eq!(
            redirect_target(Some("https://www.example.org/thanks"), DEFAULT),
            "https://www.example.org/thanks"
        );
        assert_eq!(redirect_target(Some("/account"), DEFAULT), "/account");
    }

    #[test]
    fn other_destinations_fall_back() {
        assert_eq!(redirect_target(None, DEFAULT), DEFAULT);
        assert_eq!(redirect_target(Some("javascript:alert(1)"), DEFAULT), DEFAULT);
        assert_eq!(redirect_target(Some("//evil.example.com"), DEFAULT), DEFAULT);
        assert_eq!(redirect_target(Some("account"), DEFAULT), DEFAULT);
    }

    #[test]
    fn cookie_carries_required_attributes() {
        let cookie = id_token_cookie("abc".to_string(), &CookieSettings::default());
        assert_eq!(cookie.name(), "id_token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.secure(), Some(true));
        assert!(cookie.domain().is_none());
        assert!(cookie.max_age().is_none());
        assert!(cookie.expires().is_none());
    }

    #[test]
    fn cookie_adds_secure_and_domain_when_configured() {
        let cookie = id_token_cookie(
            "abc".to_string(),
            &CookieSettings {
                secure: true,
                domain: Some("example.org".to_string()),
            },
        );
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.domain(), Some("example.org"));
        assert!(cookie.max_age().is_none());
    }

    #[test]
    fn redirect_is_307_with_location() {
        let response = temporary_redirect("/done");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/done");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn unencodable_location_falls_back_to_root() {
        let response = temporary_redirect("/bad\nheader");
        assert_eq!(response.headers()[header::LOCATION], "/");
    }
}
