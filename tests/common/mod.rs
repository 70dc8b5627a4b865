//! Shared harness for the HTTP integration tests.
//!
//! Builds the production router over in-memory storage, the mock gateway and
//! real HS256 codecs, then drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use donation_service::adapters::auth::{BearerTokenCodec, IdTokenCodec};
use donation_service::adapters::http::{build_router, AppState, CookieSettings};
use donation_service::adapters::mailer::{LoggingMailer, SentMail};
use donation_service::adapters::memory::{InMemoryAccountRepository, InMemoryDonationRepository};
use donation_service::adapters::tappay::MockPaymentGateway;
use donation_service::application::handlers::{AccountSettings, DonationSettings};
use donation_service::config::ServerConfig;
use donation_service::domain::foundation::{Identity, UserId};
use donation_service::ports::IdentityTokenCodec;

pub const MERCHANT: &str = "GlobalTesting_CTBC";
pub const DEFAULT_REDIRECT: &str = "https://www.example.org/";

const ISSUER: &str = "donation-service";
const ID_TOKEN_SECRET: &str = "id-token-secret-for-integration-tests";

pub struct TestApp {
    pub router: Router,
    pub gateway: MockPaymentGateway,
    pub mailer: LoggingMailer,
    pub bearer: Arc<BearerTokenCodec>,
    pub id_token: Arc<IdTokenCodec>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let gateway = MockPaymentGateway::new();
        let mailer = LoggingMailer::new();
        let bearer = Arc::new(BearerTokenCodec::new(
            SecretString::new("bearer-secret-for-integration-tests".to_string()),
            "donation-service",
            3600,
        ));
        let id_token = Arc::new(IdTokenCodec::new(
            SecretString::new(ID_TOKEN_SECRET.to_string()),
            ISSUER,
            3600,
        ));

        let state = AppState {
            donations: Arc::new(InMemoryDonationRepository::new()),
            accounts: Arc::new(InMemoryAccountRepository::new()),
            gateway: Arc::new(gateway.clone()),
            mailer: Arc::new(mailer.clone()),
            bearer_codec: bearer.clone(),
            id_token_codec: id_token.clone(),
            donation_settings: DonationSettings {
                merchant_id: MERCHANT.to_string(),
                ..Default::default()
            },
            account_settings: AccountSettings::default(),
            cookie: CookieSettings::default(),
            default_redirect_url: DEFAULT_REDIRECT.to_string(),
        };

        Self {
            router: build_router(state, &ServerConfig::default()),
            gateway,
            mailer,
            bearer,
            id_token,
        }
    }

    pub fn bearer_for(&self, user_id: &str) -> String {
        let identity = Identity::new(
            UserId::new(user_id).unwrap(),
            format!("{}@example.com", user_id),
        );
        self.bearer.issue(&identity).unwrap()
    }

    pub fn id_token_for(&self, user_id: &str) -> String {
        let identity = Identity::new(
            UserId::new(user_id).unwrap(),
            format!("{}@example.com", user_id),
        );
        self.id_token.issue(&identity).unwrap()
    }

    /// A correctly signed `id_token` that expired a minute ago.
    pub fn expired_id_token_for(&self, user_id: &str) -> String {
        let codec = IdTokenCodec::new(SecretString::new(ID_TOKEN_SECRET.to_string()), ISSUER, -60);
        let identity = Identity::new(
            UserId::new(user_id).unwrap(),
            format!("{}@example.com", user_id),
        );
        codec.issue(&identity).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Last activation link mailed to `email`.
    pub fn activation_link(&self, email: &str) -> Option<reqwest::Url> {
        self.mailer
            .sent()
            .into_iter()
            .rev()
            .find_map(|mail| match mail {
                SentMail::Activation { email: to, link } if to == email => Some(link),
                _ => None,
            })
            .and_then(|link| reqwest::Url::parse(&link).ok())
    }

    pub fn receipts(&self) -> usize {
        self.mailer
            .sent()
            .iter()
            .filter(|m| matches!(m, SentMail::Receipt { .. }))
            .count()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request builders
// ════════════════════════════════════════════════════════════════════════════════

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    with_bearer(Request::get(uri), bearer)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, bearer: Option<&str>, body: &Value) -> Request<Body> {
    with_bearer(Request::builder().method(method).uri(uri), bearer)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Adds an `id_token` session cookie to `request`.
pub fn with_id_token_cookie(mut request: Request<Body>, token: &str) -> Request<Body> {
    let value = header::HeaderValue::from_str(&format!("id_token={}", token)).unwrap();
    request.headers_mut().insert(header::COOKIE, value);
    request
}

fn with_bearer(
    builder: axum::http::request::Builder,
    bearer: Option<&str>,
) -> axum::http::request::Builder {
    match bearer {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

/// A create body that passes validation for `user_id`.
pub fn donation_body(user_id: &str) -> Value {
    serde_json::json!({
        "amount": 500,
        "cardholder": {
            "email": "developer@example.org",
            "name": "Wang",
            "phone_number": "+886912345678"
        },
        "details": "Monthly support",
        "merchant_id": "ignored",
        "pay_method": "credit_card",
        "prime": "test_prime",
        "user_id": user_id
    })
}
