//! HTTP DTOs for account endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/signin`, as JSON or as a urlencoded form.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub email: String,
}

/// Query of both activation endpoints. Missing values fail activation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivateParams {
    pub email: Option<String>,
    pub token: Option<String>,
    pub destination: Option<String>,
}

/// A freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub id: String,
    pub email: String,
    pub jwt: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(id: impl Into<String>, email: impl Into<String>, jwt: String) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            jwt,
            token_type: "Bearer",
        }
    }
}

/// Answer of `GET /v1/token/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct RenewedTokenResponse {
    pub token: String,
    pub token_type: &'static str,
}

impl RenewedTokenResponse {
    pub fn bearer(token: String) -> Self {
        Self {
            token,
            token_type: "Bearer",
        }
    }
}
