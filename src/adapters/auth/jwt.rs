//! HS256 identity token codecs.
//!
//! Bearer tokens and id-token cookies are both HS256-signed JWTs carrying
//! [`Claims`]. They differ in signing secret, audience and lifetime, so a token
//! issued for one transport is rejected by the other.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, Identity, Timestamp, UserId};
use crate::ports::IdentityTokenCodec;

/// Audience of bearer tokens.
pub const BEARER_AUDIENCE: &str = "bearer";

/// Audience of id-token cookies.
pub const ID_TOKEN_AUDIENCE: &str = "id_token";

/// Default bearer token lifetime (6 hours).
pub const DEFAULT_BEARER_TTL_SECS: i64 = 6 * 60 * 60;

/// Default id-token lifetime (7 days).
pub const DEFAULT_ID_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT claims embedded in every identity token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: String,
    pub email: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Shared HS256 signing and verification for one audience.
struct HsJwt {
    secret: SecretString,
    issuer: String,
    audience: &'static str,
    ttl_secs: i64,
}

impl HsJwt {
    fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = Timestamp::now().as_unix_secs();
        let claims = Claims {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::IssuanceFailed(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        let id = UserId::new(data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(Identity::new(id, data.claims.email))
    }
}

/// Codec for `Authorization: Bearer` tokens.
pub struct BearerTokenCodec(HsJwt);

impl BearerTokenCodec {
    pub fn new(secret: SecretString, issuer: impl Into<String>, ttl_secs: i64) -> Self {
        Self(HsJwt {
            secret,
            issuer: issuer.into(),
            audience: BEARER_AUDIENCE,
            ttl_secs,
        })
    }
}

impl IdentityTokenCodec for BearerTokenCodec {
    fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.0.issue(identity)
    }

    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.0.verify(token)
    }
}

/// Codec for the `id_token` cookie.
pub struct IdTokenCodec(HsJwt);

impl IdTokenCodec {
    pub fn new(secret: SecretString, issuer: impl Into<String>, ttl_secs: i64) -> Self {
        Self(HsJwt {
            secret,
            issuer: issuer.into(),
            audience: ID_TOKEN_AUDIENCE,
            ttl_secs,
        })
    }
}

impl IdentityTokenCodec for IdTokenCodec {
    fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.0.issue(identity)
    }

    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.0.verify(token)
    }
}
