//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Identity token and activation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 key for `Authorization: Bearer` tokens
    #[serde(default = "empty_secret")]
    pub bearer_secret: SecretString,

    /// HS256 key for the `id_token` cookie
    #[serde(default = "empty_secret")]
    pub id_token_secret: SecretString,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_bearer_ttl")]
    pub bearer_ttl_secs: i64,

    #[serde(default = "default_id_token_ttl")]
    pub id_token_ttl_secs: i64,

    /// Lifetime of a mailed activation link
    #[serde(default = "default_activation_ttl")]
    pub activation_ttl_secs: i64,

    #[serde(default)]
    pub cookie_secure: bool,

    pub cookie_domain: Option<String>,

    /// Where activation redirects land without a usable destination
    #[serde(default = "default_redirect_url")]
    pub default_redirect_url: String,

    /// Base of the activation link mailed on sign-in
    #[serde(default = "default_activation_base_url")]
    pub activation_base_url: String,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Secrets must be present everywhere and at least 32 bytes in production.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        check_secret("AUTH__BEARER_SECRET", &self.bearer_secret, environment)?;
        check_secret("AUTH__ID_TOKEN_SECRET", &self.id_token_secret, environment)?;

        if self.bearer_ttl_secs <= 0 || self.id_token_ttl_secs <= 0 || self.activation_ttl_secs <= 0
        {
            return Err(ValidationError::InvalidTimeout);
        }
        if reqwest::Url::parse(&self.activation_base_url).is_err() {
            return Err(ValidationError::InvalidUrl("AUTH__ACTIVATION_BASE_URL"));
        }
        if reqwest::Url::parse(&self.default_redirect_url).is_err() {
            return Err(ValidationError::InvalidUrl("AUTH__DEFAULT_REDIRECT_URL"));
        }
        if let Some(domain) = &self.cookie_domain {
            if !is_cookie_domain(domain) {
                return Err(ValidationError::InvalidCookieDomain);
            }
        }
        Ok(())
    }
}

/// Letters, digits, dots and hyphens only, with an optional leading dot.
fn is_cookie_domain(domain: &str) -> bool {
    let host = domain.strip_prefix('.').unwrap_or(domain);
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

fn check_secret(
    name: &'static str,
    secret: &SecretString,
    environment: &Environment,
) -> Result<(), ValidationError> {
    let len = secret.expose_secret().len();
    if len == 0 {
        return Err(ValidationError::MissingRequired(name));
    }
    if *environment == Environment::Production && len < MIN_PRODUCTION_SECRET_BYTES {
        return Err(ValidationError::WeakSecret(name));
    }
    Ok(())
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bearer_secret: empty_secret(),
            id_token_secret: empty_secret(),
            issuer: default_issuer(),
            bearer_ttl_secs: default_bearer_ttl(),
            id_token_ttl_secs: default_id_token_ttl(),
            activation_ttl_secs: default_activation_ttl(),
            cookie_secure: false,
            cookie_domain: None,
            default_redirect_url: default_redirect_url(),
            activation_base_url: default_activation_base_url(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_issuer() -> String {
    "donation-service".to_string()
}

fn default_bearer_ttl() -> i64 {
    6 * 60 * 60
}

fn default_id_token_ttl() -> i64 {
    7 * 24 * 60 * 60
}

fn default_activation_ttl() -> i64 {
    15 * 60
}

fn default_redirect_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_activation_base_url() -> String {
    "http://localhost:8080/v2/auth/activate".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secrets(bearer: &str, id_token: &str) -> AuthConfig {
        AuthConfig {
            bearer_secret: SecretString::new(bearer.to_string()),
            id_token_secret: SecretString::new(id_token.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.activation_ttl_secs, 900);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_validation_missing_secret() {
        let config = with_secrets("", "id-token-secret");
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__BEARER_SECRET"))
        );
    }

    #[test]
    fn test_short_secrets_only_allowed_outside_production() {
        let config = with_secrets("short", "also-short");
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::WeakSecret("AUTH__BEARER_SECRET"))
        );
    }

    #[test]
    fn test_long_secrets_pass_in_production() {
        let long = "k".repeat(32);
        let config = with_secrets(&long, &long);
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_invalid_activation_base_url() {
        let config = AuthConfig {
            activation_base_url: "not a url".to_string(),
            ..with_secrets("a", "b")
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidUrl("AUTH__ACTIVATION_BASE_URL"))
        );
    }

    #[test]
    fn test_cookie_domain_must_be_a_host() {
        let mut config = with_secrets("b", "i");
        config.cookie_domain = Some(".example.org".to_string());
        assert!(config.validate(&Environment::Development).is_ok());

        config.cookie_domain = Some("example.org; Path=/admin".to_string());
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidCookieDomain)
        );

        config.cookie_domain = Some(String::new());
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidCookieDomain)
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = with_secrets("super-secret-value", "other-secret-value");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
    }
}
