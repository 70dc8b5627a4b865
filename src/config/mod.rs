//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the `config`
//! and `dotenvy` crates. Variables use the `DONATION` prefix and `__` between
//! nested keys.
//!
//! # Example
//!
//! ```no_run
//! use donation_service::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on port {}", config.server.port);
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::{DatabaseConfig, StorageBackend};
pub use error::{ConfigError, ValidationError};
pub use payment::{PaymentConfig, PaymentMode};
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend and PostgreSQL connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token signing, activation links and cookies
    #[serde(default)]
    pub auth: AuthConfig,

    /// Card gateway
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DONATION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `DONATION__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DONATION__PAYMENT__MERCHANT_ID=...` -> `payment.merchant_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DONATION")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate(self.server.request_timeout())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; tests touching them run one at a time.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DONATION__DATABASE__STORAGE",
        "DONATION__AUTH__BEARER_SECRET",
        "DONATION__AUTH__ID_TOKEN_SECRET",
        "DONATION__PAYMENT__MODE",
        "DONATION__PAYMENT__PARTNER_KEY",
        "DONATION__PAYMENT__MERCHANT_ID",
        "DONATION__SERVER__PORT",
        "DONATION__SERVER__ENVIRONMENT",
        "DONATION__SERVER__LOG_FORMAT",
    ];

    fn set_minimal_env() {
        env::set_var("DONATION__DATABASE__STORAGE", "memory");
        env::set_var("DONATION__AUTH__BEARER_SECRET", "bearer-secret");
        env::set_var("DONATION__AUTH__ID_TOKEN_SECRET", "id-token-secret");
        env::set_var("DONATION__PAYMENT__MODE", "mock");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.storage, StorageBackend::Memory);
        assert_eq!(config.payment.mode, PaymentMode::Mock);
        assert_eq!(config.auth.bearer_secret.expose_secret(), "bearer-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DONATION__SERVER__PORT", "3000");
        env::set_var("DONATION__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
    }

    #[test]
    fn test_production_rejects_short_secrets() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DONATION__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WeakSecret(_))
        ));
    }

    #[test]
    fn test_tappay_mode_requires_credentials() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::remove_var("DONATION__PAYMENT__MODE");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(
            result.unwrap().validate(),
            Err(ValidationError::MissingRequired("PAYMENT__PARTNER_KEY"))
        );
    }
}
