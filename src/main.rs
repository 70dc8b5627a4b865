//! Donation service binary.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use donation_service::adapters::auth::{BearerTokenCodec, IdTokenCodec};
use donation_service::adapters::http::{build_router, AppState, CookieSettings};
use donation_service::adapters::mailer::LoggingMailer;
use donation_service::adapters::memory::{InMemoryAccountRepository, InMemoryDonationRepository};
use donation_service::adapters::postgres::{PostgresAccountRepository, PostgresDonationRepository};
use donation_service::adapters::tappay::{MockPaymentGateway, TapPayConfig, TapPayGateway};
use donation_service::application::handlers::{AccountSettings, DonationSettings};
use donation_service::config::{
    AppConfig, DatabaseConfig, LogFormat, PaymentMode, ServerConfig, StorageBackend,
};
use donation_service::ports::{AccountRepository, DonationRepository, PaymentGateway};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // --- Configuration ---
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;
    tracing::info!(
        environment = ?config.server.environment,
        storage = ?config.database.storage,
        payment_mode = ?config.payment.mode,
        "Loaded configuration"
    );

    // --- Storage ---
    let (donations, accounts): (Arc<dyn DonationRepository>, Arc<dyn AccountRepository>) =
        match config.database.storage {
            StorageBackend::Postgres => {
                let pool = connect(&config.database).await?;
                (
                    Arc::new(PostgresDonationRepository::new(pool.clone())),
                    Arc::new(PostgresAccountRepository::new(pool)),
                )
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                (
                    Arc::new(InMemoryDonationRepository::new()),
                    Arc::new(InMemoryAccountRepository::new()),
                )
            }
        };

    // --- Payment gateway ---
    let gateway: Arc<dyn PaymentGateway> = match config.payment.mode {
        PaymentMode::Tappay => {
            let tappay = TapPayConfig::new(config.payment.partner_key.clone())
                .with_base_url(config.payment.api_base_url.clone())
                .with_timeout(config.payment.timeout());
            Arc::new(TapPayGateway::new(tappay)?)
        }
        PaymentMode::Mock => {
            tracing::warn!("Using mock payment gateway; no card is charged");
            Arc::new(MockPaymentGateway::new())
        }
    };

    // --- App state ---
    let auth = &config.auth;
    let storage_timeout = config.database.statement_timeout();
    let state = AppState {
        donations,
        accounts,
        gateway,
        mailer: Arc::new(LoggingMailer::new()),
        bearer_codec: Arc::new(BearerTokenCodec::new(
            auth.bearer_secret.clone(),
            auth.issuer.clone(),
            auth.bearer_ttl_secs,
        )),
        id_token_codec: Arc::new(IdTokenCodec::new(
            auth.id_token_secret.clone(),
            auth.issuer.clone(),
            auth.id_token_ttl_secs,
        )),
        donation_settings: DonationSettings {
            merchant_id: config.payment.merchant_id.clone(),
            order_number_prefix: config.payment.order_number_prefix.clone(),
            default_currency: config.payment.default_currency.clone(),
            gateway_timeout: config.payment.timeout(),
            storage_timeout,
        },
        account_settings: AccountSettings {
            activation_ttl_secs: auth.activation_ttl_secs,
            activation_base_url: auth.activation_base_url.clone(),
            storage_timeout,
        },
        cookie: CookieSettings {
            secure: auth.cookie_secure,
            domain: auth.cookie_domain.clone(),
        },
        default_redirect_url: auth.default_redirect_url.clone(),
    };

    let app = build_router(state, &config.server);

    // --- Start server ---
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));
    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Opens the pool with a server-side statement timeout on every connection.
async fn connect(database: &DatabaseConfig) -> Result<PgPool, BoxError> {
    let statement_timeout_ms = database.statement_timeout_ms;
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute(format!("SET statement_timeout = {}", statement_timeout_ms).as_str())
                    .await?;
                Ok(())
            })
        })
        .connect(&database.url)
        .await?;
    tracing::info!("Database connection pool created");

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(pool)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
