//! Process startup: tracing, storage selection, wiring and serving.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::adapters::email::{LoggingNotifier, ResendNotifier};
use crate::adapters::http::{build_router, AppDependencies, AppSettings, AppState};
use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgres::{
    self, PostgresAccountProvider, PostgresMemberDirectory, PostgresMemberRepository,
    PostgresPaymentRepository, PostgresWebhookEventRepository,
};
use crate::adapters::security::HmacAntiForgery;
use crate::adapters::stripe::{StripeConfig, StripePaymentGateway};
use crate::application::RegistrationSettings;
use crate::config::{
    AppConfig, ConfigError, DatabaseConfig, ServerConfig, StorageBackend, ValidationError,
};
use crate::domain::foundation::Timestamp;
use crate::domain::webhook::StripeWebhookVerifier;
use crate::ports::{
    AccountProvider, MemberDirectory, MemberRepository, Notifier, PaymentRepository,
    WebhookEventRepository,
};

/// Processed webhook events older than this are pruned.
const WEBHOOK_RETENTION_SECS: i64 = 90 * 24 * 60 * 60;
const WEBHOOK_PRUNE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON logs in production, human-readable elsewhere. `RUST_LOG` overrides
/// the configured filter.
pub fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let result = if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Storage ports backed by the configured backend.
pub struct Storage {
    pub accounts: Arc<dyn AccountProvider>,
    pub members: Arc<dyn MemberRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub directory: Arc<dyn MemberDirectory>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
}

impl Storage {
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            accounts: Arc::new(store.clone()),
            members: Arc::new(store.clone()),
            payments: Arc::new(store.clone()),
            directory: Arc::new(store.clone()),
            webhook_events: Arc::new(store),
        }
    }

    pub async fn open(config: &DatabaseConfig) -> Result<Self, StartupError> {
        match config.storage {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; registrations are lost on restart");
                Ok(Self::in_memory(InMemoryStore::new()))
            }
            StorageBackend::Postgres => {
                let pool = postgres::connect(config).await?;
                if config.run_migrations {
                    postgres::run_migrations(&pool).await?;
                    tracing::info!("Database migrations applied");
                }
                Ok(Self {
                    accounts: Arc::new(PostgresAccountProvider::new(pool.clone())),
                    members: Arc::new(PostgresMemberRepository::new(pool.clone())),
                    payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
                    directory: Arc::new(PostgresMemberDirectory::new(pool.clone())),
                    webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool)),
                })
            }
        }
    }
}

/// Wires adapters and handlers from configuration.
pub fn build_state(config: &AppConfig, storage: Storage) -> AppState {
    let gateway = StripePaymentGateway::new(
        StripeConfig::new(config.payment.stripe_secret_key.clone())
            .with_base_url(config.payment.api_base_url.clone()),
    );

    let notifier: Arc<dyn Notifier> = match config.email.delivery_key() {
        Some(key) => Arc::new(ResendNotifier::new(key.clone(), config.email.from_header())),
        None => {
            tracing::info!("No Resend API key configured; welcome emails will only be logged");
            Arc::new(LoggingNotifier)
        }
    };

    let deps = AppDependencies {
        accounts: storage.accounts,
        members: storage.members,
        payments: storage.payments,
        directory: storage.directory,
        webhook_events: storage.webhook_events,
        gateway: Arc::new(gateway),
        notifier,
        anti_forgery: Arc::new(HmacAntiForgery::new(
            config.registration.nonce_secret.clone(),
            config.registration.nonce_lifetime_secs,
        )),
        webhook_verifier: Arc::new(StripeWebhookVerifier::new(
            config.payment.stripe_webhook_secret.clone(),
        )),
    };

    let settings = AppSettings {
        registration: RegistrationSettings {
            prices: config.payment.price_schedule(),
            tiers: config.payment.tiered_pricing(),
            login_url: config.registration.login_url.clone(),
            organisation: config.email.organisation_name.clone(),
        },
        publishable_key: config.payment.stripe_publishable_key.clone(),
        admin_token: config.registration.admin_api_token.clone(),
    };

    AppState::new(deps, settings)
}

/// Periodically removes old processed webhook events.
fn spawn_webhook_pruning(repository: Arc<dyn WebhookEventRepository>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(WEBHOOK_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let Some(cutoff) =
                Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() - WEBHOOK_RETENTION_SECS)
            else {
                continue;
            };
            match repository.delete_before(cutoff).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Pruned processed webhook events"),
                Err(e) => tracing::warn!(error = %e, "Failed to prune webhook events"),
            }
        }
    });
}

/// Loads configuration and serves until Ctrl-C or SIGTERM.
pub async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let storage = Storage::open(&config.database).await?;
    spawn_webhook_pruning(storage.webhook_events.clone());

    let state = build_state(&config, storage);
    let app = build_router(state, &config.server);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        address = %addr,
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "TOCC membership service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("TOCC membership service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received terminate signal, initiating graceful shutdown"),
    }
}
