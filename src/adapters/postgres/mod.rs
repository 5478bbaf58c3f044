//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresAccountProvider` - Accounts and account meta
//! - `PostgresMemberRepository` - Company details, one row per account
//! - `PostgresPaymentRepository` - Payment attempts
//! - `PostgresMemberDirectory` - Admin listings (read side)
//! - `PostgresWebhookEventRepository` - Processed Stripe events

mod account_provider;
mod member_directory;
mod member_repository;
mod payment_repository;
mod webhook_event_repository;

pub use account_provider::PostgresAccountProvider;
pub use member_directory::PostgresMemberDirectory;
pub use member_repository::PostgresMemberRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

/// Opens a connection pool sized from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Applies the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
