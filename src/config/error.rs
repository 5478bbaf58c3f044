//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request body limit must be between 1 KiB and 1 MiB")]
    InvalidBodyLimit,

    #[error("CORS origin must be scheme://host[:port]: {0}")]
    InvalidCorsOrigin(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Stripe secret key format")]
    InvalidStripeKey,

    #[error("Stripe publishable key must not be a secret or restricted key")]
    SecretKeyAsPublishable,

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Price must be positive: {0}")]
    InvalidPrice(&'static str),

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,

    #[error("VAT percentage must be between 0 and 100")]
    InvalidVatPercent,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Nonce secret must be at least 32 characters")]
    NonceSecretTooShort,

    #[error("Nonce lifetime must be at least 2 seconds")]
    InvalidNonceLifetime,

    #[error("Admin API token must be at least 16 characters")]
    AdminTokenTooShort,
}
