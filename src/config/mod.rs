//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `TOCC` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use tocc_membership::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod email;
mod error;
mod payment;
mod registration;
mod server;

pub use database::{DatabaseConfig, StorageBackend};
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use registration::RegistrationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend and PostgreSQL pool
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Stripe keys and membership prices
    pub payment: PaymentConfig,

    #[serde(default)]
    pub email: EmailConfig,

    pub registration: RegistrationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `TOCC` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `TOCC__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TOCC__PAYMENT__STRIPE_SECRET_KEY=...` -> `payment.stripe_secret_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TOCC")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        self.registration.validate()?;
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

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MINIMAL_ENV: &[(&str, &str)] = &[
        ("TOCC__DATABASE__STORAGE", "memory"),
        ("TOCC__PAYMENT__STRIPE_SECRET_KEY", "sk_test_xxx"),
        ("TOCC__PAYMENT__STRIPE_PUBLISHABLE_KEY", "pk_test_xxx"),
        ("TOCC__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx"),
        (
            "TOCC__REGISTRATION__NONCE_SECRET",
            "0123456789abcdef0123456789abcdef",
        ),
    ];

    const EXTRA_VARS: &[&str] = &[
        "TOCC__SERVER__PORT",
        "TOCC__SERVER__ENVIRONMENT",
        "TOCC__PAYMENT__CARD_INTENT_AMOUNT_MINOR",
        "TOCC__EMAIL__RESEND_API_KEY",
    ];

    fn set_minimal_env() {
        for (key, value) in MINIMAL_ENV {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in MINIMAL_ENV {
            env::remove_var(key);
        }
        for key in EXTRA_VARS {
            env::remove_var(key);
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
        assert_eq!(config.payment.stripe_secret_key.expose_secret(), "sk_test_xxx");
        assert_eq!(config.payment.card_intent_amount_minor, 73_200);
        assert_eq!(config.registration.nonce_lifetime_secs, 86_400);
        assert_eq!(config.email.organisation_name, "LCCI");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TOCC__SERVER__PORT", "3000");
        env::set_var("TOCC__SERVER__ENVIRONMENT", "production");
        env::set_var("TOCC__PAYMENT__CARD_INTENT_AMOUNT_MINOR", "50000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.payment.card_intent_amount_minor, 50_000);
    }

    #[test]
    fn test_missing_stripe_keys_fail_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(
            "TOCC__REGISTRATION__NONCE_SECRET",
            "0123456789abcdef0123456789abcdef",
        );
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_invalid_resend_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TOCC__EMAIL__RESEND_API_KEY", "not-a-resend-key");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(
            result.unwrap().validate(),
            Err(ValidationError::InvalidResendKey)
        );
    }
}
