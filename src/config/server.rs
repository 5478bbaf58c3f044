//! HTTP listener settings: bind address, deployment environment, log filter,
//! request limits and the site origins allowed to call the registration API.

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Largest accepted body. Registration forms and Stripe events are a few KiB.
const MAX_BODY_LIMIT_BYTES: usize = 1024 * 1024;
const MIN_BODY_LIMIT_BYTES: usize = 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface the API listens on (`TOCC__SERVER__HOST`).
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Production switches logs to JSON.
    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound for a request, including the Stripe call on the card path.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Cap on form and webhook bodies.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// Comma-separated site origins hosting the registration wizard,
    /// e.g. `https://tocc.example,https://www.tocc.example`.
    pub cors_origins: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidBindAddress(raw))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configured wizard origins with blanks and trailing slashes removed.
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().trim_end_matches('/').to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(MIN_BODY_LIMIT_BYTES..=MAX_BODY_LIMIT_BYTES).contains(&self.body_limit_bytes) {
            return Err(ValidationError::InvalidBodyLimit);
        }
        if let Some(origin) = self
            .cors_origins_list()
            .into_iter()
            .find(|origin| !is_web_origin(origin))
        {
            return Err(ValidationError::InvalidCorsOrigin(origin));
        }
        self.socket_addr()?;
        Ok(())
    }
}

/// `scheme://host[:port]` with no path.
fn is_web_origin(origin: &str) -> bool {
    let rest = match origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };
    !rest.is_empty() && !rest.contains('/')
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,tocc_membership=debug,sqlx=warn".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_body_limit() -> usize {
    64 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_in_development() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.log_level, "info,tocc_membership=debug,sqlx=warn");
        assert_eq!(config.body_limit_bytes, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn hostname_is_not_a_bind_address() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.socket_addr(),
            Err(ValidationError::InvalidBindAddress(_))
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn production_environment_is_detected() {
        let mut config = ServerConfig::default();
        assert!(!config.is_production());

        config.environment = Environment::Production;
        assert!(config.is_production());
    }

    #[test]
    fn wizard_origins_skip_blanks_and_trailing_slashes() {
        let config = ServerConfig {
            cors_origins: Some("https://tocc.example/, ,https://lcci.example".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.cors_origins_list(),
            vec!["https://tocc.example", "https://lcci.example"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn origin_with_path_or_no_scheme_is_rejected() {
        for bad in ["tocc.example", "https://tocc.example/register", "ftp://tocc.example"] {
            let config = ServerConfig {
                cors_origins: Some(bad.to_string()),
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::InvalidCorsOrigin(bad.to_string()))
            );
        }
    }

    #[test]
    fn port_timeout_and_body_limit_are_bounded() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));

        let config = ServerConfig {
            request_timeout_secs: 500,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));

        let config = ServerConfig {
            body_limit_bytes: 10 * 1024 * 1024,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBodyLimit));
    }
}
