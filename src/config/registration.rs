//! Registration configuration (form tokens, login link, admin access)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

const MIN_NONCE_SECRET_LEN: usize = 32;
const MIN_ADMIN_TOKEN_LEN: usize = 16;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Link included in the welcome email and returned as the redirect
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// HMAC key for anti-forgery tokens
    pub nonce_secret: SecretString,

    #[serde(default = "default_nonce_lifetime")]
    pub nonce_lifetime_secs: u64,

    /// Bearer token for the admin listings; unset disables them
    pub admin_api_token: Option<SecretString>,
}

impl RegistrationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.login_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("REGISTRATION__LOGIN_URL"));
        }
        if self.nonce_secret.expose_secret().len() < MIN_NONCE_SECRET_LEN {
            return Err(ValidationError::NonceSecretTooShort);
        }
        if self.nonce_lifetime_secs < 2 {
            return Err(ValidationError::InvalidNonceLifetime);
        }
        if let Some(token) = &self.admin_api_token {
            if token.expose_secret().len() < MIN_ADMIN_TOKEN_LEN {
                return Err(ValidationError::AdminTokenTooShort);
            }
        }
        Ok(())
    }
}

fn default_login_url() -> String {
    "/login".to_string()
}

fn default_nonce_lifetime() -> u64 {
    86_400
}
