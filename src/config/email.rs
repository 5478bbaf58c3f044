//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key. Without one, welcome emails are only logged.
    pub resend_api_key: Option<SecretString>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Name used in the welcome email subject and intent descriptions
    #[serde(default = "default_organisation_name")]
    pub organisation_name: String,
}

impl EmailConfig {
    /// Formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// The configured key, if it is non-empty.
    pub fn delivery_key(&self) -> Option<&SecretString> {
        self.resend_api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = self.delivery_key() {
            if !key.expose_secret().starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.organisation_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__ORGANISATION_NAME"));
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
            organisation_name: default_organisation_name(),
        }
    }
}

fn default_from_email() -> String {
    "membership@tocc.org.uk".to_string()
}

fn default_from_name() -> String {
    "TOCC Membership".to_string()
}

fn default_organisation_name() -> String {
    "LCCI".to_string()
}
