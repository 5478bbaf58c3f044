//! Browser-facing checkout configuration.
//!
//! The publishable key ends up in client-side script, so anything that looks
//! like a secret or restricted key is refused before it can be embedded.

use serde::Serialize;
use thiserror::Error;

use crate::domain::foundation::Money;

const SECRET_KEY_PREFIX: &str = "sk_";
const RESTRICTED_KEY_PREFIX: &str = "rk_";

/// Why a checkout could not be initialised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutKeyError {
    #[error("Card payments are not configured. Please contact the site administrator.")]
    NotConfigured,

    /// Never carries the key itself.
    #[error(
        "Payment configuration error: a secret key was configured where the publishable key \
         (pk_...) belongs. Update the publishable key in the payment settings."
    )]
    SecretKeySupplied,
}

/// A processor key that is safe to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PublishableKey(String);

impl PublishableKey {
    /// Validates a configured publishable key.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if the value is empty
    /// - `SecretKeySupplied` if the value has a secret or restricted key prefix
    pub fn parse(raw: &str) -> Result<Self, CheckoutKeyError> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(CheckoutKeyError::NotConfigured);
        }
        if key.starts_with(SECRET_KEY_PREFIX) || key.starts_with(RESTRICTED_KEY_PREFIX) {
            return Err(CheckoutKeyError::SecretKeySupplied);
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the browser needs to mount the hosted card form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardCheckout {
    pub publishable_key: PublishableKey,
    pub amount: Money,
}

impl CardCheckout {
    /// The only way to build a checkout, so a secret key can never reach it.
    pub fn initialize(raw_key: &str, amount: Money) -> Result<Self, CheckoutKeyError> {
        Ok(Self {
            publishable_key: PublishableKey::parse(raw_key)?,
            amount,
        })
    }
}
