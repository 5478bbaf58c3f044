//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::adapters::stripe::DEFAULT_API_BASE_URL;
use crate::domain::payment::{PriceSchedule, TieredPricing};

use super::error::ValidationError;

/// Payment configuration (Stripe keys and membership prices)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret key, server-side only
    pub stripe_secret_key: SecretString,

    /// Stripe publishable key handed to the browser; empty disables card payments
    #[serde(default)]
    pub stripe_publishable_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    #[serde(default = "default_direct_debit_price")]
    pub direct_debit_price_minor: i64,

    #[serde(default = "default_standard_price")]
    pub standard_price_minor: i64,

    /// Amount every card PaymentIntent is created for
    #[serde(default = "default_card_intent_amount")]
    pub card_intent_amount_minor: i64,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_vat_percent")]
    pub vat_percent: u32,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Flat prices used for persisted payment amounts.
    pub fn price_schedule(&self) -> PriceSchedule {
        PriceSchedule::new(
            self.direct_debit_price_minor,
            self.standard_price_minor,
            self.card_intent_amount_minor,
            &self.currency,
        )
    }

    /// Tiered calculator with the configured VAT rate.
    pub fn tiered_pricing(&self) -> TieredPricing {
        TieredPricing::standard(self.vat_percent, self.currency.clone())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret_key = self.stripe_secret_key.expose_secret();
        if secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_SECRET_KEY"));
        }
        if !secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }

        let webhook_secret = self.stripe_webhook_secret.expose_secret();
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_WEBHOOK_SECRET"));
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        let publishable = self.stripe_publishable_key.trim();
        if publishable.starts_with("sk_") || publishable.starts_with("rk_") {
            return Err(ValidationError::SecretKeyAsPublishable);
        }

        if self.direct_debit_price_minor <= 0 {
            return Err(ValidationError::InvalidPrice("direct_debit_price_minor"));
        }
        if self.standard_price_minor <= 0 {
            return Err(ValidationError::InvalidPrice("standard_price_minor"));
        }
        if self.card_intent_amount_minor <= 0 {
            return Err(ValidationError::InvalidPrice("card_intent_amount_minor"));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.vat_percent > 100 {
            return Err(ValidationError::InvalidVatPercent);
        }
        Ok(())
    }
}

fn default_direct_debit_price() -> i64 {
    66_600
}

fn default_standard_price() -> i64 {
    73_200
}

fn default_card_intent_amount() -> i64 {
    73_200
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_vat_percent() -> u32 {
    20
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
