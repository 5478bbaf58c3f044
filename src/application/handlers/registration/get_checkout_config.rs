//! GetCheckoutConfigHandler - Query handler for the browser card checkout.

use crate::domain::foundation::Money;
use crate::domain::payment::CardCheckout;
use crate::domain::registration::RegistrationError;

/// Handler that builds the browser-facing checkout configuration.
pub struct GetCheckoutConfigHandler {
    publishable_key: String,
    card_amount: Money,
}

impl GetCheckoutConfigHandler {
    pub fn new(publishable_key: impl Into<String>, card_amount: Money) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            card_amount,
        }
    }

    /// # Errors
    ///
    /// - `ProcessorNotConfigured` when no publishable key is set
    /// - `SecretKeyExposed` when the configured key is a secret key
    pub fn handle(&self) -> Result<CardCheckout, RegistrationError> {
        CardCheckout::initialize(&self.publishable_key, self.card_amount.clone()).map_err(|e| {
            tracing::error!(error = %e, "Card checkout refused to initialise");
            RegistrationError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::ErrorKind;

    #[test]
    fn returns_publishable_key_and_amount() {
        let handler = GetCheckoutConfigHandler::new("pk_test_123", Money::gbp(73_200));

        let checkout = handler.handle().unwrap();

        assert_eq!(checkout.publishable_key.as_str(), "pk_test_123");
        assert_eq!(checkout.amount.amount_minor(), 73_200);
    }

    #[test]
    fn empty_key_is_not_configured() {
        let err = GetCheckoutConfigHandler::new("", Money::gbp(1)).handle().unwrap_err();
        assert_eq!(err, RegistrationError::ProcessorNotConfigured);
    }

    #[test]
    fn secret_key_is_refused_without_echoing_it() {
        let err = GetCheckoutConfigHandler::new("sk_live_abcdef", Money::gbp(1))
            .handle()
            .unwrap_err();

        assert_eq!(err, RegistrationError::SecretKeyExposed);
        assert_eq!(err.kind(), ErrorKind::ProcessorConfiguration);
        assert!(!err.message().contains("sk_live_abcdef"));
    }
}
