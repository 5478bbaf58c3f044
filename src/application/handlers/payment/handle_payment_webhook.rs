//! HandlePaymentWebhookHandler - Command handler for Stripe webhook deliveries.

use std::sync::Arc;

use crate::domain::webhook::{IdempotentWebhookProcessor, StripeWebhookVerifier, WebhookError};
use crate::ports::WebhookResult;

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body; the signature covers these exact bytes.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: Option<String>,
}

/// Handler for Stripe webhook deliveries.
///
/// Nothing is dispatched until the signature verifies.
pub struct HandlePaymentWebhookHandler {
    verifier: Arc<StripeWebhookVerifier>,
    processor: Arc<IdempotentWebhookProcessor>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: Arc<StripeWebhookVerifier>,
        processor: Arc<IdempotentWebhookProcessor>,
    ) -> Self {
        Self {
            verifier,
            processor,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<WebhookResult, WebhookError> {
        // 1. Verify signature and parse event
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(WebhookError::MissingSignature)?;
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook verification failed");
                e
            })?;

        tracing::info!(event_id = %event.id, event_type = %event.event_type, "Webhook received");

        // 2. Process at most once per event id
        self.processor.process(event).await
    }
}
