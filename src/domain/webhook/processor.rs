//! Idempotent webhook processing.
//!
//! 1. Skip events whose id was already recorded
//! 2. Dispatch to the handler for the event type
//! 3. Record the outcome; losing the insert race counts as already processed
//!
//! Retryable failures are not recorded so Stripe's redelivery gets another
//! attempt.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookRecordStatus, WebhookResult,
};

use super::errors::WebhookError;
use super::stripe_event::{StripeEvent, StripeEventType};

/// Handles one or more Stripe event types.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    fn handles(&self) -> Vec<StripeEventType>;

    /// `Err(WebhookError::Ignored(_))` acknowledges without changing anything.
    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError>;
}

/// Routes events to handlers.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler>;

    async fn dispatch(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let event_type = event.parsed_type();
        match self.get_handler(&event_type) {
            Some(handler) => handler.handle(event).await,
            None => Err(WebhookError::Ignored(format!(
                "unhandled event type {}",
                event.event_type
            ))),
        }
    }
}

/// Processes each Stripe event id at most once.
pub struct IdempotentWebhookProcessor {
    repository: Arc<dyn WebhookEventRepository>,
    dispatcher: Arc<dyn WebhookDispatcher>,
}

impl IdempotentWebhookProcessor {
    pub fn new(
        repository: Arc<dyn WebhookEventRepository>,
        dispatcher: Arc<dyn WebhookDispatcher>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    pub async fn process(&self, event: StripeEvent) -> Result<WebhookResult, WebhookError> {
        if self.repository.find_by_event_id(&event.id).await?.is_some() {
            tracing::debug!(event_id = %event.id, "Webhook event already processed");
            return Ok(WebhookResult::AlreadyProcessed);
        }

        let (status, detail, outcome) = match self.dispatcher.dispatch(&event).await {
            Ok(()) => (WebhookRecordStatus::Success, None, Ok(WebhookResult::Processed)),
            Err(WebhookError::Ignored(reason)) => (
                WebhookRecordStatus::Ignored,
                Some(reason.clone()),
                Ok(WebhookResult::Ignored(reason)),
            ),
            Err(e) if e.is_retryable() => return Err(e),
            Err(e) => (WebhookRecordStatus::Failed, Some(e.to_string()), Err(e)),
        };

        let payload = serde_json::to_value(&event)
            .map_err(|e| WebhookError::ParseError(format!("failed to serialize event: {}", e)))?;
        let record = WebhookEventRecord::new(&event.id, &event.event_type, status, detail, payload);

        match self.repository.save(record).await? {
            SaveResult::Inserted => outcome,
            SaveResult::AlreadyExists => {
                tracing::debug!(event_id = %event.id, "Lost webhook save race");
                Ok(WebhookResult::AlreadyProcessed)
            }
        }
    }
}
