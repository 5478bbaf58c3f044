//! Webhook module - verified Stripe events that settle payment rows.

mod errors;
mod processor;
mod stripe_event;
mod verifier;

pub use errors::WebhookError;
pub use processor::{IdempotentWebhookProcessor, WebhookDispatcher, WebhookEventHandler};
pub use stripe_event::{
    LastPaymentError, PaymentIntentObject, StripeEvent, StripeEventData, StripeEventType,
};
pub use verifier::{
    SignatureHeader, StripeWebhookVerifier, MAX_CLOCK_SKEW_SECS, MAX_EVENT_AGE_SECS,
};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
