//! Payment handlers.
//!
//! ## Commands
//! - Processing Stripe webhook deliveries
//!
//! The payment-intent event handlers are the only code that moves a
//! payment out of `pending`.

mod handle_payment_webhook;
mod payment_intent_events;

pub use handle_payment_webhook::{HandlePaymentWebhookCommand, HandlePaymentWebhookHandler};
pub use payment_intent_events::{
    PaymentFailedHandler, PaymentIntentDispatcher, PaymentSucceededHandler,
};
