//! Payment-intent event handlers - settle payment rows from Stripe events.
//!
//! | Event | Transition |
//! |-------|------------|
//! | `payment_intent.succeeded` | complete |
//! | `payment_intent.payment_failed` | fail with the processor's reason |
//! | `payment_intent.canceled` | fail with "canceled" |
//!
//! A completed payment never fails; such events are acknowledged as ignored.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::webhook::{
    PaymentIntentObject, StripeEvent, StripeEventType, WebhookDispatcher, WebhookError,
    WebhookEventHandler,
};
use crate::ports::{AccountMetaKey, AccountProvider, PaymentRepository};

/// Finds and updates the payment row an intent belongs to.
struct PaymentSettlement {
    payments: Arc<dyn PaymentRepository>,
    accounts: Arc<dyn AccountProvider>,
}

impl PaymentSettlement {
    async fn locate(&self, intent: &PaymentIntentObject) -> Result<Payment, WebhookError> {
        self.payments
            .find_by_transaction_id(&intent.id)
            .await?
            .ok_or_else(|| WebhookError::PaymentNotFound(intent.id.clone()))
    }

    async fn save(&self, payment: &Payment) -> Result<(), WebhookError> {
        self.payments.update(payment).await?;

        let account_id = &payment.account_id;
        self.accounts
            .set_meta(account_id, AccountMetaKey::PaymentStatus, payment.status.as_str())
            .await
            .map_err(|e| WebhookError::Storage(e.to_string()))?;
        if let Some(txn) = &payment.transaction_id {
            self.accounts
                .set_meta(account_id, AccountMetaKey::TransactionId, txn)
                .await
                .map_err(|e| WebhookError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

fn intent_of(event: &StripeEvent) -> Result<PaymentIntentObject, WebhookError> {
    event
        .payment_intent()
        .map_err(|e| WebhookError::ParseError(format!("invalid payment intent: {}", e)))
}

/// Handles `payment_intent.succeeded`.
pub struct PaymentSucceededHandler {
    settlement: PaymentSettlement,
}

#[async_trait]
impl WebhookEventHandler for PaymentSucceededHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::PaymentIntentSucceeded]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let intent = intent_of(event)?;
        let mut payment = self.settlement.locate(&intent).await?;

        if intent.amount != 0 && intent.amount != payment.amount.amount_minor() {
            tracing::warn!(
                payment_id = %payment.id,
                expected = payment.amount.amount_minor(),
                received = intent.amount,
                "Settled amount differs from recorded amount"
            );
        }

        let outcome = payment.complete(Some(intent.id.clone()))?;
        if !outcome.is_changed() {
            tracing::debug!(payment_id = %payment.id, "Payment already completed");
            return Ok(());
        }

        self.settlement.save(&payment).await?;
        tracing::info!(
            event_id = %event.id,
            payment_id = %payment.id,
            account_id = %payment.account_id,
            "Payment completed"
        );
        Ok(())
    }
}

/// Handles `payment_intent.payment_failed` and `payment_intent.canceled`.
pub struct PaymentFailedHandler {
    settlement: PaymentSettlement,
}

#[async_trait]
impl WebhookEventHandler for PaymentFailedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![
            StripeEventType::PaymentIntentPaymentFailed,
            StripeEventType::PaymentIntentCanceled,
        ]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let intent = intent_of(event)?;
        let mut payment = self.settlement.locate(&intent).await?;

        if payment.status == PaymentStatus::Completed {
            return Err(WebhookError::Ignored(format!(
                "payment {} already completed",
                payment.id
            )));
        }

        let reason = match event.parsed_type() {
            StripeEventType::PaymentIntentCanceled => "canceled".to_string(),
            _ => intent.failure_reason(),
        };
        let outcome = payment.fail(&reason)?;
        if !outcome.is_changed() {
            return Ok(());
        }

        self.settlement.save(&payment).await?;
        tracing::info!(
            event_id = %event.id,
            payment_id = %payment.id,
            account_id = %payment.account_id,
            reason = %reason,
            "Payment failed"
        );
        Ok(())
    }
}

/// Routes payment-intent events to their handlers.
pub struct PaymentIntentDispatcher {
    succeeded: PaymentSucceededHandler,
    failed: PaymentFailedHandler,
}

impl PaymentIntentDispatcher {
    pub fn new(payments: Arc<dyn PaymentRepository>, accounts: Arc<dyn AccountProvider>) -> Self {
        Self {
            succeeded: PaymentSucceededHandler {
                settlement: PaymentSettlement {
                    payments: payments.clone(),
                    accounts: accounts.clone(),
                },
            },
            failed: PaymentFailedHandler {
                settlement: PaymentSettlement { payments, accounts },
            },
        }
    }
}

#[async_trait]
impl WebhookDispatcher for PaymentIntentDispatcher {
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler> {
        if self.succeeded.handles().contains(event_type) {
            Some(&self.succeeded)
        } else if self.failed.handles().contains(event_type) {
            Some(&self.failed)
        } else {
            None
        }
    }
}
