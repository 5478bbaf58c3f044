//! CreatePaymentIntentHandler - Command handler for the card payment path.
//!
//! The browser collects card details against the returned client secret.
//! The account and the pending payment row are written as soon as the intent
//! exists; the payment settles later through the webhook.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::foundation::{AccountId, Money, PaymentId};
use crate::domain::payment::PaymentMethod;
use crate::domain::registration::{PaymentSelection, RegistrationError, RegistrationRequest};
use crate::ports::{
    AntiForgery, CreatePaymentIntentRequest, NonceScope, PaymentErrorCode, PaymentGateway,
};

use super::register_member::{ProcessorCharge, RegisterMemberHandler};

/// Command to create a card PaymentIntent and register the member.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    pub nonce: String,
    pub data: String,
    /// Minor units requested by the browser.
    pub amount: i64,
}

/// Result of a successful intent creation.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentResult {
    pub client_secret: String,
    pub payment_intent_id: String,
    pub account_id: AccountId,
    pub payment_id: Option<PaymentId>,
    pub redirect: String,
}

/// Handler for card payment initiation.
pub struct CreatePaymentIntentHandler {
    anti_forgery: Arc<dyn AntiForgery>,
    gateway: Arc<dyn PaymentGateway>,
    registration: Arc<RegisterMemberHandler>,
}

impl CreatePaymentIntentHandler {
    pub fn new(
        anti_forgery: Arc<dyn AntiForgery>,
        gateway: Arc<dyn PaymentGateway>,
        registration: Arc<RegisterMemberHandler>,
    ) -> Self {
        Self {
            anti_forgery,
            gateway,
            registration,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, RegistrationError> {
        // 1. Verify anti-forgery token and payload
        if !self.anti_forgery.verify(&cmd.nonce, NonceScope::Payment) {
            tracing::warn!("Payment intent rejected: anti-forgery check failed");
            return Err(RegistrationError::SecurityCheckFailed);
        }
        let mut request = RegistrationRequest::parse(&cmd.data)?;

        // 2. Reject duplicate email before charging anything
        self.registration
            .ensure_email_available(&request.identity.email)
            .await?;

        // 3. Amount is fixed server-side
        let expected = self.registration.settings().prices.card_intent.clone();
        if cmd.amount != expected.amount_minor() {
            return Err(RegistrationError::AmountMismatch {
                expected: expected.amount_minor(),
                received: cmd.amount,
            });
        }

        // 4. Create the PaymentIntent
        let intent = self
            .gateway
            .create_payment_intent(self.intent_request(&request, &expected))
            .await
            .map_err(|e| {
                tracing::error!(
                    code = %e.code,
                    provider_code = ?e.provider_code,
                    "PaymentIntent creation failed"
                );
                match e.code {
                    PaymentErrorCode::AuthenticationError => {
                        RegistrationError::payment_processor("Card payments are unavailable")
                    }
                    _ => RegistrationError::payment_processor(e.message),
                }
            })?;

        // 5. Register with the intent recorded on the payment row
        if request
            .payment
            .as_ref()
            .map_or(true, |p| p.method != PaymentMethod::Card)
        {
            request.payment = Some(PaymentSelection::from_raw(PaymentMethod::Card.as_str()));
        }
        let registered = self
            .registration
            .register(
                request,
                Some(ProcessorCharge {
                    transaction_id: intent.id.clone(),
                    amount: expected,
                }),
            )
            .await
            .map_err(|e| {
                tracing::warn!(
                    payment_intent = %intent.id,
                    error = %e,
                    "Registration failed after intent creation"
                );
                e
            })?;

        Ok(CreatePaymentIntentResult {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
            account_id: registered.account_id,
            payment_id: registered.payment.map(|p| p.id),
            redirect: registered.redirect,
        })
    }

    fn intent_request(
        &self,
        request: &RegistrationRequest,
        amount: &Money,
    ) -> CreatePaymentIntentRequest {
        let identity = &request.identity;
        let mut metadata = BTreeMap::new();
        metadata.insert("email".to_string(), identity.email.clone());
        metadata.insert("first_name".to_string(), identity.first_name.clone());
        metadata.insert("last_name".to_string(), identity.last_name.clone());
        metadata.insert(
            "payment_method".to_string(),
            PaymentMethod::Card.as_str().to_string(),
        );
        if let Some(company) = request.company.as_ref().filter(|c| c.is_persistable()) {
            metadata.insert("company".to_string(), company.company_name.clone());
        }

        let organisation = &self.registration.settings().organisation;
        let mut intent = CreatePaymentIntentRequest {
            amount: amount.clone(),
            receipt_email: Some(identity.email.clone()),
            description: Some(format!("{} membership", organisation)),
            metadata,
            idempotency_key: None,
        };
        intent.idempotency_key = Some(idempotency_key(&intent));
        intent
    }
}

/// Hashes every parameter sent to the processor. A double submit of the same
/// form reuses the intent; any edit to the form gets a fresh one.
fn idempotency_key(request: &CreatePaymentIntentRequest) -> String {
    let mut hasher = Sha256::new();
    let mut field = |name: &str, value: &str| {
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.len().to_string().as_bytes());
        hasher.update(b":");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    };
    field("amount", &request.amount.amount_minor().to_string());
    field("currency", request.amount.currency());
    field("receipt_email", request.receipt_email.as_deref().unwrap_or(""));
    field("description", request.description.as_deref().unwrap_or(""));
    for (key, value) in &request.metadata {
        field(&format!("metadata[{}]", key), value);
    }
    format!("tocc-register-{}", hex::encode(hasher.finalize()))
}
