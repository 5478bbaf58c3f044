//! Request and response bodies for the registration endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{CreatePaymentIntentResult, RegisterMemberResult};
use crate::domain::foundation::{AccountId, Money, PaymentId};
use crate::domain::payment::{CardCheckout, PaymentStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Form body of `POST /api/registration/register`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub nonce: String,
    /// JSON document with `step1`, `step2` and `step3`.
    #[serde(default)]
    pub data: String,
}

/// Form body of `POST /api/registration/payment-intent`.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentIntentForm {
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub data: String,
    /// Minor units, as sent by the browser.
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteParams {
    #[serde(default)]
    pub employee_count: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize, Deserialize)]
pub struct NoncesResponse {
    pub register_nonce: String,
    pub payment_nonce: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub publishable_key: String,
    pub amount: i64,
    pub currency: String,
}

impl From<CardCheckout> for CheckoutResponse {
    fn from(checkout: CardCheckout) -> Self {
        Self {
            publishable_key: checkout.publishable_key.as_str().to_string(),
            amount: checkout.amount.amount_minor(),
            currency: checkout.amount.currency_lowercase(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: AccountId,
    pub redirect: String,
    pub payment_id: Option<PaymentId>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_amount: Option<Money>,
}

impl From<RegisterMemberResult> for RegisterResponse {
    fn from(result: RegisterMemberResult) -> Self {
        Self {
            message: result.message.to_string(),
            user_id: result.account_id,
            redirect: result.redirect,
            payment_id: result.payment.as_ref().map(|p| p.id),
            payment_status: result.payment.as_ref().map(|p| p.status),
            payment_amount: result.payment.map(|p| p.amount),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
    pub user_id: AccountId,
    pub payment_id: Option<PaymentId>,
    pub redirect: String,
}

impl From<CreatePaymentIntentResult> for PaymentIntentResponse {
    fn from(result: CreatePaymentIntentResult) -> Self {
        Self {
            client_secret: result.client_secret,
            payment_intent_id: result.payment_intent_id,
            user_id: result.account_id,
            payment_id: result.payment_id,
            redirect: result.redirect,
        }
    }
}
