//! HTTP handlers for registration, card payment and pricing endpoints.

use axum::extract::State;
use axum::Json;

use crate::application::handlers::{
    CreatePaymentIntentCommand, QuoteMembershipPriceQuery, QuoteMembershipPriceResult,
    RegisterMemberCommand,
};
use crate::domain::registration::RegistrationError;
use crate::ports::NonceScope;

use super::super::app::AppState;
use super::super::extract::{ApiForm, ApiQuery};
use super::super::response::{ApiError, Envelope};
use super::dto::{
    CheckoutResponse, NoncesResponse, PaymentIntentForm, PaymentIntentResponse, QuoteParams,
    RegisterForm, RegisterResponse,
};

/// GET /api/registration/nonces - Fresh form tokens for both submit paths
pub async fn issue_nonces(State(state): State<AppState>) -> Json<Envelope<NoncesResponse>> {
    Envelope::ok(NoncesResponse {
        register_nonce: state.anti_forgery.issue(NonceScope::Register),
        payment_nonce: state.anti_forgery.issue(NonceScope::Payment),
    })
}

/// GET /api/registration/checkout - Publishable key and card amount
pub async fn checkout_config(
    State(state): State<AppState>,
) -> Result<Json<Envelope<CheckoutResponse>>, ApiError> {
    let checkout = state.checkout_config.handle().map_err(|e| {
        tracing::error!(code = e.code(), "Card checkout unavailable");
        e
    })?;
    Ok(Envelope::ok(CheckoutResponse::from(checkout)))
}

/// POST /api/registration/register - Direct registration
pub async fn register(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<RegisterForm>,
) -> Result<Json<Envelope<RegisterResponse>>, ApiError> {
    let cmd = RegisterMemberCommand {
        nonce: form.nonce,
        data: form.data,
    };
    let result = state.register_member.handle(cmd).await?;
    Ok(Envelope::ok(RegisterResponse::from(result)))
}

/// POST /api/registration/payment-intent - Card path: intent, then registration
pub async fn create_payment_intent(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<PaymentIntentForm>,
) -> Result<Json<Envelope<PaymentIntentResponse>>, ApiError> {
    let amount = form
        .amount
        .trim()
        .parse::<i64>()
        .map_err(|_| RegistrationError::invalid_field("amount", "Invalid payment amount"))?;

    let cmd = CreatePaymentIntentCommand {
        nonce: form.nonce,
        data: form.data,
        amount,
    };
    let result = state.create_payment_intent.handle(cmd).await?;
    Ok(Envelope::ok(PaymentIntentResponse::from(result)))
}

/// GET /api/pricing/quote?employee_count= - Tiered price for a company size
pub async fn quote_price(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<QuoteParams>,
) -> Result<Json<Envelope<QuoteMembershipPriceResult>>, ApiError> {
    let result = state.quote_price.handle(QuoteMembershipPriceQuery {
        employee_count: params.employee_count,
    })?;
    Ok(Envelope::ok(result))
}
