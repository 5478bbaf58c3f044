//! Axum routes for registration and pricing.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::app::AppState;
use super::handlers::{checkout_config, create_payment_intent, issue_nonces, quote_price, register};

/// Mounted at `/api/registration`.
///
/// - `GET /nonces` - Form tokens
/// - `GET /checkout` - Card checkout configuration
/// - `POST /register` - Direct registration
/// - `POST /payment-intent` - Card registration
pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/nonces", get(issue_nonces))
        .route("/checkout", get(checkout_config))
        .route("/register", post(register))
        .route("/payment-intent", post(create_payment_intent))
}

/// Mounted at `/api/pricing`.
pub fn pricing_routes() -> Router<AppState> {
    Router::new().route("/quote", get(quote_price))
}
