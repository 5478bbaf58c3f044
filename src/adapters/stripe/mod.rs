//! Stripe adapter.
//!
//! Creates PaymentIntents for the card path. Webhook verification lives in
//! the domain (`domain::webhook`) so it can be exercised without HTTP.
//!
//! # Security
//!
//! - The secret key is held as `secrecy::SecretString` and only sent as the
//!   basic-auth user to Stripe
//! - Intent metadata never carries credentials

mod mock_payment_gateway;
mod stripe_gateway;

pub use mock_payment_gateway::{GatewayCall, MockPaymentGateway};
pub use stripe_gateway::{StripeConfig, StripePaymentGateway, DEFAULT_API_BASE_URL};
