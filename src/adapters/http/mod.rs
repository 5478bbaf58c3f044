//! HTTP adapters - REST API over axum.
//!
//! - `registration` - Public registration, card payment and pricing endpoints
//! - `webhooks` - Stripe webhook receiver
//! - `admin` - Bearer-protected member and payment listings

pub mod admin;
mod app;
pub mod extract;
pub mod registration;
pub mod response;
pub mod webhooks;

pub use app::{build_router, routes, AppDependencies, AppSettings, AppState};
pub use response::{ApiError, Envelope, ErrorData};
