//! HTTP adapter for the public registration flow.
//!
//! - `GET /api/registration/nonces`
//! - `GET /api/registration/checkout`
//! - `POST /api/registration/register`
//! - `POST /api/registration/payment-intent`
//! - `GET /api/pricing/quote`

pub mod dto;
mod handlers;
mod routes;

pub use routes::{pricing_routes, registration_routes};
