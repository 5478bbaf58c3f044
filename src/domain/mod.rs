//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, money, timestamps, errors)
//! - `registration` - Submission parsing, validation and the step wizard
//! - `member` - Company details attached to an account
//! - `payment` - Payment attempts, status lifecycle, pricing, checkout keys
//! - `webhook` - Stripe event verification and idempotent processing

pub mod foundation;
pub mod member;
pub mod payment;
pub mod registration;
pub mod webhook;
