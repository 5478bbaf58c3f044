//! TOCC Membership - registration and payment service for the chamber of commerce.
//!
//! Prospective members submit a three-step form; the service creates their
//! login account, stores company details, records a pending payment and, for
//! card payments, settles it from Stripe webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod startup;
