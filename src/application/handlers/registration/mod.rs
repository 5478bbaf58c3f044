//! Registration handlers.
//!
//! ## Commands
//! - Registering a member (direct debit and other non-card selections)
//! - Creating a card PaymentIntent and registering against it
//!
//! ## Queries
//! - Browser checkout configuration
//! - Tiered price quotes

mod create_payment_intent;
mod get_checkout_config;
mod quote_membership_price;
mod register_member;

// Commands
pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
};
pub use register_member::{
    ProcessorCharge, RegisterMemberCommand, RegisterMemberHandler, RegisterMemberResult,
    RegistrationSettings, REGISTRATION_SUCCESS_MESSAGE,
};

// Queries
pub use get_checkout_config::GetCheckoutConfigHandler;
pub use quote_membership_price::{
    QuoteMembershipPriceHandler, QuoteMembershipPriceQuery, QuoteMembershipPriceResult,
};
