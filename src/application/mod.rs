//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write (registration, webhook settlement); query handlers
//! read (checkout config, quotes, admin listings).

pub mod handlers;

pub use handlers::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, GetCheckoutConfigHandler,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, ListMembersHandler,
    ListPaymentsHandler, QuoteMembershipPriceHandler, RegisterMemberCommand,
    RegisterMemberHandler, RegistrationSettings,
};
