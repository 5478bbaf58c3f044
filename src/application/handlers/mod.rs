//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod admin;
pub mod payment;
pub mod registration;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin::{ListMembersHandler, ListMembersQuery, ListPaymentsHandler, ListPaymentsQuery};
pub use payment::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, PaymentIntentDispatcher,
};
pub use registration::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
    GetCheckoutConfigHandler, ProcessorCharge, QuoteMembershipPriceHandler,
    QuoteMembershipPriceQuery, QuoteMembershipPriceResult, RegisterMemberCommand,
    RegisterMemberHandler, RegisterMemberResult, RegistrationSettings,
};
