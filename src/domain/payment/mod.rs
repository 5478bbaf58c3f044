//! Payment module - payment attempts, their status lifecycle and pricing.

mod checkout;
mod method;
mod payment;
mod pricing;
mod status;

pub use checkout::{CardCheckout, CheckoutKeyError, PublishableKey};
pub use method::PaymentMethod;
pub use payment::{Payment, TransitionOutcome};
pub use pricing::{pricing_notice, PriceQuote, PriceSchedule, Tier, TieredPricing};
pub use status::PaymentStatus;
