//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `AccountProvider` - Login accounts and their key-value metadata
//! - `MemberRepository` - Company details, one row per account
//! - `PaymentRepository` - Payment attempts
//! - `MemberDirectory` - Paged admin listings (read side)
//! - `WebhookEventRepository` - Stripe webhook idempotency tracking
//!
//! ## Service Ports
//!
//! - `PaymentGateway` - Card payment processor
//! - `Notifier` - Outbound email
//! - `AntiForgery` - Form tokens

mod account_provider;
mod anti_forgery;
mod member_directory;
mod member_repository;
mod notifier;
mod payment_gateway;
mod payment_repository;
mod webhook_event_repository;

pub use account_provider::{AccountError, AccountMetaKey, AccountProvider, AccountRole, NewAccount};
pub use anti_forgery::{AntiForgery, NonceScope};
pub use member_directory::{
    MemberDirectory, MemberListing, Page, PageRequest, PaymentListing, MEMBERS_PER_PAGE,
    PAYMENTS_PER_PAGE,
};
pub use member_repository::MemberRepository;
pub use notifier::{NotificationError, Notifier, WelcomeMessage};
pub use payment_gateway::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentGateway, PaymentIntent,
};
pub use payment_repository::PaymentRepository;
pub use webhook_event_repository::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookRecordStatus, WebhookResult,
};
