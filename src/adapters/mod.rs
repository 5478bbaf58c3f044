//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - PostgreSQL storage
//! - `memory` - In-memory storage for tests and single-process runs
//! - `stripe` - PaymentIntent creation
//! - `email` - Welcome email delivery
//! - `security` - Form tokens and password hashing
//! - `http` - REST API

pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod security;
pub mod stripe;

pub use memory::InMemoryStore;
