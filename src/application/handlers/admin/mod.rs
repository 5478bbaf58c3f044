//! Admin handlers.
//!
//! ## Queries
//! - Paged member listing with latest payment
//! - Paged payment listing, optionally filtered by status

mod list_members;
mod list_payments;

pub use list_members::{ListMembersHandler, ListMembersQuery};
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery};
