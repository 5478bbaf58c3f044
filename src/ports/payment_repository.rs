//! PaymentRepository port (write side).
//!
//! Payment rows are append-only per account: each attempt is a new row and
//! readers take the most recent one.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError, PaymentId};
use crate::domain::payment::Payment;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Persists status, transaction id, notes and `updated_at`.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the row does not exist
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Most recent row by `created_at`.
    async fn find_latest_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Payment>, DomainError>;

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError>;

    /// Newest first.
    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Payment>, DomainError>;
}
