//! MemberRepository port - one member row per account.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::member::{MemberRecord, UpsertOutcome};

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Inserts the record, or replaces the details of the account's existing row.
    ///
    /// An existing row keeps its id and `created_at`.
    async fn upsert(&self, record: &MemberRecord) -> Result<UpsertOutcome, DomainError>;

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<MemberRecord>, DomainError>;

    /// Only used to undo a partial registration.
    async fn remove_for_account(&self, account_id: &AccountId) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
