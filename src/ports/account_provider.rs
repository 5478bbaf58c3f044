//! AccountProvider port - the platform that owns login accounts.
//!
//! Accounts carry credentials and a profile; everything else the
//! registration flow needs is mirrored into a per-account key-value store
//! for quick reads.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::AccountId;
use crate::domain::registration::Password;

/// Role assigned to a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    /// Lowest-privilege role, assigned to every self-registered member.
    Subscriber,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Subscriber => "subscriber",
        }
    }
}

/// Input for account creation. The email doubles as the login.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub login: String,
    pub email: String,
    pub password: Password,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub role: AccountRole,
}

/// Keys of the per-account metadata store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountMetaKey {
    Title,
    JobTitle,
    Phone,
    /// JSON copy of the member's company details.
    MemberData,
    PaymentMethod,
    PaymentStatus,
    PaymentAmount,
    TransactionId,
}

impl AccountMetaKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountMetaKey::Title => "tocc_title",
            AccountMetaKey::JobTitle => "tocc_job_title",
            AccountMetaKey::Phone => "tocc_phone",
            AccountMetaKey::MemberData => "tocc_member_data",
            AccountMetaKey::PaymentMethod => "tocc_payment_method",
            AccountMetaKey::PaymentStatus => "tocc_payment_status",
            AccountMetaKey::PaymentAmount => "tocc_payment_amount",
            AccountMetaKey::TransactionId => "tocc_transaction_id",
        }
    }
}

impl fmt::Display for AccountMetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the account platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The platform refused the account; the message is shown to the user.
    #[error("{0}")]
    Rejected(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Account storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Case-insensitive lookup.
    async fn email_exists(&self, email: &str) -> Result<bool, AccountError>;

    async fn create_account(&self, account: NewAccount) -> Result<AccountId, AccountError>;

    /// Inserts or replaces one metadata value.
    async fn set_meta(
        &self,
        account_id: &AccountId,
        key: AccountMetaKey,
        value: &str,
    ) -> Result<(), AccountError>;

    async fn get_meta(
        &self,
        account_id: &AccountId,
        key: AccountMetaKey,
    ) -> Result<Option<String>, AccountError>;

    /// Removes the account and its metadata. Used to undo a partial registration.
    async fn delete_account(&self, account_id: &AccountId) -> Result<(), AccountError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_keys_use_stored_names() {
        assert_eq!(AccountMetaKey::Title.as_str(), "tocc_title");
        assert_eq!(AccountMetaKey::MemberData.to_string(), "tocc_member_data");
        assert_eq!(AccountMetaKey::TransactionId.as_str(), "tocc_transaction_id");
    }

    #[test]
    fn rejected_shows_platform_message() {
        let err = AccountError::Rejected("Sorry, that username is not allowed.".to_string());
        assert_eq!(err.to_string(), "Sorry, that username is not allowed.");
    }
}
