//! PostgreSQL implementation of AccountProvider.
//!
//! Accounts live in `accounts`; profile and payment mirrors live in
//! `account_meta`, one row per `(account_id, meta_key)`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::adapters::security::hash_password_blocking;
use crate::domain::foundation::{AccountId, Timestamp};
use crate::ports::{AccountError, AccountMetaKey, AccountProvider, NewAccount};

const EMAIL_UNIQUE_INDEX: &str = "accounts_email_lower_key";
const LOGIN_UNIQUE_INDEX: &str = "accounts_login_lower_key";

pub struct PostgresAccountProvider {
    pool: PgPool,
}

impl PostgresAccountProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(context: &str, e: sqlx::Error) -> AccountError {
    AccountError::Storage(format!("{}: {}", context, e))
}

fn is_unique_violation(e: &sqlx::Error, constraint: &str) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(constraint),
        _ => false,
    }
}

#[async_trait]
impl AccountProvider for PostgresAccountProvider {
    async fn email_exists(&self, email: &str) -> Result<bool, AccountError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to check email", e))
    }

    async fn create_account(&self, account: NewAccount) -> Result<AccountId, AccountError> {
        if account.login.trim().is_empty() {
            return Err(AccountError::Rejected(
                "Cannot create a user with an empty login name.".to_string(),
            ));
        }

        let password_hash = hash_password_blocking(account.password.clone())
            .await
            .map_err(|e| AccountError::Storage(e.to_string()))?;

        let id = AccountId::new();
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, login, email, password_hash, first_name, last_name,
                display_name, role, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&account.login)
        .bind(&account.email)
        .bind(&password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.display_name)
        .bind(account.role.as_str())
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, EMAIL_UNIQUE_INDEX) {
                AccountError::DuplicateEmail
            } else if is_unique_violation(&e, LOGIN_UNIQUE_INDEX) {
                AccountError::Rejected("Sorry, that username already exists!".to_string())
            } else {
                storage_error("Failed to create account", e)
            }
        })?;

        Ok(id)
    }

    async fn set_meta(
        &self,
        account_id: &AccountId,
        key: AccountMetaKey,
        value: &str,
    ) -> Result<(), AccountError> {
        sqlx::query(
            r#"
            INSERT INTO account_meta (account_id, meta_key, meta_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to write account meta", e))?;

        Ok(())
    }

    async fn get_meta(
        &self,
        account_id: &AccountId,
        key: AccountMetaKey,
    ) -> Result<Option<String>, AccountError> {
        sqlx::query_scalar::<_, String>(
            "SELECT meta_value FROM account_meta WHERE account_id = $1 AND meta_key = $2",
        )
        .bind(account_id.as_uuid())
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to read account meta", e))
    }

    async fn delete_account(&self, account_id: &AccountId) -> Result<(), AccountError> {
        // Meta, member and payment rows cascade
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete account", e))?;

        Ok(())
    }
}
