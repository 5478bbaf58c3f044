//! PostgreSQL implementation of PaymentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Money, PaymentId, Timestamp};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::ports::PaymentRepository;

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    account_id: Uuid,
    method: String,
    amount_minor: i64,
    currency: String,
    status: String,
    transaction_id: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            method: parse_method(&row.method)?,
            amount: Money::new(row.amount_minor, row.currency),
            status: parse_status(&row.status)?,
            transaction_id: row.transaction_id,
            notes: row.notes,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

pub(super) fn parse_method(s: &str) -> Result<PaymentMethod, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment method value: {}", s),
        )
    })
}

pub(super) fn parse_status(s: &str) -> Result<PaymentStatus, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status value: {}", s),
        )
    })
}

const PAYMENT_COLUMNS: &str = "id, account_id, method, amount_minor, currency, status, \
     transaction_id, notes, created_at, updated_at";

impl PostgresPaymentRepository {
    async fn fetch_one_where(
        &self,
        clause: &str,
        bind: impl ToString,
    ) -> Result<Option<Payment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE {} ORDER BY created_at DESC LIMIT 1",
            PAYMENT_COLUMNS, clause
        );
        let row: Option<PaymentRow> = sqlx::query_as(&sql)
            .bind(bind.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch payment: {}", e)))?;

        row.map(Payment::try_from).transpose()
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, account_id, method, amount_minor, currency, status,
                transaction_id, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.account_id.as_uuid())
        .bind(payment.method.as_str())
        .bind(payment.amount.amount_minor())
        .bind(payment.amount.currency())
        .bind(payment.status.as_str())
        .bind(&payment.transaction_id)
        .bind(&payment.notes)
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert payment: {}", e)))?;

        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = $2,
                transaction_id = $3,
                notes = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.status.as_str())
        .bind(&payment.transaction_id)
        .bind(&payment.notes)
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update payment: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::database(format!(
                "payment {} not found",
                payment.id
            )));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let sql = format!("SELECT {} FROM payments WHERE id = $1", PAYMENT_COLUMNS);
        let row: Option<PaymentRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch payment: {}", e)))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_latest_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Payment>, DomainError> {
        self.fetch_one_where("account_id = $1::uuid", account_id.as_uuid())
            .await
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        self.fetch_one_where("transaction_id = $1", transaction_id)
            .await
    }

    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Payment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE account_id = $1 ORDER BY created_at DESC",
            PAYMENT_COLUMNS
        );
        let rows: Vec<PaymentRow> = sqlx::query_as(&sql)
            .bind(account_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to list payments: {}", e)))?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
