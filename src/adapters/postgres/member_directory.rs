//! PostgreSQL implementation of MemberDirectory.
//!
//! Read-only joins across members, accounts and payments for the admin
//! listings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{AccountId, DomainError, Money, PaymentId, Timestamp};
use crate::domain::payment::PaymentStatus;
use crate::ports::{MemberDirectory, MemberListing, Page, PageRequest, PaymentListing};

use super::member_repository::{CompanyColumns, COMPANY_COLUMNS};
use super::payment_repository::{parse_method, parse_status};

pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberListingRow {
    account_id: Uuid,
    email: Option<String>,
    display_name: Option<String>,
    #[sqlx(flatten)]
    details: CompanyColumns,
    payment_status: Option<String>,
    payment_method: Option<String>,
    payment_amount_minor: Option<i64>,
    payment_currency: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MemberListingRow> for MemberListing {
    type Error = DomainError;

    fn try_from(row: MemberListingRow) -> Result<Self, Self::Error> {
        let payment_amount = match (row.payment_amount_minor, row.payment_currency) {
            (Some(minor), Some(currency)) => Some(Money::new(minor, currency)),
            _ => None,
        };
        Ok(MemberListing {
            account_id: AccountId::from_uuid(row.account_id),
            email: row.email,
            display_name: row.display_name,
            details: row.details.into(),
            payment_status: row.payment_status.as_deref().map(parse_status).transpose()?,
            payment_method: row.payment_method.as_deref().map(parse_method).transpose()?,
            payment_amount,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentListingRow {
    id: Uuid,
    account_id: Uuid,
    email: Option<String>,
    display_name: Option<String>,
    company_name: Option<String>,
    method: String,
    amount_minor: i64,
    currency: String,
    status: String,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentListingRow> for PaymentListing {
    type Error = DomainError;

    fn try_from(row: PaymentListingRow) -> Result<Self, Self::Error> {
        Ok(PaymentListing {
            payment_id: PaymentId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            email: row.email,
            display_name: row.display_name,
            company_name: row.company_name,
            method: parse_method(&row.method)?,
            amount: Money::new(row.amount_minor, row.currency),
            status: parse_status(&row.status)?,
            transaction_id: row.transaction_id,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn list_members(&self, page: PageRequest) -> Result<Page<MemberListing>, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count members: {}", e)))?;

        let sql = format!(
            r#"
            SELECT
                m.account_id, a.email, a.display_name, {columns},
                p.status AS payment_status,
                p.method AS payment_method,
                p.amount_minor AS payment_amount_minor,
                p.currency AS payment_currency,
                m.created_at
            FROM members m
            LEFT JOIN accounts a ON a.id = m.account_id
            LEFT JOIN LATERAL (
                SELECT status, method, amount_minor, currency
                FROM payments
                WHERE payments.account_id = m.account_id
                ORDER BY created_at DESC
                LIMIT 1
            ) p ON TRUE
            ORDER BY m.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
            columns = prefixed_company_columns("m")
        );
        let rows: Vec<MemberListingRow> = sqlx::query_as(&sql)
            .bind(to_i64(page.limit()))
            .bind(to_i64(page.offset()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to list members: {}", e)))?;

        let items = rows
            .into_iter()
            .map(MemberListing::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), page))
    }

    async fn list_payments(
        &self,
        status: Option<PaymentStatus>,
        page: PageRequest,
    ) -> Result<Page<PaymentListing>, DomainError> {
        let status = status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to count payments: {}", e)))?;

        let rows: Vec<PaymentListingRow> = sqlx::query_as(
            r#"
            SELECT
                p.id, p.account_id, a.email, a.display_name, m.company_name,
                p.method, p.amount_minor, p.currency, p.status, p.transaction_id,
                p.created_at
            FROM payments p
            LEFT JOIN accounts a ON a.id = p.account_id
            LEFT JOIN members m ON m.account_id = p.account_id
            WHERE ($1::text IS NULL OR p.status = $1)
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(to_i64(page.limit()))
        .bind(to_i64(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list payments: {}", e)))?;

        let items = rows
            .into_iter()
            .map(PaymentListing::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), page))
    }
}

fn prefixed_company_columns(alias: &str) -> String {
    COMPANY_COLUMNS
        .split(',')
        .map(|column| format!("{}.{}", alias, column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
