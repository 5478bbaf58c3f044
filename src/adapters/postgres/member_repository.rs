//! PostgreSQL implementation of MemberRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{AccountId, DomainError, MemberId, Timestamp};
use crate::domain::member::{CompanyDetails, MemberRecord, UpsertOutcome};
use crate::ports::MemberRepository;

pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a member.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct MemberRow {
    pub id: Uuid,
    pub account_id: Uuid,
    #[sqlx(flatten)]
    pub details: CompanyColumns,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The company detail columns, shared with the directory queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct CompanyColumns {
    pub company_name: String,
    pub company_website: String,
    pub company_description: String,
    pub sector: String,
    pub employee_count: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub reason_for_joining: String,
}

impl From<CompanyColumns> for CompanyDetails {
    fn from(c: CompanyColumns) -> Self {
        CompanyDetails {
            company_name: c.company_name,
            company_website: c.company_website,
            company_description: c.company_description,
            sector: c.sector,
            employee_count: c.employee_count,
            address_1: c.address_1,
            address_2: c.address_2,
            city: c.city,
            postcode: c.postcode,
            country: c.country,
            reason_for_joining: c.reason_for_joining,
        }
    }
}

impl From<MemberRow> for MemberRecord {
    fn from(row: MemberRow) -> Self {
        MemberRecord {
            id: MemberId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            details: row.details.into(),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

pub(super) const COMPANY_COLUMNS: &str = "company_name, company_website, company_description, \
     sector, employee_count, address_1, address_2, city, postcode, country, reason_for_joining";

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn upsert(&self, record: &MemberRecord) -> Result<UpsertOutcome, DomainError> {
        let d = &record.details;

        // xmax is zero only for a freshly inserted tuple
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO members (
                id, account_id, company_name, company_website, company_description,
                sector, employee_count, address_1, address_2, city, postcode, country,
                reason_for_joining, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (account_id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                company_website = EXCLUDED.company_website,
                company_description = EXCLUDED.company_description,
                sector = EXCLUDED.sector,
                employee_count = EXCLUDED.employee_count,
                address_1 = EXCLUDED.address_1,
                address_2 = EXCLUDED.address_2,
                city = EXCLUDED.city,
                postcode = EXCLUDED.postcode,
                country = EXCLUDED.country,
                reason_for_joining = EXCLUDED.reason_for_joining,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.account_id.as_uuid())
        .bind(&d.company_name)
        .bind(&d.company_website)
        .bind(&d.company_description)
        .bind(&d.sector)
        .bind(&d.employee_count)
        .bind(&d.address_1)
        .bind(&d.address_2)
        .bind(&d.city)
        .bind(&d.postcode)
        .bind(&d.country)
        .bind(&d.reason_for_joining)
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert member: {}", e)))?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<MemberRecord>, DomainError> {
        let sql = format!(
            "SELECT id, account_id, {}, created_at, updated_at FROM members WHERE account_id = $1",
            COMPANY_COLUMNS
        );
        let row: Option<MemberRow> = sqlx::query_as(&sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch member: {}", e)))?;

        Ok(row.map(MemberRecord::from))
    }

    async fn remove_for_account(&self, account_id: &AccountId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM members WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to remove member: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count members: {}", e)))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
