//! Member record - the company profile attached to an account.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, MemberId, Timestamp};

use super::EmployeeBracket;

/// Company details captured by the second registration step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub company_name: String,
    pub company_website: String,
    pub company_description: String,
    pub sector: String,
    /// Raw bracket value as submitted; see [`CompanyDetails::bracket`].
    pub employee_count: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub reason_for_joining: String,
}

impl CompanyDetails {
    /// Parsed employee bracket, if the submitted value is a known option.
    pub fn bracket(&self) -> Option<EmployeeBracket> {
        self.employee_count.parse().ok()
    }

    /// Member details are only stored when a company name was given.
    pub fn is_persistable(&self) -> bool {
        !self.company_name.trim().is_empty()
    }
}

/// Whether an upsert created a new row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// One member row per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    pub account_id: AccountId,
    pub details: CompanyDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MemberRecord {
    /// Creates a fresh record for an account.
    pub fn new(account_id: AccountId, details: CompanyDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id: MemberId::new(),
            account_id,
            details,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies upsert semantics against the row currently stored for the account.
    ///
    /// An existing row keeps its id and `created_at`; only the details and
    /// `updated_at` change.
    pub fn upsert_onto(self, existing: Option<&MemberRecord>) -> (MemberRecord, UpsertOutcome) {
        match existing {
            Some(current) => (
                MemberRecord {
                    id: current.id,
                    account_id: current.account_id,
                    details: self.details,
                    created_at: current.created_at,
                    updated_at: Timestamp::now(),
                },
                UpsertOutcome::Updated,
            ),
            None => (self, UpsertOutcome::Inserted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str) -> CompanyDetails {
        CompanyDetails {
            company_name: name.to_string(),
            employee_count: "3-12".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn bracket_parses_known_value() {
        assert_eq!(details("Acme").bracket(), Some(EmployeeBracket::ThreeToTwelve));
    }

    #[test]
    fn bracket_is_none_for_unknown_value() {
        let d = CompanyDetails {
            employee_count: "lots".to_string(),
            ..Default::default()
        };
        assert_eq!(d.bracket(), None);
    }

    #[test]
    fn blank_company_name_is_not_persistable() {
        assert!(!details("  ").is_persistable());
        assert!(details("Acme").is_persistable());
    }

    #[test]
    fn upsert_without_existing_row_inserts() {
        let account_id = AccountId::new();
        let record = MemberRecord::new(account_id, details("Acme"));
        let id = record.id;

        let (stored, outcome) = record.upsert_onto(None);

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(stored.id, id);
    }

    #[test]
    fn upsert_onto_existing_row_keeps_identity() {
        let account_id = AccountId::new();
        let original = MemberRecord::new(account_id, details("Acme"));

        let replacement = MemberRecord::new(account_id, details("Acme Holdings"));
        let (stored, outcome) = replacement.upsert_onto(Some(&original));

        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.details.company_name, "Acme Holdings");
    }
}
