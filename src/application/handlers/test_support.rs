//! Shared fixtures for handler tests.

use async_trait::async_trait;
use serde_json::json;

use crate::adapters::memory::InMemoryStore;
use crate::application::handlers::registration::RegistrationSettings;
use crate::domain::foundation::{AccountId, DomainError, PaymentId};
use crate::domain::payment::{Payment, PriceSchedule, TieredPricing};
use crate::ports::{AntiForgery, NonceScope, PaymentRepository};

/// Accepts or rejects every token.
pub struct StaticAntiForgery {
    accept: bool,
}

impl StaticAntiForgery {
    pub fn accepting() -> Self {
        Self { accept: true }
    }

    pub fn rejecting() -> Self {
        Self { accept: false }
    }
}

impl AntiForgery for StaticAntiForgery {
    fn issue(&self, scope: NonceScope) -> String {
        format!("static-{}", scope)
    }

    fn verify(&self, _token: &str, _scope: NonceScope) -> bool {
        self.accept
    }
}

pub fn registration_settings() -> RegistrationSettings {
    RegistrationSettings {
        prices: PriceSchedule::default(),
        tiers: TieredPricing::default(),
        login_url: "https://example.com/login".to_string(),
        organisation: "LCCI".to_string(),
    }
}

pub fn valid_payload() -> serde_json::Value {
    json!({
        "step1": {
            "title": "Mr",
            "first_name": "Ann",
            "last_name": "Bee",
            "job_title": "Director",
            "phone": "020 7946 0000",
            "email": "a@b.com",
            "password": "Abcdef1!",
            "confirm_password": "Abcdef1!"
        },
        "step2": {
            "company_name": "Acme",
            "company_website": "https://acme.example",
            "employee_count": "1-2",
            "company_description": "Widgets",
            "sector": "Manufacturing",
            "reason_for_joining": "Networking",
            "address_1": "1 High Street",
            "city": "London",
            "postcode": "EC1A 1AA",
            "country": "United Kingdom",
            "terms": "on"
        },
        "step3": { "payment_method": "direct_debit" }
    })
}

/// Payment repository whose inserts always fail.
pub struct FailingPaymentRepository {
    inner: InMemoryStore,
}

impl FailingPaymentRepository {
    pub fn new(inner: InMemoryStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PaymentRepository for FailingPaymentRepository {
    async fn insert(&self, _payment: &Payment) -> Result<(), DomainError> {
        Err(DomainError::database("Simulated insert failure"))
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        self.inner.update(payment).await
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_latest_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Payment>, DomainError> {
        self.inner.find_latest_for_account(account_id).await
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        self.inner.find_by_transaction_id(transaction_id).await
    }

    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Payment>, DomainError> {
        self.inner.list_for_account(account_id).await
    }
}
