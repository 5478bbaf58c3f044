//! In-memory implementation of every storage port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::adapters::security::hash_password_blocking;
use crate::domain::foundation::{AccountId, DomainError, PaymentId, Timestamp};
use crate::domain::member::{MemberRecord, UpsertOutcome};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::{
    AccountError, AccountMetaKey, AccountProvider, AccountRole, MemberDirectory, MemberListing,
    MemberRepository, NewAccount, Page, PageRequest, PaymentListing, PaymentRepository,
    SaveResult, WebhookEventRecord, WebhookEventRepository,
};

#[derive(Debug, Clone)]
struct StoredAccount {
    email: String,
    display_name: String,
    password_hash: String,
    role: AccountRole,
}

#[derive(Debug, Default)]
struct StoreState {
    accounts: HashMap<AccountId, StoredAccount>,
    meta: HashMap<(AccountId, AccountMetaKey), String>,
    members: HashMap<AccountId, MemberRecord>,
    payments: Vec<Payment>,
    webhook_events: HashMap<String, WebhookEventRecord>,
}

impl StoreState {
    fn latest_payment(&self, account_id: &AccountId) -> Option<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.account_id == *account_id)
            .max_by_key(|p| p.created_at)
    }
}

/// Shared in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    pub async fn payment_count(&self) -> usize {
        self.state.read().await.payments.len()
    }

    /// Stored password hash for a login, if the account exists.
    pub async fn password_hash_for(&self, email: &str) -> Option<String> {
        let state = self.state.read().await;
        state
            .accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .map(|a| a.password_hash.clone())
    }

    pub async fn role_of(&self, account_id: &AccountId) -> Option<AccountRole> {
        self.state.read().await.accounts.get(account_id).map(|a| a.role)
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = StoreState::default();
    }
}

#[async_trait]
impl AccountProvider for InMemoryStore {
    async fn email_exists(&self, email: &str) -> Result<bool, AccountError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(email)))
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

        let mut state = self.state.write().await;
        if state
            .accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(AccountError::DuplicateEmail);
        }

        let id = AccountId::new();
        state.accounts.insert(
            id,
            StoredAccount {
                email: account.email,
                display_name: account.display_name,
                password_hash,
                role: account.role,
            },
        );
        Ok(id)
    }

    async fn set_meta(
        &self,
        account_id: &AccountId,
        key: AccountMetaKey,
        value: &str,
    ) -> Result<(), AccountError> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(account_id) {
            return Err(AccountError::Storage(format!("unknown account {}", account_id)));
        }
        state.meta.insert((*account_id, key), value.to_string());
        Ok(())
    }

    async fn get_meta(
        &self,
        account_id: &AccountId,
        key: AccountMetaKey,
    ) -> Result<Option<String>, AccountError> {
        let state = self.state.read().await;
        Ok(state.meta.get(&(*account_id, key)).cloned())
    }

    async fn delete_account(&self, account_id: &AccountId) -> Result<(), AccountError> {
        let mut state = self.state.write().await;
        state.accounts.remove(account_id);
        state.meta.retain(|(id, _), _| id != account_id);
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn upsert(&self, record: &MemberRecord) -> Result<UpsertOutcome, DomainError> {
        let mut state = self.state.write().await;
        let (stored, outcome) = record
            .clone()
            .upsert_onto(state.members.get(&record.account_id));
        state.members.insert(stored.account_id, stored);
        Ok(outcome)
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<MemberRecord>, DomainError> {
        Ok(self.state.read().await.members.get(account_id).cloned())
    }

    async fn remove_for_account(&self, account_id: &AccountId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.members.remove(account_id).is_some())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.members.len() as u64)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.payments.iter().any(|p| p.id == payment.id) {
            return Err(DomainError::database(format!(
                "payment {} already exists",
                payment.id
            )));
        }
        state.payments.push(payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => {
                *existing = payment.clone();
                Ok(())
            }
            None => Err(DomainError::database(format!(
                "payment {} not found",
                payment.id
            ))),
        }
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let state = self.state.read().await;
        Ok(state.payments.iter().find(|p| p.id == *id).cloned())
    }

    async fn find_latest_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(self.state.read().await.latest_payment(account_id).cloned())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .iter()
            .filter(|p| p.transaction_id.as_deref() == Some(transaction_id))
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Payment>, DomainError> {
        let state = self.state.read().await;
        let mut payments: Vec<Payment> = state
            .payments
            .iter()
            .filter(|p| p.account_id == *account_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }
}

fn page_slice<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let items = items.into_iter().skip(offset).take(limit).collect();
    Page::new(items, total, request)
}

#[async_trait]
impl MemberDirectory for InMemoryStore {
    async fn list_members(&self, page: PageRequest) -> Result<Page<MemberListing>, DomainError> {
        let state = self.state.read().await;
        let mut listings: Vec<MemberListing> = state
            .members
            .values()
            .map(|member| {
                let account = state.accounts.get(&member.account_id);
                let payment = state.latest_payment(&member.account_id);
                MemberListing {
                    account_id: member.account_id,
                    email: account.map(|a| a.email.clone()),
                    display_name: account.map(|a| a.display_name.clone()),
                    details: member.details.clone(),
                    payment_status: payment.map(|p| p.status),
                    payment_method: payment.map(|p| p.method),
                    payment_amount: payment.map(|p| p.amount.clone()),
                    created_at: member.created_at,
                }
            })
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_slice(listings, page))
    }

    async fn list_payments(
        &self,
        status: Option<PaymentStatus>,
        page: PageRequest,
    ) -> Result<Page<PaymentListing>, DomainError> {
        let state = self.state.read().await;
        let mut listings: Vec<PaymentListing> = state
            .payments
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .map(|payment| {
                let account = state.accounts.get(&payment.account_id);
                PaymentListing {
                    payment_id: payment.id,
                    account_id: payment.account_id,
                    email: account.map(|a| a.email.clone()),
                    display_name: account.map(|a| a.display_name.clone()),
                    company_name: state
                        .members
                        .get(&payment.account_id)
                        .map(|m| m.details.company_name.clone()),
                    method: payment.method,
                    amount: payment.amount.clone(),
                    status: payment.status,
                    transaction_id: payment.transaction_id.clone(),
                    created_at: payment.created_at,
                }
            })
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_slice(listings, page))
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryStore {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        Ok(self.state.read().await.webhook_events.get(event_id).cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        let mut state = self.state.write().await;
        if state.webhook_events.contains_key(&record.event_id) {
            return Ok(SaveResult::AlreadyExists);
        }
        state.webhook_events.insert(record.event_id.clone(), record);
        Ok(SaveResult::Inserted)
    }

    async fn delete_before(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let before = state.webhook_events.len();
        state
            .webhook_events
            .retain(|_, record| !cutoff.is_after(&record.processed_at));
        Ok((before - state.webhook_events.len()) as u64)
    }
}
