//! RegisterMemberHandler - Command handler for membership registration.
//!
//! Writes happen in this order so that the payment insert is the last one:
//! account, profile meta, member row, payment meta mirrors, payment row.
//! Any failure after the account exists removes the member row and the
//! account again before the error is returned.

use std::sync::Arc;

use crate::domain::foundation::{AccountId, Money};
use crate::domain::member::{MemberRecord, UpsertOutcome};
use crate::domain::payment::{pricing_notice, Payment, PriceSchedule, TieredPricing};
use crate::domain::registration::{RegistrationError, RegistrationRequest};
use crate::ports::{
    AccountError, AccountMetaKey, AccountProvider, AccountRole, AntiForgery, MemberRepository,
    NewAccount, NonceScope, Notifier, PaymentRepository, WelcomeMessage,
};

pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful";

/// Command to register a member from the wizard's `data` payload.
#[derive(Debug, Clone)]
pub struct RegisterMemberCommand {
    pub nonce: String,
    pub data: String,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterMemberResult {
    pub message: &'static str,
    pub account_id: AccountId,
    pub redirect: String,
    pub member: Option<UpsertOutcome>,
    pub payment: Option<Payment>,
}

/// A processor charge already created for this registration.
#[derive(Debug, Clone)]
pub struct ProcessorCharge {
    pub transaction_id: String,
    pub amount: Money,
}

/// Site-level settings the registration flow needs.
#[derive(Debug, Clone)]
pub struct RegistrationSettings {
    pub prices: PriceSchedule,
    pub tiers: TieredPricing,
    pub login_url: String,
    pub organisation: String,
}

/// Handler for membership registration.
pub struct RegisterMemberHandler {
    anti_forgery: Arc<dyn AntiForgery>,
    accounts: Arc<dyn AccountProvider>,
    members: Arc<dyn MemberRepository>,
    payments: Arc<dyn PaymentRepository>,
    notifier: Arc<dyn Notifier>,
    settings: RegistrationSettings,
}

impl RegisterMemberHandler {
    pub fn new(
        anti_forgery: Arc<dyn AntiForgery>,
        accounts: Arc<dyn AccountProvider>,
        members: Arc<dyn MemberRepository>,
        payments: Arc<dyn PaymentRepository>,
        notifier: Arc<dyn Notifier>,
        settings: RegistrationSettings,
    ) -> Self {
        Self {
            anti_forgery,
            accounts,
            members,
            payments,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &RegistrationSettings {
        &self.settings
    }

    pub async fn handle(
        &self,
        cmd: RegisterMemberCommand,
    ) -> Result<RegisterMemberResult, RegistrationError> {
        // 1. Verify anti-forgery token
        if !self.anti_forgery.verify(&cmd.nonce, NonceScope::Register) {
            tracing::warn!("Registration rejected: anti-forgery check failed");
            return Err(RegistrationError::SecurityCheckFailed);
        }

        // 2. Parse and validate the payload
        let request = RegistrationRequest::parse(&cmd.data)?;

        self.register(request, None).await
    }

    /// Fails with `EmailAlreadyRegistered` if an account uses `email`.
    pub async fn ensure_email_available(&self, email: &str) -> Result<(), RegistrationError> {
        let exists = self
            .accounts
            .email_exists(email)
            .await
            .map_err(account_error)?;
        if exists {
            return Err(RegistrationError::EmailAlreadyRegistered);
        }
        Ok(())
    }

    /// Registers an already validated request.
    ///
    /// With a `charge`, the payment row records that charge instead of the
    /// flat price for the selected method.
    pub async fn register(
        &self,
        request: RegistrationRequest,
        charge: Option<ProcessorCharge>,
    ) -> Result<RegisterMemberResult, RegistrationError> {
        let identity = &request.identity;

        // 3. Reject duplicate email
        self.ensure_email_available(&identity.email).await?;

        // 4. Create the account
        let account_id = self
            .accounts
            .create_account(NewAccount {
                login: identity.email.clone(),
                email: identity.email.clone(),
                password: identity.password.clone(),
                first_name: identity.first_name.clone(),
                last_name: identity.last_name.clone(),
                display_name: identity.display_name(),
                role: AccountRole::Subscriber,
            })
            .await
            .map_err(|e| match e {
                AccountError::DuplicateEmail => RegistrationError::EmailAlreadyRegistered,
                AccountError::Rejected(message) => RegistrationError::account_creation(message),
                AccountError::Storage(message) => RegistrationError::infrastructure(message),
            })?;
        tracing::info!(account_id = %account_id, "Account created");

        // 5-7. Profile, member and payment writes
        let (member, payment) = match self.persist(&account_id, &request, charge).await {
            Ok(written) => written,
            Err(e) => {
                tracing::error!(
                    account_id = %account_id,
                    error = %e,
                    "Registration writes failed; rolling back"
                );
                self.compensate(&account_id).await;
                return Err(e);
            }
        };

        // 8. Welcome email (best effort)
        let welcome = WelcomeMessage {
            to: identity.email.clone(),
            first_name: identity.first_name.clone(),
            organisation: self.settings.organisation.clone(),
            login_url: self.settings.login_url.clone(),
        };
        if let Err(e) = self.notifier.send_welcome(&welcome).await {
            tracing::warn!(account_id = %account_id, error = %e, "Welcome email not sent");
        }

        Ok(RegisterMemberResult {
            message: REGISTRATION_SUCCESS_MESSAGE,
            account_id,
            redirect: self.settings.login_url.clone(),
            member,
            payment,
        })
    }

    async fn persist(
        &self,
        account_id: &AccountId,
        request: &RegistrationRequest,
        charge: Option<ProcessorCharge>,
    ) -> Result<(Option<UpsertOutcome>, Option<Payment>), RegistrationError> {
        let identity = &request.identity;
        self.set_meta(account_id, AccountMetaKey::Title, &identity.title).await?;
        self.set_meta(account_id, AccountMetaKey::JobTitle, &identity.job_title).await?;
        self.set_meta(account_id, AccountMetaKey::Phone, &identity.phone).await?;

        let member = match request.company.as_ref().filter(|c| c.is_persistable()) {
            Some(details) => {
                let outcome = self
                    .members
                    .upsert(&MemberRecord::new(*account_id, details.clone()))
                    .await?;
                let mirror = serde_json::to_string(details)
                    .map_err(|e| RegistrationError::infrastructure(e.to_string()))?;
                self.set_meta(account_id, AccountMetaKey::MemberData, &mirror).await?;
                Some(outcome)
            }
            None => None,
        };

        let Some(selection) = &request.payment else {
            return Ok((member, None));
        };

        let amount = match &charge {
            Some(charge) => charge.amount.clone(),
            None => self.settings.prices.price_for(selection.method),
        };
        let mut payment = Payment::pending(*account_id, selection.method, amount);
        if !selection.is_recognised() {
            payment.add_note(format!("Unrecognised payment selection: {}", selection.raw));
        }
        if let Some(charge) = charge {
            payment = payment.with_transaction_id(charge.transaction_id);
        }
        if let Some(notice) = self.tier_mismatch(request, &payment.amount) {
            tracing::warn!(
                account_id = %account_id,
                notice = %notice,
                "Charged amount differs from tiered price"
            );
            payment.add_note(notice);
        }

        self.set_meta(account_id, AccountMetaKey::PaymentMethod, selection.method.as_str())
            .await?;
        self.set_meta(account_id, AccountMetaKey::PaymentStatus, payment.status.as_str())
            .await?;
        self.set_meta(
            account_id,
            AccountMetaKey::PaymentAmount,
            &payment.amount.major_units_string(),
        )
        .await?;
        if let Some(txn) = &payment.transaction_id {
            self.set_meta(account_id, AccountMetaKey::TransactionId, txn).await?;
        }

        self.payments.insert(&payment).await?;
        tracing::info!(
            account_id = %account_id,
            payment_id = %payment.id,
            method = payment.method.as_str(),
            amount = payment.amount.amount_minor(),
            "Pending payment recorded"
        );

        Ok((member, Some(payment)))
    }

    fn tier_mismatch(&self, request: &RegistrationRequest, charged: &Money) -> Option<String> {
        let bracket = request.company.as_ref()?.bracket()?;
        let quote = self.settings.tiers.quote(bracket)?;
        pricing_notice(charged, &quote)
    }

    async fn set_meta(
        &self,
        account_id: &AccountId,
        key: AccountMetaKey,
        value: &str,
    ) -> Result<(), RegistrationError> {
        self.accounts
            .set_meta(account_id, key, value)
            .await
            .map_err(account_error)
    }

    async fn compensate(&self, account_id: &AccountId) {
        if let Err(e) = self.members.remove_for_account(account_id).await {
            tracing::error!(account_id = %account_id, error = %e, "Failed to remove member row");
        }
        if let Err(e) = self.accounts.delete_account(account_id).await {
            tracing::error!(account_id = %account_id, error = %e, "Failed to delete account");
        }
    }
}

fn account_error(e: AccountError) -> RegistrationError {
    RegistrationError::infrastructure(e.to_string())
}
