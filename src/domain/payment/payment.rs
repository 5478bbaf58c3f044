//! Payment aggregate - one row per payment attempt.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, Money, PaymentId, StateMachine, Timestamp,
};

use super::{PaymentMethod, PaymentStatus};

/// Result of applying a processor outcome to a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Status moved to a new value.
    Changed { from: PaymentStatus, to: PaymentStatus },
    /// Payment was already in the requested status.
    Unchanged,
}

impl TransitionOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, TransitionOutcome::Changed { .. })
    }
}

/// A payment attempt recorded for an account.
///
/// Rows are never deleted; repeated attempts for one account produce
/// several rows and readers pick the most recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub account_id: AccountId,
    pub method: PaymentMethod,
    pub amount: Money,
    pub status: PaymentStatus,
    /// Processor reference (PaymentIntent id for card payments).
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    /// Records a new pending payment.
    pub fn pending(account_id: AccountId, method: PaymentMethod, amount: Money) -> Self {
        let now = Timestamp::now();
        Self {
            id: PaymentId::new(),
            account_id,
            method,
            amount,
            status: PaymentStatus::Pending,
            transaction_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the processor reference.
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    /// Appends a line to the free-text notes.
    pub fn add_note(&mut self, note: impl AsRef<str>) {
        let note = note.as_ref();
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, note),
            _ => note.to_string(),
        });
    }

    /// Marks the payment as completed.
    ///
    /// Safe to call repeatedly: a payment that is already completed reports
    /// `Unchanged`.
    ///
    /// # Errors
    ///
    /// Returns error if the current status does not allow completion.
    pub fn complete(
        &mut self,
        transaction_id: Option<String>,
    ) -> Result<TransitionOutcome, DomainError> {
        let outcome = self.apply(PaymentStatus::Completed)?;
        if let Some(txn) = transaction_id {
            self.transaction_id = Some(txn);
        }
        Ok(outcome)
    }

    /// Marks the payment as failed, recording the processor's reason.
    ///
    /// # Errors
    ///
    /// Returns error if the payment already completed.
    pub fn fail(&mut self, reason: impl AsRef<str>) -> Result<TransitionOutcome, DomainError> {
        let outcome = self.apply(PaymentStatus::Failed)?;
        if outcome.is_changed() {
            self.add_note(format!("Payment failed: {}", reason.as_ref()));
        }
        Ok(outcome)
    }

    fn apply(&mut self, target: PaymentStatus) -> Result<TransitionOutcome, DomainError> {
        if self.status == target {
            return Ok(TransitionOutcome::Unchanged);
        }
        let from = self.status;
        self.status = from.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("payment_id", self.id.to_string())
        })?;
        self.updated_at = Timestamp::now();
        Ok(TransitionOutcome::Changed { from, to: target })
    }
}
