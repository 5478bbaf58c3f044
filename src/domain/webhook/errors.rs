//! Webhook error types.
//!
//! The HTTP status returned to Stripe decides whether it redelivers:
//! 2xx acknowledges, 4xx drops, 5xx retries.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    /// Older than the five minute tolerance.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Further in the future than clock skew allows.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    #[error("Parse error: {0}")]
    ParseError(String),

    /// No payment row matches the intent id or metadata.
    #[error("Payment not found for intent {0}")]
    PaymentNotFound(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Acknowledged without changing anything.
    #[error("Event ignored: {0}")]
    Ignored(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Webhook configuration error: {0}")]
    Configuration(String),
}

impl WebhookError {
    /// True when Stripe should redeliver.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Storage(_) | WebhookError::PaymentNotFound(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange => StatusCode::UNAUTHORIZED,

            WebhookError::InvalidTimestamp | WebhookError::ParseError(_) => {
                StatusCode::BAD_REQUEST
            }

            WebhookError::Ignored(_) => StatusCode::OK,

            WebhookError::PaymentNotFound(_)
            | WebhookError::InvalidTransition(_)
            | WebhookError::Storage(_)
            | WebhookError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => WebhookError::InvalidTransition(err.message),
            _ => WebhookError::Storage(err.to_string()),
        }
    }
}
