//! WebhookEventRepository port - records Stripe event ids already handled.
//!
//! Stripe delivers at least once, so every event id is written here before
//! the delivery is acknowledged and replays are skipped.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::{DomainError, Timestamp};

/// Outcome stored with a handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookRecordStatus {
    Success,
    Ignored,
    Failed,
}

impl WebhookRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookRecordStatus::Success => "success",
            WebhookRecordStatus::Ignored => "ignored",
            WebhookRecordStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(WebhookRecordStatus::Success),
            "ignored" => Some(WebhookRecordStatus::Ignored),
            "failed" => Some(WebhookRecordStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for WebhookRecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handled webhook delivery.
#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    /// `evt_...`
    pub event_id: String,
    pub event_type: String,
    pub status: WebhookRecordStatus,
    pub detail: Option<String>,
    pub payload: serde_json::Value,
    pub processed_at: Timestamp,
}

impl WebhookEventRecord {
    pub fn new(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        status: WebhookRecordStatus,
        detail: Option<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            status,
            detail,
            payload,
            processed_at: Timestamp::now(),
        }
    }
}

/// Result of attempting to save a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    Inserted,
    /// Another delivery of the same event got there first.
    AlreadyExists,
}

/// What the processor did with a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResult {
    Processed,
    /// Acknowledged without changes.
    Ignored(String),
    /// Event id seen before.
    AlreadyProcessed,
}

/// Storage for handled webhook events.
///
/// `save` must be atomic on `event_id` (primary key or equivalent).
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;

    /// Retention cleanup. Returns the number of rows removed.
    async fn delete_before(&self, cutoff: Timestamp) -> Result<u64, DomainError>;
}
