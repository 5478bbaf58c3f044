//! Stripe webhook payloads for PaymentIntent events.
//!
//! Only the fields used to reconcile a payment row are captured.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Event id (`evt_...`), used for de-duplication.
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp.
    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    #[serde(default)]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from(self.event_type.as_str())
    }

    /// Deserializes `data.object` into a concrete type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Reads `data.object` as a PaymentIntent.
    pub fn payment_intent(&self) -> Result<PaymentIntentObject, serde_json::Error> {
        self.deserialize_object()
    }
}

/// PaymentIntent events that move a payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripeEventType {
    PaymentIntentSucceeded,
    PaymentIntentPaymentFailed,
    PaymentIntentCanceled,
    Unknown,
}

impl StripeEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
            Self::PaymentIntentCanceled => "payment_intent.canceled",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for StripeEventType {
    fn from(s: &str) -> Self {
        match s {
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentPaymentFailed,
            "payment_intent.canceled" => Self::PaymentIntentCanceled,
            _ => Self::Unknown,
        }
    }
}

/// The PaymentIntent carried in `data.object`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntentObject {
    /// `pi_...`; stored as the payment's transaction id.
    pub id: String,

    #[serde(default)]
    pub amount: i64,

    #[serde(default)]
    pub currency: String,

    #[serde(default)]
    pub status: String,

    /// Metadata set when the intent was created.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    #[serde(default)]
    pub last_payment_error: Option<LastPaymentError>,

    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl PaymentIntentObject {
    /// Human-readable reason for a failed attempt.
    pub fn failure_reason(&self) -> String {
        self.last_payment_error
            .as_ref()
            .and_then(|e| e.message.clone().or_else(|| e.code.clone()))
            .unwrap_or_else(|| "payment failed".to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LastPaymentError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Builds events for tests.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({"id": "pi_test_123", "metadata": {}}),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: StripeEventType) -> Self {
        self.event_type = event_type.as_str().to_string();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: false,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}
