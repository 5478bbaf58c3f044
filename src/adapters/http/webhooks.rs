//! HTTP adapter for Stripe webhooks.
//!
//! The raw body is required for signature verification, so the handler takes
//! `Bytes` rather than a parsed JSON body. Status codes tell Stripe whether to
//! redeliver: 2xx acknowledges, 4xx drops, 5xx retries.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::application::handlers::HandlePaymentWebhookCommand;
use crate::ports::WebhookResult;

use super::app::AppState;

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn outcome_label(result: &WebhookResult) -> String {
    match result {
        WebhookResult::Processed => "processed".to_string(),
        WebhookResult::Ignored(reason) => format!("ignored: {}", reason),
        WebhookResult::AlreadyProcessed => "already_processed".to_string(),
    }
}

/// POST /tocc/v1/webhook and /tocc/v1/stripe-webhook
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.payment_webhook.handle(cmd).await {
        Ok(result) => (
            StatusCode::OK,
            Json(WebhookAck {
                received: true,
                outcome: Some(outcome_label(&result)),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(
                    error = %e,
                    retryable = e.is_retryable(),
                    "Webhook processing failed"
                );
            } else {
                tracing::warn!(error = %e, status = status.as_u16(), "Webhook rejected");
            }
            (
                status,
                Json(WebhookAck {
                    received: status.is_success(),
                    outcome: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// Mounted at `/tocc/v1`. Both paths are accepted for existing Stripe endpoints.
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(handle_stripe_webhook))
        .route("/stripe-webhook", post(handle_stripe_webhook))
}
