//! Stripe PaymentIntent client.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(secret_key).with_base_url("http://localhost:12111");
//! let gateway = StripePaymentGateway::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentGateway, PaymentIntent,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_live_... or sk_test_...).
    secret_key: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            secret_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (stripe-mock, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

/// Stripe implementation of `PaymentGateway`.
pub struct StripePaymentGateway {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    client_secret: Option<String>,
    amount: i64,
    status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

/// Form fields for `POST /v1/payment_intents`.
fn intent_form(request: &CreatePaymentIntentRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("amount".to_string(), request.amount.amount_minor().to_string()),
        ("currency".to_string(), request.amount.currency_lowercase()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
    ];

    if let Some(email) = &request.receipt_email {
        params.push(("receipt_email".to_string(), email.clone()));
    }
    if let Some(description) = &request.description {
        params.push(("description".to_string(), description.clone()));
    }
    for (key, value) in &request.metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }

    params
}

/// Maps a non-2xx Stripe response onto `PaymentError`.
fn map_error_response(status: u16, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<StripeErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API error (HTTP {})", status));

    let code = match (status, parsed.as_ref().and_then(|e| e.error.error_type.as_deref())) {
        (401, _) | (_, Some("authentication_error")) => PaymentErrorCode::AuthenticationError,
        (429, _) | (_, Some("rate_limit_error")) => PaymentErrorCode::RateLimitExceeded,
        (_, Some("invalid_request_error")) | (_, Some("card_error")) => {
            PaymentErrorCode::InvalidRequest
        }
        (400..=499, _) => PaymentErrorCode::InvalidRequest,
        (500..=599, _) | (_, Some("api_error")) => PaymentErrorCode::ProviderError,
        _ => PaymentErrorCode::Unknown,
    };

    let error = PaymentError::new(code, message);
    match parsed.and_then(|e| e.error.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let mut builder = self
            .http_client
            .post(&url)
            .basic_auth(self.config.secret_key.expose_secret(), Option::<&str>::None)
            .form(&intent_form(&request));
        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = map_error_response(status.as_u16(), &error_text);
            tracing::error!(
                status = status.as_u16(),
                code = %error.code,
                provider_code = ?error.provider_code,
                "Stripe create_payment_intent failed"
            );
            return Err(error);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| PaymentError::provider("PaymentIntent has no client secret"))?;

        tracing::info!(
            payment_intent = %intent.id,
            amount = intent.amount,
            "PaymentIntent created"
        );

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
            amount: intent.amount,
            status: intent.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;
    use std::collections::BTreeMap;

    fn request() -> CreatePaymentIntentRequest {
        let mut metadata = BTreeMap::new();
        metadata.insert("email".to_string(), "a@b.com".to_string());
        metadata.insert("company".to_string(), "Acme".to_string());
        CreatePaymentIntentRequest {
            amount: Money::gbp(73200),
            receipt_email: Some("a@b.com".to_string()),
            description: Some("LCCI membership".to_string()),
            metadata,
            idempotency_key: Some("reg-1".to_string()),
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    // ══════════════════════════════════════════════════════════════
    // Request encoding
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn form_carries_amount_and_lowercase_currency() {
        let params = intent_form(&request());

        assert_eq!(param(&params, "amount"), Some("73200"));
        assert_eq!(param(&params, "currency"), Some("gbp"));
        assert_eq!(param(&params, "automatic_payment_methods[enabled]"), Some("true"));
        assert_eq!(param(&params, "receipt_email"), Some("a@b.com"));
    }

    #[test]
    fn metadata_is_bracket_encoded() {
        let params = intent_form(&request());

        assert_eq!(param(&params, "metadata[email]"), Some("a@b.com"));
        assert_eq!(param(&params, "metadata[company]"), Some("Acme"));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let mut req = request();
        req.receipt_email = None;
        req.description = None;

        let params = intent_form(&req);

        assert!(param(&params, "receipt_email").is_none());
        assert!(param(&params, "description").is_none());
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = StripeConfig::new(SecretString::new("sk_test_x".to_string()))
            .with_base_url("http://localhost:12111/");
        assert_eq!(config.api_base_url(), "http://localhost:12111");
    }

    // ══════════════════════════════════════════════════════════════
    // Error mapping
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn invalid_request_keeps_stripe_message_and_code() {
        let body = r#"{"error":{"type":"invalid_request_error","code":"amount_too_small","message":"Amount must be at least 30p"}}"#;

        let err = map_error_response(400, body);

        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
        assert_eq!(err.message, "Amount must be at least 30p");
        assert_eq!(err.provider_code.as_deref(), Some("amount_too_small"));
        assert!(!err.retryable);
    }

    #[test]
    fn unauthorized_maps_to_authentication() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"Invalid API Key provided"}}"#;
        assert_eq!(
            map_error_response(401, body).code,
            PaymentErrorCode::AuthenticationError
        );
    }

    #[test]
    fn rate_limit_is_retryable() {
        let err = map_error_response(429, r#"{"error":{"type":"rate_limit_error"}}"#);
        assert_eq!(err.code, PaymentErrorCode::RateLimitExceeded);
        assert!(err.retryable);
    }

    #[test]
    fn unparsable_server_error_is_provider_error() {
        let err = map_error_response(502, "<html>bad gateway</html>");
        assert_eq!(err.code, PaymentErrorCode::ProviderError);
        assert_eq!(err.message, "Stripe API error (HTTP 502)");
    }
}
