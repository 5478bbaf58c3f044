//! Shared harness for the HTTP integration tests.
//!
//! Builds the full router over in-memory storage, the mock gateway and a
//! recording notifier, and drives it with `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use tocc_membership::adapters::email::RecordingNotifier;
use tocc_membership::adapters::http::{
    build_router, routes, AppDependencies, AppSettings, AppState,
};
use tocc_membership::adapters::memory::InMemoryStore;
use tocc_membership::adapters::security::HmacAntiForgery;
use tocc_membership::adapters::stripe::MockPaymentGateway;
use tocc_membership::application::RegistrationSettings;
use tocc_membership::config::ServerConfig;
use tocc_membership::domain::foundation::Timestamp;
use tocc_membership::domain::payment::{PriceSchedule, TieredPricing};
use tocc_membership::domain::webhook::StripeWebhookVerifier;
use tocc_membership::startup::Storage;

pub const ADMIN_TOKEN: &str = "admin-token-0123456789";
pub const PUBLISHABLE_KEY: &str = "pk_test_integration";
pub const LOGIN_URL: &str = "https://tocc.example/login";
const NONCE_SECRET: &str = "integration-nonce-secret-0123456789abcdef";
const WEBHOOK_SECRET: &str = "whsec_integration";

pub struct TestApp {
    router: Router,
    pub store: InMemoryStore,
    pub gateway: MockPaymentGateway,
    pub notifier: RecordingNotifier,
    verifier: Arc<StripeWebhookVerifier>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_publishable_key(PUBLISHABLE_KEY)
    }

    pub fn with_publishable_key(publishable_key: &str) -> Self {
        Self::build(publishable_key, None)
    }

    /// Full middleware stack from `build_router` instead of bare routes.
    pub fn with_server_config(server: ServerConfig) -> Self {
        Self::build(PUBLISHABLE_KEY, Some(server))
    }

    fn build(publishable_key: &str, server: Option<ServerConfig>) -> Self {
        let store = InMemoryStore::new();
        let gateway = MockPaymentGateway::new();
        let notifier = RecordingNotifier::new();
        let verifier = Arc::new(StripeWebhookVerifier::new(SecretString::new(
            WEBHOOK_SECRET.to_string(),
        )));
        let storage = Storage::in_memory(store.clone());

        let deps = AppDependencies {
            accounts: storage.accounts,
            members: storage.members,
            payments: storage.payments,
            directory: storage.directory,
            webhook_events: storage.webhook_events,
            gateway: Arc::new(gateway.clone()),
            notifier: Arc::new(notifier.clone()),
            anti_forgery: Arc::new(HmacAntiForgery::new(
                SecretString::new(NONCE_SECRET.to_string()),
                86_400,
            )),
            webhook_verifier: verifier.clone(),
        };
        let settings = AppSettings {
            registration: RegistrationSettings {
                prices: PriceSchedule::default(),
                tiers: TieredPricing::default(),
                login_url: LOGIN_URL.to_string(),
                organisation: "LCCI".to_string(),
            },
            publishable_key: publishable_key.to_string(),
            admin_token: Some(SecretString::new(ADMIN_TOKEN.to_string())),
        };

        let state = AppState::new(deps, settings);
        let router = match server {
            Some(server) => build_router(state, &server),
            None => routes().with_state(state),
        };

        Self {
            router,
            store,
            gateway,
            notifier,
            verifier,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_as_admin(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, pairs: &[(&str, &str)]) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_encode(pairs)))
                .unwrap(),
        )
        .await
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: &str,
        body: String,
    ) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Posts `event` with a valid signature unless `signature` overrides it.
    pub async fn post_webhook(
        &self,
        path: &str,
        event: &Value,
        signature: Option<&str>,
    ) -> (StatusCode, Value) {
        let payload = serde_json::to_vec(event).unwrap();
        let signature = match signature {
            Some(value) => value.to_string(),
            None => self
                .verifier
                .sign(Timestamp::now().as_unix_secs(), &payload)
                .unwrap(),
        };
        self.send(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .header("Stripe-Signature", signature)
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
    }

    /// Returns `(register_nonce, payment_nonce)`.
    pub async fn nonces(&self) -> (String, String) {
        let (status, body) = self.get("/api/registration/nonces").await;
        assert_eq!(status, StatusCode::OK);
        (
            body["data"]["register_nonce"].as_str().unwrap().to_string(),
            body["data"]["payment_nonce"].as_str().unwrap().to_string(),
        )
    }

    /// Registers `email` on the direct-debit path and returns the response data.
    pub async fn register_direct_debit(&self, email: &str) -> Value {
        let (nonce, _) = self.nonces().await;
        let data = registration_data(email, "direct_debit").to_string();
        let (status, body) = self
            .post_form(
                "/api/registration/register",
                &[("nonce", &nonce), ("data", &data)],
            )
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
        body["data"].clone()
    }

    /// Runs the card path for `email` and returns the response data.
    pub async fn register_by_card(&self, email: &str) -> Value {
        let (_, nonce) = self.nonces().await;
        let data = registration_data(email, "card").to_string();
        let (status, body) = self
            .post_form(
                "/api/registration/payment-intent",
                &[("nonce", &nonce), ("data", &data), ("amount", "73200")],
            )
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
        body["data"].clone()
    }
}

pub fn registration_data(email: &str, payment_method: &str) -> Value {
    json!({
        "step1": {
            "title": "Ms",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "job_title": "Director",
            "phone": "020 7946 0000",
            "email": email,
            "password": "Str0ng!Pass",
            "confirm_password": "Str0ng!Pass"
        },
        "step2": {
            "company_name": "Analytical Engines Ltd",
            "company_website": "https://engines.example",
            "employee_count": "3-12",
            "company_description": "Computing machinery & tables",
            "sector": "Technology",
            "reason_for_joining": "Networking",
            "address_1": "12 Marylebone Road",
            "city": "London",
            "postcode": "NW1 5LR",
            "country": "United Kingdom",
            "terms": "on"
        },
        "step3": { "payment_method": payment_method }
    })
}

/// A `payment_intent.*` event for `intent_id`.
pub fn payment_intent_event(
    event_id: &str,
    event_type: &str,
    intent_id: &str,
    amount: i64,
) -> Value {
    json!({
        "id": event_id,
        "type": event_type,
        "created": Timestamp::now().as_unix_secs(),
        "data": {
            "object": {
                "id": intent_id,
                "object": "payment_intent",
                "amount": amount,
                "currency": "gbp",
                "status": "succeeded",
                "metadata": {}
            }
        },
        "livemode": false,
        "api_version": "2023-10-16"
    })
}

/// `application/x-www-form-urlencoded` body for `pairs`.
pub fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
