//! Integration tests for the registration, checkout, pricing and admin
//! endpoints, driven through the router over in-memory storage.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{registration_data, TestApp, ADMIN_TOKEN, LOGIN_URL, PUBLISHABLE_KEY};
use tocc_membership::config::ServerConfig;
use tocc_membership::ports::PaymentError;

// =============================================================================
// Health and form tokens
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn nonces_are_issued_per_scope() {
    let app = TestApp::new();

    let (register_nonce, payment_nonce) = app.nonces().await;

    assert!(!register_nonce.is_empty());
    assert!(!payment_nonce.is_empty());
    assert_ne!(register_nonce, payment_nonce);
}

// =============================================================================
// Direct registration
// =============================================================================

#[tokio::test]
async fn direct_debit_registration_creates_pending_payment_and_sends_welcome() {
    let app = TestApp::new();

    let data = app.register_direct_debit("Ada@Example.com").await;

    assert_eq!(data["redirect"], LOGIN_URL);
    assert_eq!(data["payment_status"], "pending");
    assert_eq!(data["payment_amount"]["amount_minor"], 66_600);
    assert_eq!(data["payment_amount"]["currency"], "GBP");
    assert!(data["user_id"].is_string());
    assert!(data["payment_id"].is_string());

    assert_eq!(app.store.account_count().await, 1);
    assert_eq!(app.store.payment_count().await, 1);

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert_eq!(sent[0].first_name, "Ada");
    assert_eq!(sent[0].login_url, LOGIN_URL);
}

#[tokio::test]
async fn forged_nonce_is_forbidden() {
    let app = TestApp::new();
    let data = registration_data("ada@example.com", "direct_debit").to_string();

    let (status, body) = app
        .post_form(
            "/api/registration/register",
            &[("nonce", "not-a-real-token"), ("data", &data)],
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["code"], "SECURITY_CHECK_FAILED");
    assert_eq!(app.store.account_count().await, 0);
}

#[tokio::test]
async fn payment_nonce_cannot_be_used_to_register() {
    let app = TestApp::new();
    let (_, payment_nonce) = app.nonces().await;
    let data = registration_data("ada@example.com", "direct_debit").to_string();

    let (status, _) = app
        .post_form(
            "/api/registration/register",
            &[("nonce", &payment_nonce), ("data", &data)],
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_identity_field_is_named() {
    let app = TestApp::new();
    let (nonce, _) = app.nonces().await;
    let mut payload = registration_data("ada@example.com", "direct_debit");
    payload["step1"]["last_name"] = json!("");

    let (status, body) = app
        .post_form(
            "/api/registration/register",
            &[("nonce", &nonce), ("data", &payload.to_string())],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "MISSING_FIELD");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("last_name"));
}

#[tokio::test]
async fn unparsable_payload_is_rejected() {
    let app = TestApp::new();
    let (nonce, _) = app.nonces().await;

    let (status, body) = app
        .post_form(
            "/api/registration/register",
            &[("nonce", &nonce), ("data", "{not json")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn json_body_gets_failure_envelope() {
    let app = TestApp::new();
    let (nonce, _) = app.nonces().await;
    let body = json!({
        "nonce": nonce,
        "data": registration_data("ada@example.com", "direct_debit").to_string()
    });

    let (status, body) = app
        .post_raw("/api/registration/register", "application/json", body.to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["code"], "INVALID_PAYLOAD");
    assert_eq!(app.store.account_count().await, 0);
}

#[tokio::test]
async fn oversized_form_is_rejected_by_body_limit() {
    let app = TestApp::with_server_config(ServerConfig {
        body_limit_bytes: 2048,
        ..Default::default()
    });
    let (nonce, _) = app.nonces().await;
    let mut payload = registration_data("ada@example.com", "direct_debit");
    payload["step2"]["company_description"] = json!("x".repeat(4096));
    let data = payload.to_string();

    let (status, body) = app
        .post_form(
            "/api/registration/register",
            &[("nonce", &nonce), ("data", &data)],
        )
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(app.store.account_count().await, 0);
}

#[tokio::test]
async fn full_middleware_stack_serves_registration() {
    let app = TestApp::with_server_config(ServerConfig::default());

    let data = app.register_direct_debit("ada@example.com").await;

    assert_eq!(data["redirect"], LOGIN_URL);
    assert_eq!(app.store.account_count().await, 1);
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let app = TestApp::new();
    let (nonce, _) = app.nonces().await;
    let mut payload = registration_data("ada@example.com", "direct_debit");
    payload["step1"]["password"] = json!("weak");
    payload["step1"]["confirm_password"] = json!("weak");

    let (status, body) = app
        .post_form(
            "/api/registration/register",
            &[("nonce", &nonce), ("data", &payload.to_string())],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "INVALID_FIELD");
    assert_eq!(app.store.account_count().await, 0);
}

#[tokio::test]
async fn duplicate_email_conflicts_regardless_of_case() {
    let app = TestApp::new();
    app.register_direct_debit("ada@example.com").await;
    let (nonce, _) = app.nonces().await;
    let data = registration_data("ADA@example.com", "direct_debit").to_string();

    let (status, body) = app
        .post_form(
            "/api/registration/register",
            &[("nonce", &nonce), ("data", &data)],
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["code"], "EMAIL_ALREADY_REGISTERED");
    assert_eq!(app.store.account_count().await, 1);
    assert_eq!(app.notifier.sent_count(), 1);
}

// =============================================================================
// Card path
// =============================================================================

#[tokio::test]
async fn card_registration_returns_client_secret_and_records_intent() {
    let app = TestApp::new();

    let data = app.register_by_card("grace@example.com").await;

    assert_eq!(data["payment_intent_id"], "pi_mock_1");
    assert_eq!(data["client_secret"], "pi_mock_1_secret_mock");
    assert_eq!(data["redirect"], LOGIN_URL);
    assert!(data["payment_id"].is_string());

    let request = app.gateway.last_request().unwrap();
    assert_eq!(request.amount.amount_minor(), 73_200);
    assert_eq!(
        request.metadata.get("email").map(String::as_str),
        Some("grace@example.com")
    );
    assert!(request.idempotency_key.is_some());
}

#[tokio::test]
async fn card_amount_must_match_configured_amount() {
    let app = TestApp::new();
    let (_, nonce) = app.nonces().await;
    let data = registration_data("grace@example.com", "card").to_string();

    let (status, body) = app
        .post_form(
            "/api/registration/payment-intent",
            &[("nonce", &nonce), ("data", &data), ("amount", "100")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "AMOUNT_MISMATCH");
    assert_eq!(app.gateway.call_count(), 0);
    assert_eq!(app.store.account_count().await, 0);
}

#[tokio::test]
async fn non_numeric_amount_is_invalid() {
    let app = TestApp::new();
    let (_, nonce) = app.nonces().await;
    let data = registration_data("grace@example.com", "card").to_string();

    let (status, body) = app
        .post_form(
            "/api/registration/payment-intent",
            &[("nonce", &nonce), ("data", &data), ("amount", "seven")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "INVALID_FIELD");
}

#[tokio::test]
async fn processor_failure_is_bad_gateway_and_creates_nothing() {
    let app = TestApp::new();
    app.gateway
        .set_error(PaymentError::network("connection reset"));
    let (_, nonce) = app.nonces().await;
    let data = registration_data("grace@example.com", "card").to_string();

    let (status, body) = app
        .post_form(
            "/api/registration/payment-intent",
            &[("nonce", &nonce), ("data", &data), ("amount", "73200")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["data"]["code"], "PAYMENT_PROCESSOR_ERROR");
    assert_eq!(app.store.account_count().await, 0);
    assert_eq!(app.notifier.sent_count(), 0);
}

#[tokio::test]
async fn processor_authentication_failure_hides_details() {
    let app = TestApp::new();
    app.gateway
        .set_error(PaymentError::authentication("Invalid API Key provided: sk_live_****"));
    let (_, nonce) = app.nonces().await;
    let data = registration_data("grace@example.com", "card").to_string();

    let (status, body) = app
        .post_form(
            "/api/registration/payment-intent",
            &[("nonce", &nonce), ("data", &data), ("amount", "73200")],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body["data"]["message"].as_str().unwrap().contains("sk_live"));
}

// =============================================================================
// Checkout configuration
// =============================================================================

#[tokio::test]
async fn checkout_exposes_publishable_key_and_amount() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/registration/checkout").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["publishable_key"], PUBLISHABLE_KEY);
    assert_eq!(body["data"]["amount"], 73_200);
    assert_eq!(body["data"]["currency"], "gbp");
}

#[tokio::test]
async fn checkout_never_exposes_a_secret_key() {
    let app = TestApp::with_publishable_key("sk_test_wrong_slot");

    let (status, body) = app.get("/api/registration/checkout").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["data"]["code"], "SECRET_KEY_EXPOSED");
    assert!(!body.to_string().contains("sk_test_wrong_slot"));
}

#[tokio::test]
async fn checkout_without_key_is_unavailable() {
    let app = TestApp::with_publishable_key("");

    let (status, body) = app.get("/api/registration/checkout").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["data"]["code"], "PROCESSOR_NOT_CONFIGURED");
}

// =============================================================================
// Pricing
// =============================================================================

#[tokio::test]
async fn quote_includes_vat() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/pricing/quote?employee_count=3-12").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vat_percent"], 20);
    assert_eq!(body["data"]["quote"]["total"]["amount_minor"], 92_400);
}

#[tokio::test]
async fn large_company_quote_is_on_request() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/pricing/quote?employee_count=1001%2B").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["quote"].is_null());
}

#[tokio::test]
async fn unknown_bracket_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/pricing/quote?employee_count=lots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "INVALID_FIELD");
}

// =============================================================================
// Admin listings
// =============================================================================

#[tokio::test]
async fn admin_listing_requires_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/admin/members").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["code"], "UNAUTHORIZED");

    let (status, _) = app.get_as_admin("/api/admin/members", "wrong-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_lists_members_with_latest_payment() {
    let app = TestApp::new();
    app.register_direct_debit("ada@example.com").await;
    app.register_by_card("grace@example.com").await;

    let (status, body) = app.get_as_admin("/api/admin/members", ADMIN_TOKEN).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .all(|m| m["details"]["company_name"] == "Analytical Engines Ltd"));
    assert!(items.iter().any(|m| m["payment_method"] == "card"));
    assert!(items.iter().any(|m| m["payment_method"] == "direct_debit"));
}

#[tokio::test]
async fn admin_filters_payments_by_status() {
    let app = TestApp::new();
    app.register_direct_debit("ada@example.com").await;

    let (status, body) = app
        .get_as_admin("/api/admin/payments?status=pending", ADMIN_TOKEN)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["status"], "pending");

    let (status, body) = app
        .get_as_admin("/api/admin/payments?status=completed", ADMIN_TOKEN)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = app
        .get_as_admin("/api/admin/payments?status=refunded", ADMIN_TOKEN)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_page_gets_failure_envelope() {
    let app = TestApp::new();

    let (status, body) = app
        .get_as_admin("/api/admin/members?page=first", ADMIN_TOKEN)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["code"], "INVALID_PAYLOAD");
}
