//! Shared application state and the top-level router.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::handlers::{
    CreatePaymentIntentHandler, GetCheckoutConfigHandler, HandlePaymentWebhookHandler,
    ListMembersHandler, ListPaymentsHandler, PaymentIntentDispatcher,
    QuoteMembershipPriceHandler, RegisterMemberHandler, RegistrationSettings,
};
use crate::config::ServerConfig;
use crate::domain::webhook::{IdempotentWebhookProcessor, StripeWebhookVerifier};
use crate::ports::{
    AccountProvider, AntiForgery, MemberDirectory, MemberRepository, Notifier, PaymentGateway,
    PaymentRepository, WebhookEventRepository,
};

use super::{admin, registration, webhooks};

/// Port implementations the handlers are built from.
pub struct AppDependencies {
    pub accounts: Arc<dyn AccountProvider>,
    pub members: Arc<dyn MemberRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub directory: Arc<dyn MemberDirectory>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
    pub anti_forgery: Arc<dyn AntiForgery>,
    pub webhook_verifier: Arc<StripeWebhookVerifier>,
}

/// Values the handlers need from configuration.
pub struct AppSettings {
    pub registration: RegistrationSettings,
    pub publishable_key: String,
    /// Unset disables the admin listings.
    pub admin_token: Option<SecretString>,
}

/// Shared state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub anti_forgery: Arc<dyn AntiForgery>,
    pub register_member: Arc<RegisterMemberHandler>,
    pub create_payment_intent: Arc<CreatePaymentIntentHandler>,
    pub checkout_config: Arc<GetCheckoutConfigHandler>,
    pub quote_price: Arc<QuoteMembershipPriceHandler>,
    pub payment_webhook: Arc<HandlePaymentWebhookHandler>,
    pub list_members: Arc<ListMembersHandler>,
    pub list_payments: Arc<ListPaymentsHandler>,
    pub admin_token: Option<SecretString>,
}

impl AppState {
    pub fn new(deps: AppDependencies, settings: AppSettings) -> Self {
        let card_amount = settings.registration.prices.card_intent.clone();
        let tiers = settings.registration.tiers.clone();

        let register_member = Arc::new(RegisterMemberHandler::new(
            deps.anti_forgery.clone(),
            deps.accounts.clone(),
            deps.members,
            deps.payments.clone(),
            deps.notifier,
            settings.registration,
        ));
        let create_payment_intent = Arc::new(CreatePaymentIntentHandler::new(
            deps.anti_forgery.clone(),
            deps.gateway,
            register_member.clone(),
        ));

        let dispatcher = Arc::new(PaymentIntentDispatcher::new(deps.payments, deps.accounts));
        let processor = Arc::new(IdempotentWebhookProcessor::new(
            deps.webhook_events,
            dispatcher,
        ));

        Self {
            anti_forgery: deps.anti_forgery,
            register_member,
            create_payment_intent,
            checkout_config: Arc::new(GetCheckoutConfigHandler::new(
                settings.publishable_key,
                card_amount,
            )),
            quote_price: Arc::new(QuoteMembershipPriceHandler::new(tiers)),
            payment_webhook: Arc::new(HandlePaymentWebhookHandler::new(
                deps.webhook_verifier,
                processor,
            )),
            list_members: Arc::new(ListMembersHandler::new(deps.directory.clone())),
            list_payments: Arc::new(ListPaymentsHandler::new(deps.directory)),
            admin_token: settings.admin_token,
        }
    }
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Routes without middleware; used directly by tests.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/registration", registration::registration_routes())
        .nest("/api/pricing", registration::pricing_routes())
        .nest("/api/admin", admin::admin_routes())
        .nest("/tocc/v1", webhooks::webhook_routes())
}

/// The complete application with tracing, CORS, timeout, request-id,
/// body-limit and compression layers.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(server))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )));

    routes().layer(middleware).with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
