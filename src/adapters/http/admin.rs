//! HTTP adapter for the admin listings.
//!
//! - `GET /api/admin/members?page=`
//! - `GET /api/admin/payments?status=&page=`
//!
//! Both require `Authorization: Bearer <admin token>`.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::ExposeSecret;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::application::handlers::{ListMembersQuery, ListPaymentsQuery};
use crate::domain::payment::PaymentStatus;
use crate::ports::{MemberListing, Page, PaymentListing};

use super::app::AppState;
use super::extract::ApiQuery;
use super::response::{ApiError, Envelope};

/// Proof that the request carried the admin bearer token.
#[derive(Debug)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let expected = state.admin_token.as_ref().ok_or_else(ApiError::unauthorized)?;
        let presented = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(ApiError::unauthorized)?;

        let matches: bool = presented
            .trim()
            .as_bytes()
            .ct_eq(expected.expose_secret().as_bytes())
            .into();
        if matches {
            Ok(AdminAccess)
        } else {
            tracing::warn!("Admin request with invalid token");
            Err(ApiError::unauthorized())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MembersParams {
    pub page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentsParams {
    pub status: Option<String>,
    pub page: Option<u32>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<PaymentStatus>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "INVALID_FIELD",
                "Unknown payment status",
            )
        }),
    }
}

/// GET /api/admin/members
pub async fn list_members(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<MembersParams>,
) -> Result<Json<Envelope<Page<MemberListing>>>, ApiError> {
    let page = state
        .list_members
        .handle(ListMembersQuery { page: params.page })
        .await?;
    Ok(Envelope::ok(page))
}

/// GET /api/admin/payments
pub async fn list_payments(
    _admin: AdminAccess,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaymentsParams>,
) -> Result<Json<Envelope<Page<PaymentListing>>>, ApiError> {
    let status = parse_status_filter(params.status.as_deref())?;
    let page = state
        .list_payments
        .handle(ListPaymentsQuery {
            status,
            page: params.page,
        })
        .await?;
    Ok(Envelope::ok(page))
}

/// Mounted at `/api/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members))
        .route("/payments", get(list_payments))
}
