//! Response envelope and error mapping shared by every endpoint.
//!
//! Success: `{"success": true, "data": {...}}`
//! Failure: `{"success": false, "data": {"message": "...", "code": "..."}}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::registration::{ErrorKind, RegistrationError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub message: String,
    pub code: String,
}

/// An error rendered into the failure envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Valid admin credentials are required",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// HTTP status for a registration failure.
pub fn status_for(err: &RegistrationError) -> StatusCode {
    match err.kind() {
        ErrorKind::Security => StatusCode::FORBIDDEN,
        ErrorKind::Validation => match err {
            RegistrationError::EmailAlreadyRegistered => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        },
        ErrorKind::Platform => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ProcessorConfiguration => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ProcessorRuntime => StatusCode::BAD_GATEWAY,
        ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        if let RegistrationError::Infrastructure(detail) = &err {
            tracing::error!(error = %detail, "Registration failed on infrastructure");
        }
        Self::new(status_for(&err), err.code(), err.message())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        tracing::error!(error = %err, "Request failed on infrastructure");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: false,
            data: ErrorData {
                message: self.message,
                code: self.code.to_string(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}
