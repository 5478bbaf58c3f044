//! Registration-specific error types.
//!
//! Every failure in the registration and payment-initiation flow maps onto
//! one [`ErrorKind`], which callers use instead of matching message text.
//!
//! # HTTP Status Mapping
//!
//! | Kind | HTTP Status |
//! |------|-------------|
//! | Security | 403 |
//! | Validation | 400 (409 for a duplicate email) |
//! | Platform | 422 |
//! | ProcessorConfiguration | 503 |
//! | ProcessorRuntime | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::DomainError;
use crate::domain::payment::CheckoutKeyError;

/// Broad failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Anti-forgery token failed to verify.
    Security,
    /// The submission itself is wrong.
    Validation,
    /// The account platform refused to create the account.
    Platform,
    /// Card payments are misconfigured.
    ProcessorConfiguration,
    /// The payment processor failed at runtime.
    ProcessorRuntime,
    /// Storage or other internal failure.
    Infrastructure,
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Anti-forgery token missing, expired or forged.
    SecurityCheckFailed,

    /// Payload missing, unparsable, or without identity details.
    InvalidPayload,

    /// A required identity field was empty.
    MissingField(String),

    /// A field was present but unacceptable.
    InvalidField { field: String, reason: String },

    /// An account already uses this email.
    EmailAlreadyRegistered,

    /// The account platform rejected the account; carries its message.
    AccountCreation(String),

    /// No publishable key is configured.
    ProcessorNotConfigured,

    /// A secret key was configured where the publishable key belongs.
    SecretKeyExposed,

    /// The client asked for a different card amount than configured.
    AmountMismatch { expected: i64, received: i64 },

    /// The processor call failed.
    PaymentProcessor(String),

    /// Storage or internal failure.
    Infrastructure(String),
}

impl RegistrationError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        RegistrationError::MissingField(field.into())
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RegistrationError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn account_creation(message: impl Into<String>) -> Self {
        RegistrationError::AccountCreation(message.into())
    }

    pub fn payment_processor(message: impl Into<String>) -> Self {
        RegistrationError::PaymentProcessor(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        RegistrationError::Infrastructure(message.into())
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistrationError::SecurityCheckFailed => ErrorKind::Security,
            RegistrationError::InvalidPayload
            | RegistrationError::MissingField(_)
            | RegistrationError::InvalidField { .. }
            | RegistrationError::EmailAlreadyRegistered
            | RegistrationError::AmountMismatch { .. } => ErrorKind::Validation,
            RegistrationError::AccountCreation(_) => ErrorKind::Platform,
            RegistrationError::ProcessorNotConfigured | RegistrationError::SecretKeyExposed => {
                ErrorKind::ProcessorConfiguration
            }
            RegistrationError::PaymentProcessor(_) => ErrorKind::ProcessorRuntime,
            RegistrationError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationError::SecurityCheckFailed => "SECURITY_CHECK_FAILED",
            RegistrationError::InvalidPayload => "INVALID_PAYLOAD",
            RegistrationError::MissingField(_) => "MISSING_FIELD",
            RegistrationError::InvalidField { .. } => "INVALID_FIELD",
            RegistrationError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            RegistrationError::AccountCreation(_) => "ACCOUNT_CREATION_FAILED",
            RegistrationError::ProcessorNotConfigured => "PROCESSOR_NOT_CONFIGURED",
            RegistrationError::SecretKeyExposed => "SECRET_KEY_EXPOSED",
            RegistrationError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            RegistrationError::PaymentProcessor(_) => "PAYMENT_PROCESSOR_ERROR",
            RegistrationError::Infrastructure(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            RegistrationError::SecurityCheckFailed => "Security check failed".to_string(),
            RegistrationError::InvalidPayload => "Invalid registration data".to_string(),
            RegistrationError::MissingField(field) => {
                format!("Missing required field: {}", field)
            }
            RegistrationError::InvalidField { reason, .. } => reason.clone(),
            RegistrationError::EmailAlreadyRegistered => "Email already registered".to_string(),
            RegistrationError::AccountCreation(message) => message.clone(),
            RegistrationError::ProcessorNotConfigured => {
                CheckoutKeyError::NotConfigured.to_string()
            }
            RegistrationError::SecretKeyExposed => CheckoutKeyError::SecretKeySupplied.to_string(),
            RegistrationError::AmountMismatch { expected, received } => format!(
                "Payment amount {} does not match the membership price {}",
                received, expected
            ),
            RegistrationError::PaymentProcessor(message) => {
                format!("Payment could not be started: {}", message)
            }
            RegistrationError::Infrastructure(_) => {
                "Registration could not be completed. Please try again.".to_string()
            }
        }
    }
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RegistrationError {}

impl From<CheckoutKeyError> for RegistrationError {
    fn from(err: CheckoutKeyError) -> Self {
        match err {
            CheckoutKeyError::NotConfigured => RegistrationError::ProcessorNotConfigured,
            CheckoutKeyError::SecretKeySupplied => RegistrationError::SecretKeyExposed,
        }
    }
}

impl From<DomainError> for RegistrationError {
    fn from(err: DomainError) -> Self {
        RegistrationError::Infrastructure(err.to_string())
    }
}
