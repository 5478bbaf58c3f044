//! Registration module - parsing and validating membership submissions.

mod errors;
mod password_policy;
mod payload;
mod sanitize;
mod wizard;

pub use errors::{ErrorKind, RegistrationError};
pub use password_policy::{Password, PasswordPolicy, PasswordViolation, SPECIAL_CHARACTERS};
pub use payload::{
    IdentityDetails, PaymentSelection, RegistrationRequest, REQUIRED_IDENTITY_FIELDS,
};
pub use sanitize::{is_valid_email, sanitize_email, sanitize_text, sanitize_textarea, sanitize_url};
pub use wizard::{
    RegistrationWizard, StepFields, Submission, SubmissionRoute, WizardError, WizardStep,
    COUNTRIES, JOINING_REASONS, SECTORS, TITLES,
};
