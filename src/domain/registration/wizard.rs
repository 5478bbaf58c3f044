//! Three-step registration wizard.
//!
//! Collects identity, company and payment details into an accumulator keyed
//! by step name and produces the `data` payload submitted to the server.
//! Nothing is persisted until submission.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::member::EmployeeBracket;
use crate::domain::payment::PaymentMethod;

use super::password_policy::{Password, PasswordPolicy, PasswordViolation};
use super::sanitize::{is_valid_email, sanitize_url};

pub const TITLES: [&str; 5] = ["Mr", "Mrs", "Miss", "Ms", "Dr"];
pub const SECTORS: [&str; 5] = ["Hospitality", "Technology", "Finance", "Retail", "Other"];
pub const JOINING_REASONS: [&str; 4] = ["Networking", "Resources", "Events", "Other"];
pub const COUNTRIES: [&str; 3] = ["United Kingdom", "Island of Man", "Other"];

const IDENTITY_FIELDS: &[&str] = &[
    "title",
    "first_name",
    "last_name",
    "job_title",
    "phone",
    "email",
    "password",
    "confirm_password",
];

const COMPANY_FIELDS: &[&str] = &[
    "company_name",
    "company_website",
    "employee_count",
    "company_description",
    "sector",
    "reason_for_joining",
    "address_1",
    "city",
    "postcode",
    "country",
    "terms",
];

const PAYMENT_FIELDS: &[&str] = &["payment_method"];

/// Field values entered on one step.
pub type StepFields = BTreeMap<String, String>;

/// Wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Identity,
    Company,
    Payment,
    Submitted,
}

impl WizardStep {
    /// Accumulator key for this step's fields.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            WizardStep::Identity => Some("step1"),
            WizardStep::Company => Some("step2"),
            WizardStep::Payment => Some("step3"),
            WizardStep::Submitted => None,
        }
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            WizardStep::Identity => IDENTITY_FIELDS,
            WizardStep::Company => COMPANY_FIELDS,
            WizardStep::Payment => PAYMENT_FIELDS,
            WizardStep::Submitted => &[],
        }
    }

    fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Identity => Some(WizardStep::Company),
            WizardStep::Company => Some(WizardStep::Payment),
            WizardStep::Payment => Some(WizardStep::Submitted),
            WizardStep::Submitted => None,
        }
    }

    fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Company => Some(WizardStep::Identity),
            WizardStep::Payment => Some(WizardStep::Company),
            WizardStep::Identity | WizardStep::Submitted => None,
        }
    }
}

impl StateMachine for WizardStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.next().as_ref() == Some(target) || self.previous().as_ref() == Some(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        self.previous().into_iter().chain(self.next()).collect()
    }
}

/// Why the wizard refused to move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Please fill in {0}")]
    MissingField(&'static str),

    #[error("Please choose a valid option for {field}")]
    InvalidOption { field: &'static str },

    #[error("{}", .0.message())]
    Password(PasswordViolation),

    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    #[error("Please select a payment method")]
    InvalidPaymentMethod,

    #[error("Registration can only be submitted from the payment step")]
    NotOnPaymentStep,

    #[error("Registration has already been submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Transition(#[from] ValidationError),
}

/// Which server action receives the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionRoute {
    /// Register directly; a pending direct-debit payment is recorded.
    DirectRegistration,
    /// Create a payment intent first and collect card details in-browser.
    CardPayment,
}

/// Final payload handed to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// JSON `data` field value.
    pub data: String,
    pub route: SubmissionRoute,
}

/// Client-side step wizard.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: WizardStep,
    accumulator: BTreeMap<&'static str, StepFields>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Identity,
            accumulator: BTreeMap::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Values collected so far for a step.
    pub fn fields(&self, step: WizardStep) -> Option<&StepFields> {
        step.key().and_then(|key| self.accumulator.get(key))
    }

    /// Validates the current step, keeps its values, and moves forward.
    ///
    /// On the payment step the values are validated and kept but the wizard
    /// stays put until [`RegistrationWizard::submit`].
    pub fn advance(&mut self, fields: StepFields) -> Result<WizardStep, WizardError> {
        validate_step(self.step, &fields)?;
        self.merge(fields)?;
        if self.step != WizardStep::Payment {
            let next = self.step.next().ok_or(WizardError::AlreadySubmitted)?;
            self.step = self.step.transition_to(next)?;
        }
        Ok(self.step)
    }

    /// Keeps the current values without validating and moves back one step.
    pub fn back(&mut self, fields: StepFields) -> Result<WizardStep, WizardError> {
        self.merge(fields)?;
        if let Some(previous) = self.step.previous() {
            self.step = self.step.transition_to(previous)?;
        }
        Ok(self.step)
    }

    /// Serialises the accumulator and picks the submission route.
    pub fn submit(&mut self) -> Result<Submission, WizardError> {
        match self.step {
            WizardStep::Payment => {}
            WizardStep::Submitted => return Err(WizardError::AlreadySubmitted),
            _ => return Err(WizardError::NotOnPaymentStep),
        }

        let method = self
            .fields(WizardStep::Payment)
            .and_then(|f| f.get("payment_method"))
            .and_then(|m| m.parse::<PaymentMethod>().ok())
            .ok_or(WizardError::InvalidPaymentMethod)?;

        let mut root = Map::new();
        for (key, fields) in &self.accumulator {
            let step: Map<String, Value> = fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            root.insert((*key).to_string(), Value::Object(step));
        }

        self.step = self.step.transition_to(WizardStep::Submitted)?;

        Ok(Submission {
            data: Value::Object(root).to_string(),
            route: match method {
                PaymentMethod::DirectDebit => SubmissionRoute::DirectRegistration,
                PaymentMethod::Card => SubmissionRoute::CardPayment,
            },
        })
    }

    fn merge(&mut self, fields: StepFields) -> Result<(), WizardError> {
        let key = self.step.key().ok_or(WizardError::AlreadySubmitted)?;
        self.accumulator.entry(key).or_default().extend(fields);
        Ok(())
    }
}

fn validate_step(step: WizardStep, fields: &StepFields) -> Result<(), WizardError> {
    for field in step.required_fields() {
        let present = fields.get(*field).map(|v| !v.trim().is_empty()).unwrap_or(false);
        if !present {
            if *field == "terms" {
                return Err(WizardError::TermsNotAccepted);
            }
            return Err(WizardError::MissingField(*field));
        }
    }

    let value = |name: &str| field_value(fields, name);

    match step {
        WizardStep::Identity => {
            require_option("title", value("title"), &TITLES)?;
            if !is_valid_email(&value("email").trim().to_lowercase()) {
                return Err(WizardError::InvalidOption { field: "email" });
            }
            PasswordPolicy::check(
                &Password::new(value("password")),
                Some(&Password::new(value("confirm_password"))),
            )
            .map_err(WizardError::Password)?;
        }
        WizardStep::Company => {
            if sanitize_url(value("company_website")).is_empty() {
                return Err(WizardError::InvalidOption {
                    field: "company_website",
                });
            }
            if value("employee_count").parse::<EmployeeBracket>().is_err() {
                return Err(WizardError::InvalidOption {
                    field: "employee_count",
                });
            }
            require_option("sector", value("sector"), &SECTORS)?;
            require_option("reason_for_joining", value("reason_for_joining"), &JOINING_REASONS)?;
            require_option("country", value("country"), &COUNTRIES)?;
            if !matches!(value("terms"), "on" | "true" | "1" | "yes") {
                return Err(WizardError::TermsNotAccepted);
            }
        }
        WizardStep::Payment => {
            if !PaymentMethod::is_recognised(value("payment_method")) {
                return Err(WizardError::InvalidPaymentMethod);
            }
        }
        WizardStep::Submitted => return Err(WizardError::AlreadySubmitted),
    }
    Ok(())
}

fn field_value<'a>(fields: &'a StepFields, name: &str) -> &'a str {
    fields.get(name).map(String::as_str).unwrap_or_default()
}

fn require_option(field: &'static str, value: &str, options: &[&str]) -> Result<(), WizardError> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(WizardError::InvalidOption { field })
    }
}
