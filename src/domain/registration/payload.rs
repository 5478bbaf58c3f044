//! Typed registration request parsed from the submitted `data` JSON.
//!
//! The wire shape is `{"step1": {...}, "step2": {...}, "step3": {...}}`.
//! Only `step1` is required; a missing `step2` or `step3` skips the
//! corresponding persistence step.

use serde_json::{Map, Value};

use crate::domain::member::CompanyDetails;
use crate::domain::payment::PaymentMethod;

use super::password_policy::{Password, PasswordPolicy};
use super::sanitize::{
    is_valid_email, sanitize_email, sanitize_text, sanitize_textarea, sanitize_url,
};
use super::RegistrationError;

/// Identity fields checked in this order; the first empty one is reported.
pub const REQUIRED_IDENTITY_FIELDS: [&str; 5] =
    ["title", "first_name", "last_name", "email", "password"];

/// Who is registering (step 1).
#[derive(Debug, Clone)]
pub struct IdentityDetails {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub phone: String,
    /// Lower-cased; doubles as the login.
    pub email: String,
    pub password: Password,
}

impl IdentityDetails {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payment choice from step 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSelection {
    /// Value as submitted, after sanitisation.
    pub raw: String,
    pub method: PaymentMethod,
}

impl PaymentSelection {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            method: PaymentMethod::from_selection(&raw),
            raw,
        }
    }

    /// False when the submitted value was not `card` or `direct_debit`.
    pub fn is_recognised(&self) -> bool {
        PaymentMethod::is_recognised(&self.raw)
    }
}

/// A validated registration submission.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub identity: IdentityDetails,
    pub company: Option<CompanyDetails>,
    pub payment: Option<PaymentSelection>,
}

impl RegistrationRequest {
    /// Parses and validates the `data` payload.
    ///
    /// # Errors
    ///
    /// - `InvalidPayload` if the JSON is unusable or `step1` is absent or empty
    /// - `MissingField` naming the first empty required identity field
    /// - `InvalidField` for a malformed email or a weak or mismatched password
    pub fn parse(raw: &str) -> Result<Self, RegistrationError> {
        let root: Value =
            serde_json::from_str(raw.trim()).map_err(|_| RegistrationError::InvalidPayload)?;

        let step1 = match root.get("step1") {
            Some(Value::Object(map)) if !map.is_empty() => map,
            _ => return Err(RegistrationError::InvalidPayload),
        };

        for field in REQUIRED_IDENTITY_FIELDS {
            if text_field(step1, field).trim().is_empty() {
                return Err(RegistrationError::missing_field(field));
            }
        }

        let email = sanitize_email(&text_field(step1, "email"));
        if !is_valid_email(&email) {
            return Err(RegistrationError::invalid_field(
                "email",
                "Please enter a valid email address",
            ));
        }

        let password = Password::new(text_field(step1, "password"));
        let confirmation = step1
            .get("confirm_password")
            .filter(|v| !v.is_null())
            .map(|v| Password::new(coerce(v)));
        PasswordPolicy::check(&password, confirmation.as_ref()).map_err(|violation| {
            RegistrationError::invalid_field("password", violation.message())
        })?;

        let identity = IdentityDetails {
            title: sanitize_text(&text_field(step1, "title")),
            first_name: sanitize_text(&text_field(step1, "first_name")),
            last_name: sanitize_text(&text_field(step1, "last_name")),
            job_title: sanitize_text(&text_field(step1, "job_title")),
            phone: sanitize_text(&text_field(step1, "phone")),
            email,
            password,
        };

        let company = match root.get("step2") {
            Some(Value::Object(step2)) => Some(company_details(step2)),
            _ => None,
        };

        let payment = match root.get("step3") {
            Some(Value::Object(step3)) => {
                let selection = sanitize_text(&text_field(step3, "payment_method"));
                (!selection.is_empty()).then(|| PaymentSelection::from_raw(selection))
            }
            _ => None,
        };

        Ok(Self {
            identity,
            company,
            payment,
        })
    }
}

fn company_details(step2: &Map<String, Value>) -> CompanyDetails {
    CompanyDetails {
        company_name: sanitize_text(&text_field(step2, "company_name")),
        company_website: sanitize_url(&text_field(step2, "company_website")),
        company_description: sanitize_textarea(&text_field(step2, "company_description")),
        sector: sanitize_text(&text_field(step2, "sector")),
        employee_count: sanitize_text(&text_field(step2, "employee_count")),
        address_1: sanitize_text(&text_field(step2, "address_1")),
        address_2: sanitize_text(&text_field(step2, "address_2")),
        city: sanitize_text(&text_field(step2, "city")),
        postcode: sanitize_text(&text_field(step2, "postcode")),
        country: sanitize_text(&text_field(step2, "country")),
        reason_for_joining: sanitize_text(&text_field(step2, "reason_for_joining")),
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).map(coerce).unwrap_or_default()
}

/// Scalars become their textual form; arrays, objects and null become empty.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn valid_step1() -> Value {
        json!({
            "title": "Mr",
            "first_name": "A",
            "last_name": "B",
            "email": "a@b.com",
            "password": "Abcdef1!"
        })
    }

    fn parse(value: Value) -> Result<RegistrationRequest, RegistrationError> {
        RegistrationRequest::parse(&value.to_string())
    }

    // ══════════════════════════════════════════════════════════════
    // Structure
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parses_full_submission() {
        let request = parse(json!({
            "step1": valid_step1(),
            "step2": {"company_name": "Acme", "employee_count": "3-12"},
            "step3": {"payment_method": "direct_debit"}
        }))
        .unwrap();

        assert_eq!(request.identity.email, "a@b.com");
        assert_eq!(request.identity.display_name(), "A B");
        assert_eq!(request.company.unwrap().company_name, "Acme");
        assert_eq!(request.payment.unwrap().method, PaymentMethod::DirectDebit);
    }

    #[test]
    fn step2_and_step3_are_optional() {
        let request = parse(json!({ "step1": valid_step1() })).unwrap();
        assert!(request.company.is_none());
        assert!(request.payment.is_none());
    }

    #[test]
    fn garbage_is_invalid_payload() {
        assert_eq!(
            RegistrationRequest::parse("not json").unwrap_err(),
            RegistrationError::InvalidPayload
        );
        assert_eq!(
            RegistrationRequest::parse("").unwrap_err(),
            RegistrationError::InvalidPayload
        );
    }

    #[test]
    fn missing_or_empty_step1_is_invalid_payload() {
        assert_eq!(parse(json!({})).unwrap_err(), RegistrationError::InvalidPayload);
        assert_eq!(
            parse(json!({ "step1": {} })).unwrap_err(),
            RegistrationError::InvalidPayload
        );
        assert_eq!(
            parse(json!({ "step1": "Mr A B" })).unwrap_err(),
            RegistrationError::InvalidPayload
        );
    }

    #[test]
    fn empty_payment_method_skips_payment() {
        let request = parse(json!({
            "step1": valid_step1(),
            "step3": {"payment_method": ""}
        }))
        .unwrap();
        assert!(request.payment.is_none());
    }

    #[test]
    fn unknown_payment_method_is_card_but_unrecognised() {
        let request = parse(json!({
            "step1": valid_step1(),
            "step3": {"payment_method": "cheque"}
        }))
        .unwrap();
        let selection = request.payment.unwrap();
        assert_eq!(selection.method, PaymentMethod::Card);
        assert!(!selection.is_recognised());
    }

    // ══════════════════════════════════════════════════════════════
    // Field handling
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn scalars_are_coerced_to_text() {
        let mut step1 = valid_step1();
        step1["phone"] = json!(1624123456);
        let request = parse(json!({ "step1": step1, "step2": {"company_name": true} })).unwrap();

        assert_eq!(request.identity.phone, "1624123456");
        assert_eq!(request.company.unwrap().company_name, "true");
    }

    #[test]
    fn fields_are_sanitised() {
        let mut step1 = valid_step1();
        step1["first_name"] = json!("  <b>Jane</b> ");
        step1["email"] = json!(" Jane@Example.COM ");
        let request = parse(json!({
            "step1": step1,
            "step2": {
                "company_name": "Acme",
                "company_website": "javascript:alert(1)",
                "company_description": "Line one\nLine two"
            }
        }))
        .unwrap();

        assert_eq!(request.identity.first_name, "Jane");
        assert_eq!(request.identity.email, "jane@example.com");
        let company = request.company.unwrap();
        assert_eq!(company.company_website, "");
        assert_eq!(company.company_description, "Line one\nLine two");
    }

    #[test]
    fn malformed_email_is_invalid_field() {
        let mut step1 = valid_step1();
        step1["email"] = json!("not-an-email");
        let err = parse(json!({ "step1": step1 })).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidField { ref field, .. } if field == "email"
        ));
    }

    #[test]
    fn weak_password_is_rejected() {
        let mut step1 = valid_step1();
        step1["password"] = json!("password");
        let err = parse(json!({ "step1": step1 })).unwrap_err();
        assert_eq!(err.message(), "Password does not meet requirements");
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut step1 = valid_step1();
        step1["confirm_password"] = json!("Abcdef1?");
        let err = parse(json!({ "step1": step1 })).unwrap_err();
        assert_eq!(err.message(), "Passwords do not match");
    }

    #[test]
    fn matching_confirmation_is_accepted() {
        let mut step1 = valid_step1();
        step1["confirm_password"] = json!("Abcdef1!");
        step1["terms"] = json!("on");
        assert!(parse(json!({ "step1": step1 })).is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Required-field ordering
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut step1 = valid_step1();
        step1["last_name"] = json!("   ");
        assert_eq!(
            parse(json!({ "step1": step1 })).unwrap_err(),
            RegistrationError::missing_field("last_name")
        );
    }

    proptest! {
        #[test]
        fn first_missing_field_is_reported(mask in proptest::collection::vec(any::<bool>(), 5)) {
            prop_assume!(mask.iter().any(|present| !present));

            let mut step1 = valid_step1();
            for (field, present) in REQUIRED_IDENTITY_FIELDS.iter().zip(&mask) {
                if !present {
                    step1.as_object_mut().unwrap().remove(*field);
                }
            }
            // Something else keeps step1 non-empty.
            step1["job_title"] = json!("Director");

            let expected = REQUIRED_IDENTITY_FIELDS
                .iter()
                .zip(&mask)
                .find(|(_, present)| !**present)
                .map(|(field, _)| *field)
                .unwrap();

            prop_assert_eq!(
                parse(json!({ "step1": step1 })).unwrap_err(),
                RegistrationError::missing_field(expected)
            );
        }
    }
}
