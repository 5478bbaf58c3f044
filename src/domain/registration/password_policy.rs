//! Password strength rules applied on the server.

use secrecy::{ExposeSecret, SecretString};

/// Characters that count towards the digit-or-special requirement.
pub const SPECIAL_CHARACTERS: &str = "-!@#$%^&*_+=`|(){}[]:;\"'<>,.?/";

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A submitted password. Never printed or serialised.
#[derive(Clone)]
pub struct Password(SecretString);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::new(raw.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Which rule a password broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordViolation {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigitOrSpecial,
    ConfirmationMismatch,
}

impl PasswordViolation {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordViolation::ConfirmationMismatch => "Passwords do not match",
            _ => "Password does not meet requirements",
        }
    }
}

/// Minimum length 8, at least one upper-case letter, one lower-case letter,
/// and one digit or special character.
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Checks strength and, when a confirmation was submitted, that it matches.
    pub fn check(
        password: &Password,
        confirmation: Option<&Password>,
    ) -> Result<(), PasswordViolation> {
        if let Some(confirmation) = confirmation {
            if confirmation.expose() != password.expose() {
                return Err(PasswordViolation::ConfirmationMismatch);
            }
        }
        Self::check_strength(password.expose())
    }

    pub fn check_strength(password: &str) -> Result<(), PasswordViolation> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordViolation::TooShort);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordViolation::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordViolation::MissingLowercase);
        }
        if !password
            .chars()
            .any(|c| c.is_ascii_digit() || SPECIAL_CHARACTERS.contains(c))
        {
            return Err(PasswordViolation::MissingDigitOrSpecial);
        }
        Ok(())
    }
}
