//! Money value object stored in minor currency units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default settlement currency.
pub const GBP: &str = "GBP";

/// An amount of money in minor units (pence for GBP).
///
/// Amounts never pass through floating point; tax and pricing arithmetic
/// happens on the integer minor-unit value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount_minor: i64,
    currency: String,
}

impl Money {
    /// Creates an amount in the given ISO 4217 currency.
    pub fn new(amount_minor: i64, currency: impl Into<String>) -> Self {
        Self {
            amount_minor,
            currency: currency.into().to_uppercase(),
        }
    }

    /// Creates an amount in pounds sterling.
    pub fn gbp(amount_minor: i64) -> Self {
        Self::new(amount_minor, GBP)
    }

    /// Creates an amount from whole major units (e.g. 560 pounds).
    pub fn from_major(major: i64, currency: impl Into<String>) -> Self {
        Self::new(major * 100, currency)
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Lower-case currency code as Stripe expects it.
    pub fn currency_lowercase(&self) -> String {
        self.currency.to_lowercase()
    }

    /// Renders the amount as a decimal string, e.g. `666.00`.
    pub fn major_units_string(&self) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Adds two amounts of the same currency.
    ///
    /// Returns `None` when currencies differ.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_minor + other.amount_minor,
            self.currency.clone(),
        ))
    }

    /// Returns `percent`% of this amount, rounded half away from zero.
    pub fn percentage_of(&self, percent: u32) -> Money {
        let scaled = self.amount_minor * i64::from(percent);
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Money::new(rounded, self.currency.clone())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.major_units_string(), self.currency)
    }
}
