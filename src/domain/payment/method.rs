//! Payment method selected in the final registration step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the member intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment collected in-browser through the processor.
    Card,
    /// Offline direct debit, priced at the discounted rate.
    DirectDebit,
}

impl PaymentMethod {
    /// Maps a raw selection onto a method.
    ///
    /// Only `direct_debit` selects the discounted route; every other non-empty
    /// value is charged as a card payment at the standard price.
    pub fn from_selection(selection: &str) -> Self {
        if selection.trim() == "direct_debit" {
            PaymentMethod::DirectDebit
        } else {
            PaymentMethod::Card
        }
    }

    /// True when `selection` names a method exactly.
    pub fn is_recognised(selection: &str) -> bool {
        selection.trim().parse::<PaymentMethod>().is_ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::DirectDebit => "direct_debit",
        }
    }

    /// Card payments go through the processor's hosted UI.
    pub fn requires_processor(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "direct_debit" => Ok(PaymentMethod::DirectDebit),
            other => Err(format!("unknown payment method '{}'", other)),
        }
    }
}
