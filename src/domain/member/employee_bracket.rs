//! Company size brackets offered on the registration form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Employee-count bracket selected in the company step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeBracket {
    #[serde(rename = "1-2")]
    UpToTwo,
    #[serde(rename = "3-12")]
    ThreeToTwelve,
    #[serde(rename = "13-50")]
    ThirteenToFifty,
    #[serde(rename = "51-100")]
    FiftyOneToHundred,
    #[serde(rename = "101-250")]
    HundredOneToTwoFifty,
    #[serde(rename = "251-500")]
    TwoFiftyOneToFiveHundred,
    #[serde(rename = "501-1000")]
    FiveHundredOneToThousand,
    #[serde(rename = "1001+")]
    OverThousand,
}

impl EmployeeBracket {
    /// All brackets in display order.
    pub const ALL: [EmployeeBracket; 8] = [
        EmployeeBracket::UpToTwo,
        EmployeeBracket::ThreeToTwelve,
        EmployeeBracket::ThirteenToFifty,
        EmployeeBracket::FiftyOneToHundred,
        EmployeeBracket::HundredOneToTwoFifty,
        EmployeeBracket::TwoFiftyOneToFiveHundred,
        EmployeeBracket::FiveHundredOneToThousand,
        EmployeeBracket::OverThousand,
    ];

    /// Form value for this bracket.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeBracket::UpToTwo => "1-2",
            EmployeeBracket::ThreeToTwelve => "3-12",
            EmployeeBracket::ThirteenToFifty => "13-50",
            EmployeeBracket::FiftyOneToHundred => "51-100",
            EmployeeBracket::HundredOneToTwoFifty => "101-250",
            EmployeeBracket::TwoFiftyOneToFiveHundred => "251-500",
            EmployeeBracket::FiveHundredOneToThousand => "501-1000",
            EmployeeBracket::OverThousand => "1001+",
        }
    }

    /// Human-readable label shown next to the option.
    pub fn label(&self) -> &'static str {
        match self {
            EmployeeBracket::UpToTwo => "Premier Plus / 1-2 employees",
            EmployeeBracket::ThreeToTwelve => "3-12 employees",
            EmployeeBracket::ThirteenToFifty => "13-50 employees",
            EmployeeBracket::FiftyOneToHundred => "51-100 employees",
            EmployeeBracket::HundredOneToTwoFifty => "101-250 employees",
            EmployeeBracket::TwoFiftyOneToFiveHundred => "251-500 employees",
            EmployeeBracket::FiveHundredOneToThousand => "501-1000 employees",
            EmployeeBracket::OverThousand => "1001+ employees",
        }
    }
}

impl fmt::Display for EmployeeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeBracket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EmployeeBracket::ALL
            .iter()
            .copied()
            .find(|bracket| bracket.as_str() == trimmed)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "employee_count",
                    format!("unknown employee bracket '{}'", trimmed),
                )
            })
    }
}
