//! Membership pricing.
//!
//! Two independent price sources exist: the flat schedule that decides the
//! persisted payment amount, and the tiered calculator shown to prospective
//! members. They are not reconciled; callers compare them and flag mismatches.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::{Money, GBP};
use crate::domain::member::EmployeeBracket;

use super::PaymentMethod;

/// Flat prices keyed by payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSchedule {
    pub direct_debit: Money,
    pub standard: Money,
    /// Fixed amount requested from the processor for card payments.
    pub card_intent: Money,
}

impl PriceSchedule {
    pub fn new(
        direct_debit_minor: i64,
        standard_minor: i64,
        card_intent_minor: i64,
        currency: &str,
    ) -> Self {
        Self {
            direct_debit: Money::new(direct_debit_minor, currency),
            standard: Money::new(standard_minor, currency),
            card_intent: Money::new(card_intent_minor, currency),
        }
    }

    /// Amount persisted for a registration paying with `method`.
    pub fn price_for(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::DirectDebit => self.direct_debit.clone(),
            PaymentMethod::Card => self.standard.clone(),
        }
    }
}

impl Default for PriceSchedule {
    fn default() -> Self {
        Self::new(66_600, 73_200, 73_200, GBP)
    }
}

/// Annual fee and one-off registration fee for a bracket, in major units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub annual_major: i64,
    pub registration_major: i64,
}

static DEFAULT_TIERS: Lazy<HashMap<EmployeeBracket, Tier>> = Lazy::new(|| {
    HashMap::from([
        (
            EmployeeBracket::UpToTwo,
            Tier {
                annual_major: 560,
                registration_major: 50,
            },
        ),
        (
            EmployeeBracket::ThreeToTwelve,
            Tier {
                annual_major: 720,
                registration_major: 50,
            },
        ),
        (
            EmployeeBracket::ThirteenToFifty,
            Tier {
                annual_major: 960,
                registration_major: 50,
            },
        ),
        (
            EmployeeBracket::FiftyOneToHundred,
            Tier {
                annual_major: 1440,
                registration_major: 100,
            },
        ),
    ])
});

/// A VAT-inclusive price breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub bracket: EmployeeBracket,
    pub annual: Money,
    pub registration: Money,
    pub subtotal: Money,
    pub vat: Money,
    pub total: Money,
}

/// Tiered calculator: annual fee plus registration fee, plus VAT.
#[derive(Debug, Clone)]
pub struct TieredPricing {
    tiers: HashMap<EmployeeBracket, Tier>,
    vat_percent: u32,
    currency: String,
}

impl TieredPricing {
    pub fn new(
        tiers: HashMap<EmployeeBracket, Tier>,
        vat_percent: u32,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            tiers,
            vat_percent,
            currency: currency.into(),
        }
    }

    /// Default tiers with the given VAT rate and currency.
    pub fn standard(vat_percent: u32, currency: impl Into<String>) -> Self {
        Self::new(DEFAULT_TIERS.clone(), vat_percent, currency)
    }

    pub fn vat_percent(&self) -> u32 {
        self.vat_percent
    }

    /// Quote for a bracket. Larger companies are priced individually and get `None`.
    pub fn quote(&self, bracket: EmployeeBracket) -> Option<PriceQuote> {
        let tier = self.tiers.get(&bracket)?;
        let annual = Money::from_major(tier.annual_major, self.currency.as_str());
        let registration = Money::from_major(tier.registration_major, self.currency.as_str());
        let subtotal = annual.checked_add(&registration)?;
        let vat = subtotal.percentage_of(self.vat_percent);
        let total = subtotal.checked_add(&vat)?;

        Some(PriceQuote {
            bracket,
            annual,
            registration,
            subtotal,
            vat,
            total,
        })
    }
}

impl Default for TieredPricing {
    fn default() -> Self {
        Self::standard(20, GBP)
    }
}

/// Describes a difference between the persisted flat amount and the tiered quote.
///
/// Returns `None` when the amounts agree.
pub fn pricing_notice(charged: &Money, quote: &PriceQuote) -> Option<String> {
    if charged == &quote.total {
        return None;
    }
    Some(format!(
        "Pricing notice: charged {} but the tiered price for {} is {} (incl. VAT {})",
        charged,
        quote.bracket.label(),
        quote.total,
        quote.vat
    ))
}
