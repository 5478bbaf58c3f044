//! QuoteMembershipPriceHandler - Query handler for the pricing calculator.

use serde::Serialize;

use crate::domain::member::EmployeeBracket;
use crate::domain::payment::{PriceQuote, TieredPricing};
use crate::domain::registration::RegistrationError;

#[derive(Debug, Clone)]
pub struct QuoteMembershipPriceQuery {
    pub employee_count: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteMembershipPriceResult {
    pub employee_count: EmployeeBracket,
    pub label: &'static str,
    pub vat_percent: u32,
    /// `None` for brackets priced on request.
    pub quote: Option<PriceQuote>,
}

pub struct QuoteMembershipPriceHandler {
    pricing: TieredPricing,
}

impl QuoteMembershipPriceHandler {
    pub fn new(pricing: TieredPricing) -> Self {
        Self { pricing }
    }

    pub fn handle(
        &self,
        query: QuoteMembershipPriceQuery,
    ) -> Result<QuoteMembershipPriceResult, RegistrationError> {
        let bracket: EmployeeBracket = query.employee_count.parse().map_err(|_| {
            RegistrationError::invalid_field("employee_count", "Please select a valid company size")
        })?;

        Ok(QuoteMembershipPriceResult {
            employee_count: bracket,
            label: bracket.label(),
            vat_percent: self.pricing.vat_percent(),
            quote: self.pricing.quote(bracket),
        })
    }
}
