//! Member module - company profile data attached to registered accounts.

mod employee_bracket;
mod record;

pub use employee_bracket::EmployeeBracket;
pub use record::{CompanyDetails, MemberRecord, UpsertOutcome};
