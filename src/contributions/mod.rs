//! Statutory contribution tables and calculators.
//!
//! The generic versioned-bracket lookup in [`table`] is shared by the four
//! contribution types: SSS, PhilHealth and Pag-IBIG resolve to an
//! employee/employer [`ContributionShare`](crate::models::ContributionShare)
//! through [`ShareBracket`]s, while withholding tax resolves through
//! [`TaxBracket`]s carrying a base amount plus a marginal rate.

mod calculator;
mod table;
mod withholding;

pub use calculator::{ContributionCalculator, ContributionTables};
pub use table::{SalaryBracket, ShareBracket, ShareRule, TableSet, TableVersion};
pub use withholding::TaxBracket;
