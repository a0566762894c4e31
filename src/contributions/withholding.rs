//! Withholding tax brackets.
//!
//! Unlike the share-based tables, a withholding bracket defines a base
//! amount plus a marginal rate applied to the excess of the taxable pay
//! over the bracket floor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::round_centavos;

use super::table::SalaryBracket;

/// One withholding tax bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower bound of taxable pay.
    pub lower: Decimal,
    /// Exclusive upper bound; `None` when open-ended.
    pub upper: Option<Decimal>,
    /// Tax due at the bracket floor.
    pub base_tax: Decimal,
    /// Marginal rate applied to the excess over the floor, as a fraction.
    pub rate_over_excess: Decimal,
}

impl SalaryBracket for TaxBracket {
    fn lower(&self) -> Decimal {
        self.lower
    }

    fn upper(&self) -> Option<Decimal> {
        self.upper
    }
}

impl TaxBracket {
    /// Tax due for a taxable pay within this bracket, rounded to centavos.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::contributions::TaxBracket;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let bracket = TaxBracket {
    ///     lower: Decimal::from_str("10417").unwrap(),
    ///     upper: Some(Decimal::from_str("16666").unwrap()),
    ///     base_tax: Decimal::ZERO,
    ///     rate_over_excess: Decimal::from_str("0.15").unwrap(),
    /// };
    /// let tax = bracket.tax_due(Decimal::from_str("12000").unwrap());
    /// assert_eq!(tax, Decimal::from_str("237.45").unwrap());
    /// ```
    pub fn tax_due(&self, taxable: Decimal) -> Decimal {
        round_centavos(self.base_tax + (taxable - self.lower) * self.rate_over_excess)
    }
}
