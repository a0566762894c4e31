//! The combined contribution calculator.
//!
//! Orchestrates the four statutory lookups against one salary and effective
//! date. Each lookup is independent: a missing table for one type leaves
//! that component absent and the rest still compute.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{ContributionBreakdown, ContributionShare};

use super::table::{ShareBracket, TableSet};
use super::withholding::TaxBracket;

/// The configured contribution tables for one tenant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionTables {
    /// SSS table versions.
    pub sss: TableSet<ShareBracket>,
    /// PhilHealth table versions.
    pub philhealth: TableSet<ShareBracket>,
    /// Pag-IBIG table versions.
    pub pagibig: TableSet<ShareBracket>,
    /// Withholding tax table versions.
    pub withholding: TableSet<TaxBracket>,
}

impl ContributionTables {
    /// Returns true when every contribution type has a version effective on
    /// `date`.
    pub fn has_all_tables(&self, date: NaiveDate) -> bool {
        self.sss.version_for(date).is_some()
            && self.philhealth.version_for(date).is_some()
            && self.pagibig.version_for(date).is_some()
            && self.withholding.version_for(date).is_some()
    }

    /// Validates bracket coverage of every version of every type.
    pub fn validate(&self) -> EngineResult<()> {
        self.sss.validate("sss")?;
        self.philhealth.validate("philhealth")?;
        self.pagibig.validate("pagibig")?;
        self.withholding.validate("withholding_tax")?;
        Ok(())
    }
}

/// Computes statutory contributions from configured tables.
#[derive(Debug, Clone, Copy)]
pub struct ContributionCalculator;

impl ContributionCalculator {
    /// Resolves one share-based contribution, or `None` when no table
    /// version is effective on the date.
    fn share_for(
        tables: &TableSet<ShareBracket>,
        salary: Decimal,
        date: NaiveDate,
    ) -> Option<ContributionShare> {
        tables
            .version_for(date)?
            .bracket_for(salary)
            .map(|bracket| bracket.compute(salary))
    }

    /// Calculates all four statutory contributions for a monthly salary.
    ///
    /// `effective_date` defaults to today when omitted. Withholding tax is
    /// computed on the salary net of the three statutory employee shares.
    /// Partial results are valid: a missing table yields `None` for that
    /// component only.
    pub fn calculate_all(
        tables: &ContributionTables,
        salary: Decimal,
        effective_date: Option<NaiveDate>,
    ) -> ContributionBreakdown {
        let date = effective_date.unwrap_or_else(|| Utc::now().date_naive());

        let sss = Self::share_for(&tables.sss, salary, date);
        let philhealth = Self::share_for(&tables.philhealth, salary, date);
        let pagibig = Self::share_for(&tables.pagibig, salary, date);

        let statutory_employee_share = [sss, philhealth, pagibig]
            .iter()
            .flatten()
            .map(|s| s.employee_share)
            .sum::<Decimal>();
        let taxable = salary - statutory_employee_share;

        let withholding_tax = tables
            .withholding
            .version_for(date)
            .and_then(|v| v.bracket_for(taxable))
            .map(|bracket| bracket.tax_due(taxable));

        debug!(
            %salary,
            %date,
            sss_configured = sss.is_some(),
            philhealth_configured = philhealth.is_some(),
            pagibig_configured = pagibig.is_some(),
            withholding_configured = withholding_tax.is_some(),
            "Contribution breakdown computed"
        );

        ContributionBreakdown {
            sss,
            philhealth,
            pagibig,
            withholding_tax,
        }
    }
}
