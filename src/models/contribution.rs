//! Contribution output models.
//!
//! A missing contribution table is a valid business state, so every
//! component of a [`ContributionBreakdown`] is optional; partial results
//! are expected, not failures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The employee/employer split of one statutory contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionShare {
    /// The amount withheld from the employee.
    pub employee_share: Decimal,
    /// The amount shouldered by the employer.
    pub employer_share: Decimal,
    /// `employee_share + employer_share`.
    pub total: Decimal,
}

impl ContributionShare {
    /// Builds a share, deriving the total.
    pub fn new(employee_share: Decimal, employer_share: Decimal) -> Self {
        ContributionShare {
            employee_share,
            employer_share,
            total: employee_share + employer_share,
        }
    }
}

/// The combined statutory contribution result for one salary.
///
/// Each field is `None` when no table version is configured for the
/// effective date — that component alone is absent, the rest still compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    /// SSS contribution, if a table is configured.
    pub sss: Option<ContributionShare>,
    /// PhilHealth contribution, if a table is configured.
    pub philhealth: Option<ContributionShare>,
    /// Pag-IBIG contribution, if a table is configured.
    pub pagibig: Option<ContributionShare>,
    /// Withholding tax, if a table is configured.
    pub withholding_tax: Option<Decimal>,
}

impl ContributionBreakdown {
    /// Returns true when all four components resolved.
    pub fn has_all_tables(&self) -> bool {
        self.sss.is_some()
            && self.philhealth.is_some()
            && self.pagibig.is_some()
            && self.withholding_tax.is_some()
    }

    /// Sum of the three statutory employee shares (excludes withholding tax).
    pub fn total_employee_share(&self) -> Decimal {
        [self.sss, self.philhealth, self.pagibig]
            .iter()
            .flatten()
            .map(|s| s.employee_share)
            .sum()
    }

    /// Sum of the three statutory employer shares.
    pub fn total_employer_share(&self) -> Decimal {
        [self.sss, self.philhealth, self.pagibig]
            .iter()
            .flatten()
            .map(|s| s.employer_share)
            .sum()
    }
}
