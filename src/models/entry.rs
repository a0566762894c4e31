//! Payroll entry model, line items, and the entry status state machine.
//!
//! An entry is unique per (employee, period). Its `net = gross - deductions`
//! invariant is enforced at construction: totals are always derived from the
//! line items, never set independently.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::money::round_centavos;

/// Lifecycle status of a payroll entry.
///
/// Send-back transitions (`Reviewed -> Computed`, `Approved -> Reviewed`)
/// let HR return an entry one step; `Cancelled` is reachable from any
/// non-terminal state; `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Freshly computed, awaiting review.
    Computed,
    /// Checked by HR.
    Reviewed,
    /// Approved for payment.
    Approved,
    /// Paid out.
    Paid,
    /// Withdrawn from the run.
    Cancelled,
}

impl EntryStatus {
    /// The statuses reachable from this one.
    pub fn allowed_transitions(&self) -> &'static [EntryStatus] {
        match self {
            EntryStatus::Computed => &[EntryStatus::Reviewed, EntryStatus::Cancelled],
            EntryStatus::Reviewed => &[
                EntryStatus::Approved,
                EntryStatus::Computed,
                EntryStatus::Cancelled,
            ],
            EntryStatus::Approved => &[
                EntryStatus::Paid,
                EntryStatus::Reviewed,
                EntryStatus::Cancelled,
            ],
            EntryStatus::Paid => &[],
            EntryStatus::Cancelled => &[],
        }
    }

    /// Returns true if a direct transition to `target` is legal.
    pub fn can_transition_to(&self, target: EntryStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Returns true if no transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntryStatus::Computed => "computed",
            EntryStatus::Reviewed => "reviewed",
            EntryStatus::Approved => "approved",
            EntryStatus::Paid => "paid",
            EntryStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// The kind of an earnings line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningType {
    /// Basic pay for the cutoff.
    Basic,
    /// Approved overtime pay.
    Overtime,
    /// Premium for work on rest days and holidays.
    HolidayPremium,
    /// An earning adjustment (allowance, bonus, correction).
    Adjustment,
}

/// The kind of a deduction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// Late and undertime minutes valued at the minute rate.
    Tardiness,
    /// SSS employee share.
    Sss,
    /// PhilHealth employee share.
    Philhealth,
    /// Pag-IBIG employee share.
    Pagibig,
    /// Withholding tax.
    WithholdingTax,
    /// A loan installment.
    Loan,
    /// A deduction adjustment.
    Adjustment,
}

/// A single earnings line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningLine {
    /// The kind of earning.
    pub earning_type: EarningType,
    /// Label shown on the payslip.
    pub label: String,
    /// Amount in pesos, rounded to centavos.
    pub amount: Decimal,
}

/// A single deduction line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    /// The kind of deduction.
    pub deduction_type: DeductionType,
    /// Label shown on the payslip.
    pub label: String,
    /// Amount in pesos, rounded to centavos.
    pub amount: Decimal,
}

/// One employee's payroll for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The employee the entry belongs to.
    pub employee_id: Uuid,
    /// The period the entry belongs to.
    pub period_id: Uuid,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Earnings line items.
    pub earnings: Vec<EarningLine>,
    /// Deduction line items.
    pub deductions: Vec<DeductionLine>,
    /// Sum of earnings.
    pub gross_pay: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// `gross_pay - total_deductions`.
    pub net_pay: Decimal,
}

impl PayrollEntry {
    /// Builds an entry in [`EntryStatus::Computed`] from its line items,
    /// deriving the totals so `net = gross - deductions` holds by
    /// construction.
    pub fn from_lines(
        employee_id: Uuid,
        period_id: Uuid,
        earnings: Vec<EarningLine>,
        deductions: Vec<DeductionLine>,
    ) -> Self {
        let gross_pay = round_centavos(earnings.iter().map(|l| l.amount).sum());
        let total_deductions = round_centavos(deductions.iter().map(|l| l.amount).sum());
        PayrollEntry {
            id: Uuid::new_v4(),
            employee_id,
            period_id,
            status: EntryStatus::Computed,
            earnings,
            deductions,
            gross_pay,
            total_deductions,
            net_pay: gross_pay - total_deductions,
        }
    }

    /// Returns true if a direct transition to `target` is legal.
    pub fn can_transition_to(&self, target: EntryStatus) -> bool {
        self.status.can_transition_to(target)
    }

    /// Moves the entry to `target`, or rejects the transition.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidEntryTransition`] when `target` is not
    /// reachable from the current status.
    pub fn transition_to(&mut self, target: EntryStatus) -> EngineResult<()> {
        if !self.can_transition_to(target) {
            return Err(EngineError::InvalidEntryTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}
