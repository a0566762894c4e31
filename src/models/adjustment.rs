//! Employee adjustments: recurring or one-period earnings/deductions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an adjustment adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Added to earnings (allowance, bonus, correction).
    Earning,
    /// Added to deductions (penalty, recovery).
    Deduction,
}

/// An earning or deduction applied to an employee's payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAdjustment {
    /// Unique identifier for the adjustment.
    pub id: Uuid,
    /// The employee the adjustment applies to.
    pub employee_id: Uuid,
    /// Earning or deduction.
    pub kind: AdjustmentKind,
    /// Label shown on the payslip.
    pub label: String,
    /// Amount in pesos.
    pub amount: Decimal,
    /// Recurring adjustments apply to every period; one-time adjustments
    /// only to the period in `period_id`.
    pub recurring: bool,
    /// The single period a one-time adjustment targets.
    pub period_id: Option<Uuid>,
    /// Inactive adjustments are skipped.
    pub active: bool,
}

impl EmployeeAdjustment {
    /// Returns true if this adjustment applies to the given period.
    pub fn applies_to(&self, period_id: Uuid) -> bool {
        self.active && (self.recurring || self.period_id == Some(period_id))
    }
}
