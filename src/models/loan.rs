//! Employee loan model with per-period installment deduction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A loan being repaid through payroll deductions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLoan {
    /// Unique identifier for the loan.
    pub id: Uuid,
    /// The borrowing employee.
    pub employee_id: Uuid,
    /// Label shown on the payslip (e.g., "SSS Salary Loan").
    pub label: String,
    /// Original loan amount.
    pub principal: Decimal,
    /// Amount deducted per payroll period.
    pub installment: Decimal,
    /// Remaining balance.
    pub balance: Decimal,
    /// Inactive loans are skipped.
    pub active: bool,
}

impl EmployeeLoan {
    /// The deduction for the current period: the installment, capped at the
    /// remaining balance. Zero when the loan is inactive or fully repaid.
    pub fn installment_due(&self) -> Decimal {
        if !self.active || self.balance <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.installment.min(self.balance)
    }

    /// Applies a deducted amount against the balance, deactivating the loan
    /// once fully repaid.
    pub fn apply_installment(&mut self, amount: Decimal) {
        self.balance -= amount;
        if self.balance <= Decimal::ZERO {
            self.balance = Decimal::ZERO;
            self.active = false;
        }
    }
}
