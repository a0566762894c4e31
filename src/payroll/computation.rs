//! Payroll entry computation.
//!
//! Pure assembly of one employee's entry for one period: the DTR aggregate
//! supplies minutes, adjustments and loans supply extra lines, and the
//! contribution breakdown supplies statutory deductions. The function is
//! deterministic — persistence, gating, and concurrency live in the engine.

use rust_decimal::Decimal;

use crate::calculation::PeriodSummary;
use crate::config::EngineSettings;
use crate::models::{
    ContributionBreakdown, DailyTimeRecord, DeductionLine, DeductionType, EarningLine,
    EarningType, Employee, EmployeeAdjustment, EmployeeLoan, AdjustmentKind, PayFrequency,
    PayrollEntry, PayrollPeriod,
};
use crate::money::{minute_rate, round_centavos};

/// Everything `build_entry` consumes, gathered by the orchestrating engine.
pub struct ComputationInputs<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The period being computed.
    pub period: &'a PayrollPeriod,
    /// Pay frequency of the owning cycle.
    pub frequency: PayFrequency,
    /// Aggregated DTR data for the cutoff range.
    pub summary: &'a PeriodSummary,
    /// The individual DTRs, for premium classification.
    pub dtrs: &'a [DailyTimeRecord],
    /// The employee's adjustments (filtered per period inside).
    pub adjustments: &'a [EmployeeAdjustment],
    /// The employee's loans.
    pub loans: &'a [EmployeeLoan],
    /// Statutory contributions for the employee's monthly rate, effective
    /// on the period's pay date.
    pub contributions: ContributionBreakdown,
    /// Engine settings.
    pub settings: &'a EngineSettings,
}

/// Divides a monthly amount across the cycle's periods.
fn per_period(monthly: Decimal, frequency: PayFrequency) -> Decimal {
    monthly / Decimal::from(frequency.periods_per_month())
}

/// Assembles the payroll entry for one (employee, period).
///
/// Earnings: basic pay for the cutoff, approved overtime at the configured
/// multiplier, rest-day/holiday premium from the stored day
/// classifications, then earning adjustments. Deductions: late/undertime
/// at the minute rate, statutory employee shares and withholding tax
/// prorated per period, loan installments, then deduction adjustments.
/// Every line amount is rounded to centavos; totals derive from the lines.
pub fn build_entry(inputs: &ComputationInputs<'_>) -> PayrollEntry {
    let rate = minute_rate(inputs.employee.monthly_rate, inputs.settings.monthly_rate_divisor);
    let mut earnings = Vec::new();
    let mut deductions = Vec::new();

    earnings.push(EarningLine {
        earning_type: EarningType::Basic,
        label: "Basic pay".to_string(),
        amount: round_centavos(per_period(inputs.employee.monthly_rate, inputs.frequency)),
    });

    let approved_overtime = inputs.summary.approved_overtime_minutes;
    if approved_overtime > 0 {
        earnings.push(EarningLine {
            earning_type: EarningType::Overtime,
            label: format!("Overtime ({approved_overtime} min)"),
            amount: round_centavos(
                rate * Decimal::from(approved_overtime) * inputs.settings.overtime_multiplier,
            ),
        });
    }

    // Premium portion of non-ordinary worked days; the base portion is
    // already inside basic pay for monthly-paid employees.
    let premium: Decimal = inputs
        .dtrs
        .iter()
        .filter(|d| d.worked_minutes > 0)
        .map(|d| {
            let multiplier = d.classification.pay_multiplier() - Decimal::ONE;
            rate * Decimal::from(d.worked_minutes) * multiplier
        })
        .sum();
    if premium > Decimal::ZERO {
        earnings.push(EarningLine {
            earning_type: EarningType::HolidayPremium,
            label: "Rest day / holiday premium".to_string(),
            amount: round_centavos(premium),
        });
    }

    let tardy_minutes = inputs.summary.late_minutes + inputs.summary.undertime_minutes;
    if tardy_minutes > 0 {
        deductions.push(DeductionLine {
            deduction_type: DeductionType::Tardiness,
            label: format!("Late/undertime ({tardy_minutes} min)"),
            amount: round_centavos(rate * Decimal::from(tardy_minutes)),
        });
    }

    let statutory = [
        (DeductionType::Sss, "SSS", inputs.contributions.sss),
        (
            DeductionType::Philhealth,
            "PhilHealth",
            inputs.contributions.philhealth,
        ),
        (DeductionType::Pagibig, "Pag-IBIG", inputs.contributions.pagibig),
    ];
    for (deduction_type, label, share) in statutory {
        if let Some(share) = share {
            deductions.push(DeductionLine {
                deduction_type,
                label: label.to_string(),
                amount: round_centavos(per_period(share.employee_share, inputs.frequency)),
            });
        }
    }
    if let Some(tax) = inputs.contributions.withholding_tax {
        deductions.push(DeductionLine {
            deduction_type: DeductionType::WithholdingTax,
            label: "Withholding tax".to_string(),
            amount: round_centavos(per_period(tax, inputs.frequency)),
        });
    }

    for loan in inputs.loans {
        let due = loan.installment_due();
        if due > Decimal::ZERO {
            deductions.push(DeductionLine {
                deduction_type: DeductionType::Loan,
                label: loan.label.clone(),
                amount: round_centavos(due),
            });
        }
    }

    for adjustment in inputs
        .adjustments
        .iter()
        .filter(|a| a.applies_to(inputs.period.id))
    {
        match adjustment.kind {
            AdjustmentKind::Earning => earnings.push(EarningLine {
                earning_type: EarningType::Adjustment,
                label: adjustment.label.clone(),
                amount: round_centavos(adjustment.amount),
            }),
            AdjustmentKind::Deduction => deductions.push(DeductionLine {
                deduction_type: DeductionType::Adjustment,
                label: adjustment.label.clone(),
                amount: round_centavos(adjustment.amount),
            }),
        }
    }

    PayrollEntry::from_lines(inputs.employee.id, inputs.period.id, earnings, deductions)
}
