//! Payroll period model and its status state machine.
//!
//! Periods move through an ordered lifecycle. Editability and deletability
//! are pure functions of status, and the transition table is the single
//! authority on which moves are legal — callers receive an explicit
//! rejection, never a silent no-op, for anything else.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Lifecycle status of a payroll period.
///
/// The only backward transition is `Processing -> Open`, which aborts a
/// computation run before the period is closed. `Locked` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Cutoff dates still being set up; the period may be deleted.
    Draft,
    /// Accepting DTR data; attributes editable.
    Open,
    /// Entry computation in progress.
    Processing,
    /// Computation complete; entries under review.
    Closed,
    /// Permanently sealed.
    Locked,
}

impl PeriodStatus {
    /// The statuses reachable from this one.
    pub fn allowed_transitions(&self) -> &'static [PeriodStatus] {
        match self {
            PeriodStatus::Draft => &[PeriodStatus::Open],
            PeriodStatus::Open => &[PeriodStatus::Processing],
            PeriodStatus::Processing => &[PeriodStatus::Closed, PeriodStatus::Open],
            PeriodStatus::Closed => &[PeriodStatus::Locked],
            PeriodStatus::Locked => &[],
        }
    }

    /// Returns true if a direct transition to `target` is legal.
    pub fn can_transition_to(&self, target: PeriodStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Periods are editable while Draft or Open.
    pub fn is_editable(&self) -> bool {
        matches!(self, PeriodStatus::Draft | PeriodStatus::Open)
    }

    /// Periods are deletable only while Draft.
    pub fn is_deletable(&self) -> bool {
        matches!(self, PeriodStatus::Draft)
    }

    /// Returns true if entry computation may run under this status.
    pub fn allows_computation(&self) -> bool {
        matches!(self, PeriodStatus::Open | PeriodStatus::Processing)
    }

    /// Returns true if no transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PeriodStatus::Draft => "draft",
            PeriodStatus::Open => "open",
            PeriodStatus::Processing => "processing",
            PeriodStatus::Closed => "closed",
            PeriodStatus::Locked => "locked",
        };
        f.write_str(label)
    }
}

/// How often a payroll cycle pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// One period per month.
    Monthly,
    /// Two periods per month (1-15 and 16-end).
    SemiMonthly,
}

impl PayFrequency {
    /// Number of payroll periods per month.
    pub fn periods_per_month(&self) -> u32 {
        match self {
            PayFrequency::Monthly => 1,
            PayFrequency::SemiMonthly => 2,
        }
    }
}

/// A payroll cycle: the cutoff rules periods are generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCycle {
    /// Unique identifier for the cycle.
    pub id: Uuid,
    /// Display name (e.g., "Rank and File Semi-Monthly").
    pub name: String,
    /// Pay frequency.
    pub frequency: PayFrequency,
}

/// A payroll period: one attendance cutoff window with a pay date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Unique identifier for the period.
    pub id: Uuid,
    /// The cycle this period was generated from.
    pub cycle_id: Uuid,
    /// First date of the attendance cutoff (inclusive).
    pub cutoff_start: NaiveDate,
    /// Last date of the attendance cutoff (inclusive).
    pub cutoff_end: NaiveDate,
    /// The date salaries are released.
    pub pay_date: NaiveDate,
    /// Lifecycle status.
    pub status: PeriodStatus,
}

impl PayrollPeriod {
    /// Checks if a date falls within the cutoff window (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.cutoff_start && date <= self.cutoff_end
    }

    /// Delegates to [`PeriodStatus::is_editable`].
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Delegates to [`PeriodStatus::is_deletable`].
    pub fn is_deletable(&self) -> bool {
        self.status.is_deletable()
    }

    /// Moves the period to `target`, or rejects the transition.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPeriodTransition`] when `target` is not
    /// reachable from the current status.
    pub fn transition_to(&mut self, target: PeriodStatus) -> EngineResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(EngineError::InvalidPeriodTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}

/// Returns the last day of the given month.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .expect("month arithmetic stays in range")
}

/// Generates the payroll periods of one calendar month from a cycle's
/// cutoff rules. Generated periods start in [`PeriodStatus::Draft`].
///
/// Semi-monthly cutoffs run 1-15 (paid on the 20th) and 16-end (paid on the
/// 5th of the following month); monthly cutoffs cover the full month, paid
/// on its last day.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{generate_periods, PayFrequency, PayrollCycle};
/// use uuid::Uuid;
///
/// let cycle = PayrollCycle {
///     id: Uuid::from_u128(1),
///     name: "Semi-Monthly".to_string(),
///     frequency: PayFrequency::SemiMonthly,
/// };
/// let periods = generate_periods(&cycle, 2025, 2);
/// assert_eq!(periods.len(), 2);
/// assert_eq!(periods[1].cutoff_end.to_string(), "2025-02-28");
/// ```
pub fn generate_periods(cycle: &PayrollCycle, year: i32, month: u32) -> Vec<PayrollPeriod> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let last = last_day_of_month(year, month);

    match cycle.frequency {
        PayFrequency::Monthly => vec![PayrollPeriod {
            id: Uuid::new_v4(),
            cycle_id: cycle.id,
            cutoff_start: first,
            cutoff_end: last,
            pay_date: last,
            status: PeriodStatus::Draft,
        }],
        PayFrequency::SemiMonthly => {
            let mid = NaiveDate::from_ymd_opt(year, month, 15).expect("valid month");
            let next_month_fifth = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 5)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 5)
            }
            .expect("valid month");
            vec![
                PayrollPeriod {
                    id: Uuid::new_v4(),
                    cycle_id: cycle.id,
                    cutoff_start: first,
                    cutoff_end: mid,
                    pay_date: NaiveDate::from_ymd_opt(year, month, 20).expect("valid month"),
                    status: PeriodStatus::Draft,
                },
                PayrollPeriod {
                    id: Uuid::new_v4(),
                    cycle_id: cycle.id,
                    cutoff_start: mid.succ_opt().expect("mid-month has a successor"),
                    cutoff_end: last,
                    pay_date: next_month_fifth,
                    status: PeriodStatus::Draft,
                },
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period_with_status(status: PeriodStatus) -> PayrollPeriod {
        PayrollPeriod {
            id: Uuid::from_u128(1),
            cycle_id: Uuid::from_u128(2),
            cutoff_start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            cutoff_end: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            pay_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            status,
        }
    }

    /// PS-001: the forward path is legal step by step
    #[test]
    fn test_forward_path() {
        let mut period = period_with_status(PeriodStatus::Draft);
        period.transition_to(PeriodStatus::Open).unwrap();
        period.transition_to(PeriodStatus::Processing).unwrap();
        period.transition_to(PeriodStatus::Closed).unwrap();
        period.transition_to(PeriodStatus::Locked).unwrap();
        assert_eq!(period.status, PeriodStatus::Locked);
    }

    /// PS-002: Draft cannot jump straight to Locked
    #[test]
    fn test_draft_cannot_skip_to_locked() {
        let mut period = period_with_status(PeriodStatus::Draft);
        let err = period.transition_to(PeriodStatus::Locked).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid period transition from draft to locked"
        );
        assert_eq!(period.status, PeriodStatus::Draft);
    }

    /// PS-003: Locked is terminal
    #[test]
    fn test_locked_is_terminal() {
        let mut period = period_with_status(PeriodStatus::Locked);
        assert!(PeriodStatus::Locked.is_terminal());
        assert!(period.transition_to(PeriodStatus::Open).is_err());
        assert!(period.transition_to(PeriodStatus::Draft).is_err());
    }

    /// PS-004: Processing may fall back to Open
    #[test]
    fn test_processing_reopens() {
        let mut period = period_with_status(PeriodStatus::Processing);
        period.transition_to(PeriodStatus::Open).unwrap();
        assert_eq!(period.status, PeriodStatus::Open);
    }

    /// PS-005: editability and deletability are pure functions of status
    #[test]
    fn test_editable_and_deletable_predicates() {
        assert!(PeriodStatus::Draft.is_editable());
        assert!(PeriodStatus::Open.is_editable());
        assert!(!PeriodStatus::Processing.is_editable());
        assert!(!PeriodStatus::Closed.is_editable());
        assert!(!PeriodStatus::Locked.is_editable());

        assert!(PeriodStatus::Draft.is_deletable());
        assert!(!PeriodStatus::Open.is_deletable());
        assert!(!PeriodStatus::Locked.is_deletable());
    }

    /// PS-006: computation gate
    #[test]
    fn test_allows_computation() {
        assert!(!PeriodStatus::Draft.allows_computation());
        assert!(PeriodStatus::Open.allows_computation());
        assert!(PeriodStatus::Processing.allows_computation());
        assert!(!PeriodStatus::Closed.allows_computation());
        assert!(!PeriodStatus::Locked.allows_computation());
    }

    /// PS-007: every status transitions only to listed targets
    #[test]
    fn test_transition_table_is_exhaustive() {
        let all = [
            PeriodStatus::Draft,
            PeriodStatus::Open,
            PeriodStatus::Processing,
            PeriodStatus::Closed,
            PeriodStatus::Locked,
        ];
        for from in all {
            for to in all {
                let allowed = from.allowed_transitions().contains(&to);
                assert_eq!(from.can_transition_to(to), allowed);
            }
        }
    }

    #[test]
    fn test_generate_semi_monthly_periods() {
        let cycle = PayrollCycle {
            id: Uuid::from_u128(1),
            name: "Semi-Monthly".to_string(),
            frequency: PayFrequency::SemiMonthly,
        };
        let periods = generate_periods(&cycle, 2025, 3);
        assert_eq!(periods.len(), 2);

        assert_eq!(
            periods[0].cutoff_start,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(
            periods[0].cutoff_end,
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert_eq!(
            periods[0].pay_date,
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
        );

        assert_eq!(
            periods[1].cutoff_start,
            NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()
        );
        assert_eq!(
            periods[1].cutoff_end,
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
        assert_eq!(
            periods[1].pay_date,
            NaiveDate::from_ymd_opt(2025, 4, 5).unwrap()
        );
        assert_eq!(periods[1].status, PeriodStatus::Draft);
    }

    #[test]
    fn test_generate_monthly_period_december() {
        let cycle = PayrollCycle {
            id: Uuid::from_u128(1),
            name: "Monthly".to_string(),
            frequency: PayFrequency::Monthly,
        };
        let periods = generate_periods(&cycle, 2025, 12);
        assert_eq!(periods.len(), 1);
        assert_eq!(
            periods[0].cutoff_end,
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_contains_date_inclusive_bounds() {
        let period = period_with_status(PeriodStatus::Open);
        assert!(period.contains_date(period.cutoff_start));
        assert!(period.contains_date(period.cutoff_end));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()));
    }
}
