//! Period aggregation of daily time records.
//!
//! A summary is always computable: dates with no DTR are omitted from the
//! sums and reported in `missing_dates` rather than failing the roll-up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::DailyTimeRecord;

/// Aggregated attendance for one employee over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// The employee summarized.
    pub employee_id: Uuid,
    /// First date of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the range (inclusive).
    pub end_date: NaiveDate,
    /// Number of DTRs present in the range.
    pub record_count: usize,
    /// Total worked minutes.
    pub worked_minutes: i64,
    /// Total late minutes.
    pub late_minutes: i64,
    /// Total undertime minutes.
    pub undertime_minutes: i64,
    /// Total overtime minutes, approved or not.
    pub overtime_minutes: i64,
    /// Overtime minutes approved for pay.
    pub approved_overtime_minutes: i64,
    /// Overtime minutes still awaiting approval.
    pub pending_overtime_minutes: i64,
    /// Number of records flagged for review.
    pub needs_review_count: usize,
    /// Number of days spent on approved leave.
    pub leave_days: usize,
    /// Dates in the range with no DTR at all.
    pub missing_dates: Vec<NaiveDate>,
}

/// Rolls up the DTRs of one employee across a date range.
///
/// Records outside the range or belonging to other employees are ignored.
/// Gaps never fail the summary; they are reported in `missing_dates`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::summarize_period;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// let summary = summarize_period(Uuid::from_u128(1), start, end, &[]);
/// assert_eq!(summary.record_count, 0);
/// assert_eq!(summary.missing_dates.len(), 15);
/// ```
pub fn summarize_period(
    employee_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    dtrs: &[DailyTimeRecord],
) -> PeriodSummary {
    let in_range: Vec<&DailyTimeRecord> = dtrs
        .iter()
        .filter(|d| d.employee_id == employee_id && d.date >= start_date && d.date <= end_date)
        .collect();

    let missing_dates = start_date
        .iter_days()
        .take_while(|d| *d <= end_date)
        .filter(|d| !in_range.iter().any(|r| r.date == *d))
        .collect();

    PeriodSummary {
        employee_id,
        start_date,
        end_date,
        record_count: in_range.len(),
        worked_minutes: in_range.iter().map(|d| d.worked_minutes).sum(),
        late_minutes: in_range.iter().map(|d| d.late_minutes).sum(),
        undertime_minutes: in_range.iter().map(|d| d.undertime_minutes).sum(),
        overtime_minutes: in_range.iter().map(|d| d.overtime_minutes).sum(),
        approved_overtime_minutes: in_range
            .iter()
            .map(|d| d.payable_overtime_minutes())
            .sum(),
        pending_overtime_minutes: in_range
            .iter()
            .map(|d| d.pending_overtime_minutes())
            .sum(),
        needs_review_count: in_range.iter().filter(|d| d.needs_review).count(),
        leave_days: in_range.iter().filter(|d| d.on_leave).count(),
        missing_dates,
    }
}
