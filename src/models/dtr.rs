//! Daily Time Record model.
//!
//! A [`DailyTimeRecord`] is one employee's computed attendance outcome for
//! one calendar date. There is at most one per (employee, date);
//! recomputation overwrites the derived fields and never the raw punches.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The pay-rate classification of a worked day.
///
/// Determined at DTR-computation time from the resolved schedule and the
/// holiday calendar, and stored on the record so payroll never has to
/// re-resolve it.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DayClassification;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let multiplier = DayClassification::RegularHoliday.pay_multiplier();
/// assert_eq!(multiplier, Decimal::from_str("2.00").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayClassification {
    /// An ordinary scheduled working day.
    Ordinary,
    /// A rest day under the employee's schedule.
    RestDay,
    /// A declared special non-working day.
    SpecialHoliday,
    /// A declared regular holiday.
    RegularHoliday,
    /// A rest day that is also a special non-working day.
    RestDaySpecialHoliday,
    /// A rest day that is also a regular holiday.
    RestDayRegularHoliday,
}

impl DayClassification {
    /// Statutory pay multiplier applied to minutes worked on this day.
    pub fn pay_multiplier(&self) -> Decimal {
        match self {
            DayClassification::Ordinary => Decimal::new(100, 2),
            DayClassification::RestDay => Decimal::new(130, 2),
            DayClassification::SpecialHoliday => Decimal::new(130, 2),
            DayClassification::RestDaySpecialHoliday => Decimal::new(150, 2),
            DayClassification::RegularHoliday => Decimal::new(200, 2),
            DayClassification::RestDayRegularHoliday => Decimal::new(260, 2),
        }
    }

    /// Returns true for days where attendance is expected (late/undertime
    /// apply and a missing punch set requires review).
    pub fn attendance_expected(&self) -> bool {
        matches!(self, DayClassification::Ordinary)
    }
}

impl std::fmt::Display for DayClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DayClassification::Ordinary => "ordinary",
            DayClassification::RestDay => "rest day",
            DayClassification::SpecialHoliday => "special holiday",
            DayClassification::RegularHoliday => "regular holiday",
            DayClassification::RestDaySpecialHoliday => "rest day + special holiday",
            DayClassification::RestDayRegularHoliday => "rest day + regular holiday",
        };
        f.write_str(label)
    }
}

/// Why a DTR was flagged for HR review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewReason {
    /// No punches on a day where attendance was expected.
    NoPunches,
    /// One or more punches could not be paired (e.g., a missing clock-out).
    UnpairedPunch,
}

impl std::fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewReason::NoPunches => f.write_str("no punches recorded"),
            ReviewReason::UnpairedPunch => f.write_str("unpaired punch"),
        }
    }
}

/// Lifecycle status of a DTR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtrStatus {
    /// Open to recomputation and HR actions.
    Draft,
    /// Included in a closed payroll; no further recomputation.
    Finalized,
}

/// One employee's computed attendance outcome for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTimeRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: Uuid,
    /// The calendar date the record covers.
    pub date: NaiveDate,
    /// The schedule the expectations were resolved from.
    pub schedule_id: Option<Uuid>,
    /// Pay-rate classification of the day.
    pub classification: DayClassification,
    /// Snapshot of the expected shift start, if the day had one.
    pub expected_start: Option<NaiveDateTime>,
    /// Snapshot of the expected shift end, if the day had one.
    pub expected_end: Option<NaiveDateTime>,
    /// References to the raw punches the computation consumed.
    pub punch_ids: Vec<Uuid>,
    /// Minutes worked across paired punch intervals, net of unpaid breaks.
    pub worked_minutes: i64,
    /// Minutes late against the expected start.
    pub late_minutes: i64,
    /// Minutes short against the expected end.
    pub undertime_minutes: i64,
    /// Overtime minutes in excess of the scheduled minutes.
    pub overtime_minutes: i64,
    /// Whether HR has approved the overtime for pay.
    pub overtime_approved: bool,
    /// Whether the record needs HR review.
    pub needs_review: bool,
    /// Why the record needs review.
    pub review_reason: Option<ReviewReason>,
    /// Whether the employee was on approved leave.
    pub on_leave: bool,
    /// Lifecycle status.
    pub status: DtrStatus,
}

impl DailyTimeRecord {
    /// Overtime minutes that are payable (i.e., approved by HR).
    pub fn payable_overtime_minutes(&self) -> i64 {
        if self.overtime_approved {
            self.overtime_minutes
        } else {
            0
        }
    }

    /// Overtime minutes still awaiting HR approval.
    pub fn pending_overtime_minutes(&self) -> i64 {
        if self.overtime_approved {
            0
        } else {
            self.overtime_minutes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// DC-001: multipliers follow the statutory table
    #[test]
    fn test_pay_multipliers() {
        assert_eq!(DayClassification::Ordinary.pay_multiplier(), dec("1.00"));
        assert_eq!(DayClassification::RestDay.pay_multiplier(), dec("1.30"));
        assert_eq!(
            DayClassification::SpecialHoliday.pay_multiplier(),
            dec("1.30")
        );
        assert_eq!(
            DayClassification::RestDaySpecialHoliday.pay_multiplier(),
            dec("1.50")
        );
        assert_eq!(
            DayClassification::RegularHoliday.pay_multiplier(),
            dec("2.00")
        );
        assert_eq!(
            DayClassification::RestDayRegularHoliday.pay_multiplier(),
            dec("2.60")
        );
    }

    /// DC-002: attendance only expected on ordinary days
    #[test]
    fn test_attendance_expected() {
        assert!(DayClassification::Ordinary.attendance_expected());
        assert!(!DayClassification::RestDay.attendance_expected());
        assert!(!DayClassification::RegularHoliday.attendance_expected());
    }

    #[test]
    fn test_payable_vs_pending_overtime() {
        let mut dtr = DailyTimeRecord {
            id: Uuid::from_u128(1),
            employee_id: Uuid::from_u128(2),
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            schedule_id: None,
            classification: DayClassification::Ordinary,
            expected_start: None,
            expected_end: None,
            punch_ids: vec![],
            worked_minutes: 625,
            late_minutes: 5,
            undertime_minutes: 0,
            overtime_minutes: 85,
            overtime_approved: false,
            needs_review: false,
            review_reason: None,
            on_leave: false,
            status: DtrStatus::Draft,
        };

        assert_eq!(dtr.payable_overtime_minutes(), 0);
        assert_eq!(dtr.pending_overtime_minutes(), 85);

        dtr.overtime_approved = true;
        assert_eq!(dtr.payable_overtime_minutes(), 85);
        assert_eq!(dtr.pending_overtime_minutes(), 0);
    }

    #[test]
    fn test_review_reason_display() {
        assert_eq!(ReviewReason::NoPunches.to_string(), "no punches recorded");
        assert_eq!(ReviewReason::UnpairedPunch.to_string(), "unpaired punch");
    }

    #[test]
    fn test_serialization_round_trip() {
        let dtr = DailyTimeRecord {
            id: Uuid::from_u128(1),
            employee_id: Uuid::from_u128(2),
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            schedule_id: Some(Uuid::from_u128(3)),
            classification: DayClassification::RestDay,
            expected_start: None,
            expected_end: None,
            punch_ids: vec![Uuid::from_u128(4)],
            worked_minutes: 240,
            late_minutes: 0,
            undertime_minutes: 0,
            overtime_minutes: 0,
            overtime_approved: false,
            needs_review: true,
            review_reason: Some(ReviewReason::UnpairedPunch),
            on_leave: false,
            status: DtrStatus::Draft,
        };
        let json = serde_json::to_string(&dtr).unwrap();
        let back: DailyTimeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(dtr, back);
    }
}
