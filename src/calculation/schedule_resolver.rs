//! Work schedule resolution for a single date.
//!
//! Resolution turns an assigned [`WorkSchedule`] plus the holiday calendar
//! and leave state into a [`ResolvedShift`]: the day's pay classification,
//! the expected attendance window (when one exists), the unpaid break
//! windows to exclude from worked time, and the nominal scheduled minutes
//! that overtime is measured against.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::models::{DayClassification, Holiday, HolidayKind, WorkSchedule};

/// The resolved expectations for one (employee, date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShift {
    /// The date resolved.
    pub date: NaiveDate,
    /// The schedule the resolution came from.
    pub schedule_id: Uuid,
    /// Pay classification of the day.
    pub classification: DayClassification,
    /// Expected clock-in, present only when attendance is expected.
    pub expected_start: Option<NaiveDateTime>,
    /// Expected clock-out, anchored past midnight for overnight shifts.
    pub expected_end: Option<NaiveDateTime>,
    /// Unpaid break windows anchored to the date.
    pub unpaid_breaks: Vec<(NaiveDateTime, NaiveDateTime)>,
    /// Nominal scheduled minutes: the overtime baseline, defined even on
    /// rest days and holidays.
    pub scheduled_minutes: i64,
    /// Whether the shift window crosses midnight.
    pub crosses_midnight: bool,
    /// Whether the employee is on approved leave.
    pub on_leave: bool,
}

/// Classifies a date from the schedule's rest-day set and the holiday
/// calendar.
fn classify(schedule: &WorkSchedule, date: NaiveDate, holiday: Option<&Holiday>) -> DayClassification {
    let rest = schedule.is_rest_day(date.weekday());
    match (holiday.map(|h| h.kind), rest) {
        (Some(HolidayKind::Regular), true) => DayClassification::RestDayRegularHoliday,
        (Some(HolidayKind::Regular), false) => DayClassification::RegularHoliday,
        (Some(HolidayKind::SpecialNonWorking), true) => DayClassification::RestDaySpecialHoliday,
        (Some(HolidayKind::SpecialNonWorking), false) => DayClassification::SpecialHoliday,
        (None, true) => DayClassification::RestDay,
        (None, false) => DayClassification::Ordinary,
    }
}

/// Resolves the expected shift for one date.
///
/// The expected attendance window is populated only for ordinary days with
/// a fixed window; rest days, holidays, and flexible schedules carry no
/// window (so late/undertime never apply), but all of them keep a nominal
/// scheduled-minutes baseline for overtime measurement.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::resolve_shift;
/// use payroll_engine::models::{
///     DayClassification, ScheduleStatus, ScheduleType, ShiftTime, WorkSchedule,
/// };
/// use chrono::{NaiveDate, NaiveTime, Weekday};
/// use uuid::Uuid;
///
/// let schedule = WorkSchedule {
///     id: Uuid::from_u128(1),
///     name: "Day Shift".to_string(),
///     schedule_type: ScheduleType::Fixed,
///     shift: ShiftTime {
///         start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///         end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///     },
///     breaks: vec![],
///     day_overrides: vec![],
///     rest_days: vec![Weekday::Sun],
///     required_minutes: None,
///     status: ScheduleStatus::Active,
/// };
///
/// // 2025-03-03 is a Monday
/// let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let resolved = resolve_shift(&schedule, monday, None, false);
/// assert_eq!(resolved.classification, DayClassification::Ordinary);
/// assert_eq!(resolved.scheduled_minutes, 540);
/// assert!(resolved.expected_start.is_some());
/// ```
pub fn resolve_shift(
    schedule: &WorkSchedule,
    date: NaiveDate,
    holiday: Option<&Holiday>,
    on_leave: bool,
) -> ResolvedShift {
    let classification = classify(schedule, date, holiday);
    let weekday = date.weekday();
    let shift = schedule.shift_for(weekday);
    let crosses_midnight = shift.is_some_and(|s| s.crosses_midnight());

    let (expected_start, expected_end) = match shift {
        Some(s) if classification.attendance_expected() => {
            let start = date.and_time(s.start);
            let end_date = if s.crosses_midnight() {
                date.checked_add_days(Days::new(1)).expect("date in range")
            } else {
                date
            };
            (Some(start), Some(end_date.and_time(s.end)))
        }
        _ => (None, None),
    };

    // Break windows anchor to the shift date; for overnight shifts a break
    // earlier than the shift start falls on the following day.
    let unpaid_breaks = shift
        .map(|s| {
            schedule
                .breaks
                .iter()
                .filter(|b| !b.is_paid)
                .map(|b| {
                    let break_date = if s.crosses_midnight() && b.start < s.start {
                        date.checked_add_days(Days::new(1)).expect("date in range")
                    } else {
                        date
                    };
                    (break_date.and_time(b.start), break_date.and_time(b.end))
                })
                .collect()
        })
        .unwrap_or_default();

    ResolvedShift {
        date,
        schedule_id: schedule.id,
        classification,
        expected_start,
        expected_end,
        unpaid_breaks,
        scheduled_minutes: schedule.nominal_minutes(weekday),
        crosses_midnight,
        on_leave,
    }
}
