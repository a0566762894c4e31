//! Work schedule model.
//!
//! A [`WorkSchedule`] declares the expected shift window, break windows and
//! rest days for the employees assigned to it. Schedules are referenced by
//! employees, not owned by them, and are read-only from the computation
//! engine's perspective; edits apply prospectively through administrative
//! flows outside this crate.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the schedule determines the expected shift for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// Same shift window every working day.
    Fixed,
    /// A default window with per-weekday overrides.
    Shifting,
    /// No fixed window; only a required number of minutes per day.
    Flexible,
}

/// Whether a schedule may be assigned to employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Available for assignment and resolution.
    Active,
    /// Retired; resolution treats it as not configured.
    Inactive,
}

/// A shift's start and end of day.
///
/// An end time at or before the start time means the shift crosses midnight
/// and ends on the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTime {
    /// Expected clock-in time.
    pub start: NaiveTime,
    /// Expected clock-out time.
    pub end: NaiveTime,
}

impl ShiftTime {
    /// Returns the shift span in minutes, accounting for midnight crossing.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::ShiftTime;
    /// use chrono::NaiveTime;
    ///
    /// let day = ShiftTime {
    ///     start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    /// };
    /// assert_eq!(day.span_minutes(), 540);
    ///
    /// let night = ShiftTime {
    ///     start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    /// };
    /// assert_eq!(night.span_minutes(), 480);
    /// ```
    pub fn span_minutes(&self) -> i64 {
        let raw = (self.end - self.start).num_minutes();
        if raw > 0 { raw } else { raw + 24 * 60 }
    }

    /// Returns true if the shift ends on the day after it starts.
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }
}

/// A break window within the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    /// Break start time.
    pub start: NaiveTime,
    /// Break end time.
    pub end: NaiveTime,
    /// Whether the break is paid. Only unpaid breaks are excluded from
    /// worked minutes.
    pub is_paid: bool,
}

impl BreakWindow {
    /// Returns the break duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A per-weekday shift override for shifting schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOverride {
    /// The weekday the override applies to.
    pub weekday: Weekday,
    /// The shift window for that weekday.
    pub shift: ShiftTime,
}

/// A work schedule assigned to employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// Unique identifier for the schedule.
    pub id: Uuid,
    /// Display name (e.g., "Head Office Day Shift").
    pub name: String,
    /// How the expected shift is determined.
    pub schedule_type: ScheduleType,
    /// The default shift window. Ignored for flexible schedules.
    pub shift: ShiftTime,
    /// Break windows within the shift.
    #[serde(default)]
    pub breaks: Vec<BreakWindow>,
    /// Per-weekday overrides; consulted only for shifting schedules.
    #[serde(default)]
    pub day_overrides: Vec<DayOverride>,
    /// Weekdays that are rest days under this schedule.
    #[serde(default)]
    pub rest_days: Vec<Weekday>,
    /// Required worked minutes per day for flexible schedules.
    pub required_minutes: Option<i64>,
    /// Whether the schedule is active.
    pub status: ScheduleStatus,
}

impl WorkSchedule {
    /// Returns true if the given weekday is a rest day under this schedule.
    pub fn is_rest_day(&self, weekday: Weekday) -> bool {
        self.rest_days.contains(&weekday)
    }

    /// Returns the expected shift window for a weekday, or `None` for
    /// flexible schedules which have no fixed window.
    pub fn shift_for(&self, weekday: Weekday) -> Option<ShiftTime> {
        match self.schedule_type {
            ScheduleType::Flexible => None,
            ScheduleType::Fixed => Some(self.shift),
            ScheduleType::Shifting => Some(
                self.day_overrides
                    .iter()
                    .find(|o| o.weekday == weekday)
                    .map(|o| o.shift)
                    .unwrap_or(self.shift),
            ),
        }
    }

    /// Returns the nominal scheduled minutes for a weekday: the shift span
    /// minus unpaid breaks, or the required minutes for flexible schedules.
    ///
    /// This is the baseline that overtime is measured against, including on
    /// rest days and holidays when the employee reports for work.
    pub fn nominal_minutes(&self, weekday: Weekday) -> i64 {
        match self.shift_for(weekday) {
            Some(shift) => shift.span_minutes() - self.unpaid_break_minutes(),
            None => self.required_minutes.unwrap_or(8 * 60),
        }
    }

    /// Total unpaid break minutes per day.
    pub fn unpaid_break_minutes(&self) -> i64 {
        self.breaks
            .iter()
            .filter(|b| !b.is_paid)
            .map(|b| b.duration_minutes())
            .sum()
    }
}
