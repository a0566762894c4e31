//! The DTR calculation engine.
//!
//! Derives one [`DailyTimeRecord`] from a resolved shift and the day's raw
//! punches. The computation is deterministic and idempotent: the same
//! punches and schedule always produce the same derived fields, and
//! recomputation overwrites only derived fields — raw punches are consumed
//! read-only.
//!
//! Missing or anomalous punch data is a business condition recorded on the
//! record (`needs_review`), never an error; missing schedule data is a
//! configuration error raised by the caller before this engine runs.

use chrono::{Days, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::models::{DailyTimeRecord, DtrStatus, Punch, ReviewReason};

use super::punch_pairing::{PunchPair, pair_punches};
use super::schedule_resolver::ResolvedShift;

/// The window of punch timestamps attributed to a DTR date.
///
/// Day shifts own the calendar date; overnight shifts own noon-to-noon so
/// the clock-out after midnight attributes to the date the shift started.
pub fn punch_window(resolved: &ResolvedShift) -> (NaiveDateTime, NaiveDateTime) {
    let next = resolved
        .date
        .checked_add_days(Days::new(1))
        .expect("date in range");
    if resolved.crosses_midnight {
        (
            resolved.date.and_hms_opt(12, 0, 0).expect("valid time"),
            next.and_hms_opt(12, 0, 0).expect("valid time"),
        )
    } else {
        (
            resolved.date.and_hms_opt(0, 0, 0).expect("valid time"),
            next.and_hms_opt(0, 0, 0).expect("valid time"),
        )
    }
}

/// Minutes of overlap between a worked interval and a break window.
fn overlap_minutes(pair: &PunchPair, window: &(NaiveDateTime, NaiveDateTime)) -> i64 {
    let start = pair.time_in.max(window.0);
    let end = pair.time_out.min(window.1);
    (end - start).num_minutes().max(0)
}

/// Computes the daily time record for one (employee, date).
///
/// `previous` is the existing record for the date, if any; its identity is
/// preserved and its overtime approval survives recomputation as long as
/// the recomputed overtime minutes are unchanged (approval is HR data, not
/// derived data).
///
/// Algorithm per the attendance rules:
/// 1. Worked minutes: paired punch intervals minus unpaid-break overlap.
/// 2. Late/undertime: measured against the expected window; zero on rest
///    days, holidays, leave days, and flexible schedules (no window).
/// 3. Overtime: the excess of worked over scheduled minutes, counted only
///    when it reaches the configured minimum, starting unapproved.
/// 4. Review flags: no punches on a day attendance was expected (and no
///    approved leave), or any unpaired punch.
pub fn calculate_dtr(
    employee_id: Uuid,
    resolved: &ResolvedShift,
    punches: &[Punch],
    previous: Option<&DailyTimeRecord>,
    settings: &EngineSettings,
) -> DailyTimeRecord {
    let pairing = pair_punches(punches);

    let worked_minutes: i64 = pairing
        .pairs
        .iter()
        .map(|pair| {
            let breaks: i64 = resolved
                .unpaid_breaks
                .iter()
                .map(|w| overlap_minutes(pair, w))
                .sum();
            pair.duration_minutes() - breaks
        })
        .sum();

    let late_minutes = match (resolved.expected_start, pairing.first_in) {
        (Some(expected), Some(actual)) => (actual - expected).num_minutes().max(0),
        _ => 0,
    };
    let undertime_minutes = match (resolved.expected_end, pairing.last_out) {
        (Some(expected), Some(actual)) => (expected - actual).num_minutes().max(0),
        _ => 0,
    };

    let excess = worked_minutes - resolved.scheduled_minutes;
    let overtime_minutes = if excess >= settings.overtime_minimum_minutes {
        excess
    } else {
        0
    };

    let review_reason = if punches.is_empty() {
        let absent_without_leave =
            resolved.classification.attendance_expected() && !resolved.on_leave;
        absent_without_leave.then_some(ReviewReason::NoPunches)
    } else if pairing.has_anomalies() {
        Some(ReviewReason::UnpairedPunch)
    } else {
        None
    };

    // Approval is an HR action, not a derived field; it survives recompute
    // unless the overtime minutes themselves changed.
    let overtime_approved = previous
        .filter(|p| p.overtime_minutes == overtime_minutes)
        .map(|p| p.overtime_approved)
        .unwrap_or(false);

    let mut punch_ids: Vec<(NaiveDateTime, Uuid)> =
        punches.iter().map(|p| (p.timestamp, p.id)).collect();
    punch_ids.sort();

    debug!(
        %employee_id,
        date = %resolved.date,
        worked_minutes,
        late_minutes,
        undertime_minutes,
        overtime_minutes,
        needs_review = review_reason.is_some(),
        "DTR computed"
    );

    DailyTimeRecord {
        id: previous.map(|p| p.id).unwrap_or_else(Uuid::new_v4),
        employee_id,
        date: resolved.date,
        schedule_id: Some(resolved.schedule_id),
        classification: resolved.classification,
        expected_start: resolved.expected_start,
        expected_end: resolved.expected_end,
        punch_ids: punch_ids.into_iter().map(|(_, id)| id).collect(),
        worked_minutes,
        late_minutes,
        undertime_minutes,
        overtime_minutes,
        overtime_approved,
        needs_review: review_reason.is_some(),
        review_reason,
        on_leave: resolved.on_leave,
        status: DtrStatus::Draft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::resolve_shift;
    use crate::models::{
        DayClassification, Holiday, HolidayKind, PunchDirection, PunchSource, ScheduleStatus,
        ScheduleType, ShiftTime, WorkSchedule,
    };
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn day_schedule() -> WorkSchedule {
        WorkSchedule {
            id: Uuid::from_u128(1),
            name: "Day Shift".to_string(),
            schedule_type: ScheduleType::Fixed,
            shift: ShiftTime {
                start: time(9, 0),
                end: time(18, 0),
            },
            breaks: vec![],
            day_overrides: vec![],
            rest_days: vec![Weekday::Sat, Weekday::Sun],
            required_minutes: None,
            status: ScheduleStatus::Active,
        }
    }

    fn punch(day: &str, h: u32, m: u32, direction: PunchDirection) -> Punch {
        Punch {
            id: Uuid::new_v4(),
            employee_id: Uuid::from_u128(9),
            timestamp: date(day).and_hms_opt(h, m, 0).unwrap(),
            direction,
            source: PunchSource::Biometric,
        }
    }

    fn employee_id() -> Uuid {
        Uuid::from_u128(9)
    }

    // 2025-03-05 is a Wednesday.
    const WEDNESDAY: &str = "2025-03-05";

    /// DTR-001: 9:00-18:00 schedule, punches 09:05 in / 19:30 out
    #[test]
    fn test_ordinary_day_with_overtime() {
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), None, false);
        let punches = vec![
            punch(WEDNESDAY, 9, 5, PunchDirection::In),
            punch(WEDNESDAY, 19, 30, PunchDirection::Out),
        ];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );

        assert_eq!(dtr.worked_minutes, 625);
        assert_eq!(dtr.late_minutes, 5);
        assert_eq!(dtr.undertime_minutes, 0);
        assert_eq!(dtr.overtime_minutes, 85);
        assert!(!dtr.overtime_approved);
        assert!(!dtr.needs_review);
        assert_eq!(dtr.classification, DayClassification::Ordinary);
    }

    /// DTR-002: overtime below the minimum threshold is not counted
    #[test]
    fn test_overtime_threshold_gate() {
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), None, false);
        // 09:00 - 18:20: 560 worked, 20 over the 540 schedule, under the
        // default 30-minute minimum
        let punches = vec![
            punch(WEDNESDAY, 9, 0, PunchDirection::In),
            punch(WEDNESDAY, 18, 20, PunchDirection::Out),
        ];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );
        assert_eq!(dtr.worked_minutes, 560);
        assert_eq!(dtr.overtime_minutes, 0);
    }

    /// DTR-003: an excess exactly at the threshold counts in full
    #[test]
    fn test_overtime_at_threshold() {
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), None, false);
        let punches = vec![
            punch(WEDNESDAY, 9, 0, PunchDirection::In),
            punch(WEDNESDAY, 18, 30, PunchDirection::Out),
        ];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );
        assert_eq!(dtr.overtime_minutes, 30);
    }

    /// DTR-004: missing clock-out flags review, keeps computing
    #[test]
    fn test_missing_clock_out() {
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), None, false);
        let punches = vec![punch(WEDNESDAY, 9, 0, PunchDirection::In)];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );
        assert!(dtr.needs_review);
        assert_eq!(dtr.review_reason, Some(ReviewReason::UnpairedPunch));
        assert_eq!(dtr.worked_minutes, 0);
        assert_eq!(dtr.undertime_minutes, 0);
    }

    /// DTR-005: no punches on an expected day flags review
    #[test]
    fn test_no_punches_flags_review() {
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), None, false);
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &[],
            None,
            &EngineSettings::default(),
        );
        assert!(dtr.needs_review);
        assert_eq!(dtr.review_reason, Some(ReviewReason::NoPunches));
    }

    /// DTR-006: no punches on a rest day or on approved leave is not flagged
    #[test]
    fn test_no_punches_excused() {
        // 2025-03-08 is a Saturday
        let rest = resolve_shift(&day_schedule(), date("2025-03-08"), None, false);
        let dtr = calculate_dtr(employee_id(), &rest, &[], None, &EngineSettings::default());
        assert!(!dtr.needs_review);

        let leave = resolve_shift(&day_schedule(), date(WEDNESDAY), None, true);
        let dtr = calculate_dtr(employee_id(), &leave, &[], None, &EngineSettings::default());
        assert!(!dtr.needs_review);
        assert!(dtr.on_leave);
    }

    /// DTR-007: break overlap is excluded from worked minutes
    #[test]
    fn test_break_overlap_excluded() {
        let mut schedule = day_schedule();
        schedule.breaks = vec![crate::models::BreakWindow {
            start: time(12, 0),
            end: time(13, 0),
            is_paid: false,
        }];
        let resolved = resolve_shift(&schedule, date(WEDNESDAY), None, false);
        let punches = vec![
            punch(WEDNESDAY, 9, 0, PunchDirection::In),
            punch(WEDNESDAY, 18, 0, PunchDirection::Out),
        ];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );
        // 540 raw minus the 60-minute break; schedule is 480, no overtime
        assert_eq!(dtr.worked_minutes, 480);
        assert_eq!(dtr.overtime_minutes, 0);
        assert_eq!(dtr.undertime_minutes, 0);
    }

    /// DTR-008: work on a rest day keeps the classification, no late/undertime
    #[test]
    fn test_rest_day_work() {
        let resolved = resolve_shift(&day_schedule(), date("2025-03-08"), None, false);
        let punches = vec![
            punch("2025-03-08", 10, 0, PunchDirection::In),
            punch("2025-03-08", 14, 0, PunchDirection::Out),
        ];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );
        assert_eq!(dtr.classification, DayClassification::RestDay);
        assert_eq!(dtr.worked_minutes, 240);
        assert_eq!(dtr.late_minutes, 0);
        assert_eq!(dtr.undertime_minutes, 0);
    }

    /// DTR-009: holiday classification is stored for payroll
    #[test]
    fn test_holiday_classification_stored() {
        let holiday = Holiday {
            date: date(WEDNESDAY),
            name: "Araw ng Kagitingan".to_string(),
            kind: HolidayKind::Regular,
        };
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), Some(&holiday), false);
        let punches = vec![
            punch(WEDNESDAY, 9, 0, PunchDirection::In),
            punch(WEDNESDAY, 18, 0, PunchDirection::Out),
        ];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );
        assert_eq!(dtr.classification, DayClassification::RegularHoliday);
    }

    /// DTR-010: recomputation is deterministic and preserves identity
    #[test]
    fn test_recompute_deterministic() {
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), None, false);
        let punches = vec![
            punch(WEDNESDAY, 9, 5, PunchDirection::In),
            punch(WEDNESDAY, 19, 30, PunchDirection::Out),
        ];
        let settings = EngineSettings::default();

        let first = calculate_dtr(employee_id(), &resolved, &punches, None, &settings);
        let second = calculate_dtr(employee_id(), &resolved, &punches, Some(&first), &settings);

        assert_eq!(first.id, second.id);
        assert_eq!(first.worked_minutes, second.worked_minutes);
        assert_eq!(first.punch_ids, second.punch_ids);
        assert_eq!(first, second);
    }

    /// DTR-011: overtime approval survives recompute with unchanged minutes
    /// and resets when the minutes change
    #[test]
    fn test_approval_preserved_unless_minutes_change() {
        let resolved = resolve_shift(&day_schedule(), date(WEDNESDAY), None, false);
        let settings = EngineSettings::default();
        let punches = vec![
            punch(WEDNESDAY, 9, 0, PunchDirection::In),
            punch(WEDNESDAY, 20, 0, PunchDirection::Out),
        ];

        let mut approved = calculate_dtr(employee_id(), &resolved, &punches, None, &settings);
        approved.overtime_approved = true;

        let same = calculate_dtr(employee_id(), &resolved, &punches, Some(&approved), &settings);
        assert!(same.overtime_approved);

        let longer = vec![
            punch(WEDNESDAY, 9, 0, PunchDirection::In),
            punch(WEDNESDAY, 21, 0, PunchDirection::Out),
        ];
        let changed = calculate_dtr(employee_id(), &resolved, &longer, Some(&approved), &settings);
        assert_ne!(changed.overtime_minutes, approved.overtime_minutes);
        assert!(!changed.overtime_approved);
    }

    /// DTR-012: overnight shift pairs across midnight inside its window
    #[test]
    fn test_overnight_shift() {
        let mut schedule = day_schedule();
        schedule.shift = ShiftTime {
            start: time(22, 0),
            end: time(6, 0),
        };
        let resolved = resolve_shift(&schedule, date(WEDNESDAY), None, false);
        let (from, to) = punch_window(&resolved);
        assert_eq!(from, date(WEDNESDAY).and_hms_opt(12, 0, 0).unwrap());
        assert_eq!(to, date("2025-03-06").and_hms_opt(12, 0, 0).unwrap());

        let punches = vec![
            punch(WEDNESDAY, 22, 0, PunchDirection::In),
            punch("2025-03-06", 6, 0, PunchDirection::Out),
        ];
        let dtr = calculate_dtr(
            employee_id(),
            &resolved,
            &punches,
            None,
            &EngineSettings::default(),
        );
        assert_eq!(dtr.worked_minutes, 480);
        assert_eq!(dtr.late_minutes, 0);
        assert_eq!(dtr.undertime_minutes, 0);
    }
}
