//! Punch pairing: turning raw clock events into worked intervals.
//!
//! Punches are paired chronologically: each clock-in opens an interval that
//! the next clock-out closes. Anomalies — a clock-out with no open interval,
//! a duplicate clock-in, a dangling clock-in at the end of the day — are
//! counted, never fatal: worked time is computed from whatever complete
//! pairs exist and the count drives the DTR review flag.

use chrono::NaiveDateTime;

use crate::models::{Punch, PunchDirection};

/// A completed in/out interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunchPair {
    /// Clock-in time.
    pub time_in: NaiveDateTime,
    /// Clock-out time.
    pub time_out: NaiveDateTime,
}

impl PunchPair {
    /// Interval length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.time_out - self.time_in).num_minutes()
    }
}

/// The result of pairing a day's punches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingOutcome {
    /// Completed intervals in chronological order.
    pub pairs: Vec<PunchPair>,
    /// Punches that could not be paired.
    pub unpaired_count: usize,
    /// Earliest clock-in, paired or not.
    pub first_in: Option<NaiveDateTime>,
    /// Latest clock-out, paired or not.
    pub last_out: Option<NaiveDateTime>,
}

impl PairingOutcome {
    /// Returns true when at least one punch failed to pair.
    pub fn has_anomalies(&self) -> bool {
        self.unpaired_count > 0
    }
}

/// Pairs punches into in/out intervals in chronological order.
///
/// A duplicate clock-in keeps the earlier open interval and counts the
/// later punch as unpaired; a clock-out with no open interval and a
/// dangling clock-in at the end are likewise counted.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::pair_punches;
/// use payroll_engine::models::{Punch, PunchDirection, PunchSource};
/// use uuid::Uuid;
///
/// let punch = |h: u32, m: u32, direction| Punch {
///     id: Uuid::new_v4(),
///     employee_id: Uuid::from_u128(1),
///     timestamp: "2025-03-03T00:00:00".parse::<chrono::NaiveDateTime>().unwrap()
///         .date().and_hms_opt(h, m, 0).unwrap(),
///     direction,
///     source: PunchSource::Biometric,
/// };
/// let outcome = pair_punches(&[
///     punch(9, 5, PunchDirection::In),
///     punch(19, 30, PunchDirection::Out),
/// ]);
/// assert_eq!(outcome.pairs.len(), 1);
/// assert_eq!(outcome.pairs[0].duration_minutes(), 625);
/// assert_eq!(outcome.unpaired_count, 0);
/// ```
pub fn pair_punches(punches: &[Punch]) -> PairingOutcome {
    let mut ordered: Vec<&Punch> = punches.iter().collect();
    ordered.sort_by_key(|p| p.timestamp);

    let mut pairs = Vec::new();
    let mut unpaired_count = 0;
    let mut open_in: Option<NaiveDateTime> = None;
    let mut first_in = None;
    let mut last_out = None;

    for punch in ordered {
        match punch.direction {
            PunchDirection::In => {
                if first_in.is_none() {
                    first_in = Some(punch.timestamp);
                }
                if open_in.is_some() {
                    unpaired_count += 1;
                } else {
                    open_in = Some(punch.timestamp);
                }
            }
            PunchDirection::Out => {
                last_out = Some(punch.timestamp);
                match open_in.take() {
                    Some(time_in) => pairs.push(PunchPair {
                        time_in,
                        time_out: punch.timestamp,
                    }),
                    None => unpaired_count += 1,
                }
            }
        }
    }

    if open_in.is_some() {
        unpaired_count += 1;
    }

    PairingOutcome {
        pairs,
        unpaired_count,
        first_in,
        last_out,
    }
}
