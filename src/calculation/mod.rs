//! Attendance calculation logic.
//!
//! This module contains the work-schedule resolver that determines what a
//! date looks like for an employee, the punch pairing that turns raw clock
//! events into worked intervals, the DTR calculation engine that derives
//! worked/late/undertime/overtime minutes, and the period aggregator that
//! rolls daily records up for payroll.

mod dtr_engine;
mod period_summary;
mod punch_pairing;
mod schedule_resolver;

pub use dtr_engine::{calculate_dtr, punch_window};
pub use period_summary::{PeriodSummary, summarize_period};
pub use punch_pairing::{PairingOutcome, PunchPair, pair_punches};
pub use schedule_resolver::{ResolvedShift, resolve_shift};
