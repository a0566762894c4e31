//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine:
//! employees and their work schedules, raw attendance punches, holidays and
//! leave, daily time records, payroll periods/entries with their status state
//! machines, and the inputs to payroll computation (adjustments, loans,
//! contribution breakdowns).

mod adjustment;
mod contribution;
mod dtr;
mod employee;
mod entry;
mod holiday;
mod leave;
mod loan;
mod period;
mod punch;
mod schedule;

pub use adjustment::{AdjustmentKind, EmployeeAdjustment};
pub use contribution::{ContributionBreakdown, ContributionShare};
pub use dtr::{DailyTimeRecord, DayClassification, DtrStatus, ReviewReason};
pub use employee::{Employee, EmployeeStatus, TenantId};
pub use entry::{
    DeductionLine, DeductionType, EarningLine, EarningType, EntryStatus, PayrollEntry,
};
pub use holiday::{Holiday, HolidayKind};
pub use leave::LeaveRecord;
pub use loan::EmployeeLoan;
pub use period::{PayFrequency, PayrollCycle, PayrollPeriod, PeriodStatus, generate_periods};
pub use punch::{Punch, PunchDirection, PunchSource};
pub use schedule::{BreakWindow, DayOverride, ScheduleStatus, ScheduleType, ShiftTime, WorkSchedule};
