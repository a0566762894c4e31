//! Approved leave records.
//!
//! Leave is managed by the (out of scope) leave module; the engine only
//! consults approved leave to excuse an absence instead of flagging the
//! day for review.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day of leave for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Unique identifier for the leave day.
    pub id: Uuid,
    /// The employee on leave.
    pub employee_id: Uuid,
    /// The date covered.
    pub date: NaiveDate,
    /// Whether the leave has been approved. Only approved leave excuses
    /// a day with no punches.
    pub approved: bool,
}
