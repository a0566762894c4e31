//! Raw attendance punch events.
//!
//! Punches are captured by the attendance subsystem (biometric devices,
//! kiosks, manual entry) and are immutable from the engine's perspective:
//! DTR computation reads them, pairs them, and references them, but never
//! mutates or deletes them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchDirection {
    /// Clock-in.
    In,
    /// Clock-out.
    Out,
}

/// Where a punch was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchSource {
    /// Biometric terminal.
    Biometric,
    /// Web kiosk.
    Kiosk,
    /// Mobile app.
    Mobile,
    /// Entered by HR on the employee's behalf.
    Manual,
}

/// A single immutable clock-in or clock-out event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// Unique identifier for the punch.
    pub id: Uuid,
    /// The employee the punch belongs to.
    pub employee_id: Uuid,
    /// When the punch occurred.
    pub timestamp: NaiveDateTime,
    /// Clock-in or clock-out.
    pub direction: PunchDirection,
    /// Capture source.
    pub source: PunchSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_punch() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "employee_id": "00000000-0000-0000-0000-000000000002",
            "timestamp": "2025-03-03T09:05:00",
            "direction": "in",
            "source": "biometric"
        }"#;
        let punch: Punch = serde_json::from_str(json).unwrap();
        assert_eq!(punch.direction, PunchDirection::In);
        assert_eq!(punch.source, PunchSource::Biometric);
    }
}
