//! Declared holiday model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The statutory kind of a declared holiday.
///
/// The kind determines the pay-rate classification applied when work occurs
/// on the holiday (see [`DayClassification`](super::DayClassification)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    /// Regular holiday (double pay when worked).
    Regular,
    /// Special non-working day (130% when worked).
    SpecialNonWorking,
}

/// A declared holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday (e.g., "Araw ng Kagitingan").
    pub name: String,
    /// Regular or special non-working.
    pub kind: HolidayKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_holiday() {
        let json = r#"{
            "date": "2025-04-09",
            "name": "Araw ng Kagitingan",
            "kind": "regular"
        }"#;
        let holiday: Holiday = serde_json::from_str(json).unwrap();
        assert_eq!(holiday.kind, HolidayKind::Regular);
        assert_eq!(
            holiday.date,
            NaiveDate::from_ymd_opt(2025, 4, 9).unwrap()
        );
    }
}
