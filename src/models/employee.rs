//! Employee model and tenant identity.
//!
//! Tenant context is always an explicit value passed through engine
//! operations, never ambient state, so batch workers on different threads
//! can safely serve different tenants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies the tenant (company) that owns a set of records.
///
/// # Example
///
/// ```
/// use payroll_engine::models::TenantId;
/// use uuid::Uuid;
///
/// let tenant = TenantId(Uuid::from_u128(7));
/// assert_eq!(tenant.to_string(), Uuid::from_u128(7).to_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub Uuid);

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Employment status of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed; included in payroll runs.
    Active,
    /// No longer employed; excluded from new computations.
    Separated,
}

/// An employee subject to DTR and payroll computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The employee number shown on payslips.
    pub employee_number: String,
    /// Display name.
    pub name: String,
    /// Basic pay per month.
    pub monthly_rate: Decimal,
    /// The assigned work schedule, if any.
    pub schedule_id: Option<Uuid>,
    /// Employment status.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee is active.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_active_employee() {
        let employee = Employee {
            id: Uuid::from_u128(1),
            employee_number: "E-0001".to_string(),
            name: "Maria Santos".to_string(),
            monthly_rate: Decimal::from_str("26000").unwrap(),
            schedule_id: None,
            status: EmployeeStatus::Active,
        };
        assert!(employee.is_active());
    }

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "employee_number": "E-0001",
            "name": "Maria Santos",
            "monthly_rate": "26000",
            "schedule_id": null,
            "status": "separated"
        }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.status, EmployeeStatus::Separated);
        assert!(!employee.is_active());
    }
}
