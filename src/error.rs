//! Error types for the payroll computation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Every error carries an [`ErrorKind`] classification that batch processing
//! uses to decide isolation and retry behavior: configuration errors must not
//! be retried blindly, business-rule rejections go back to the user, and
//! concurrency conflicts resolve themselves once the in-flight run finishes.
//!
//! Data anomalies (unpaired punches, missing DTRs in a summary range) are
//! deliberately *not* represented here — they are fields on the computed
//! records, never failures.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{EntryStatus, PeriodStatus};

/// Broad classification of an [`EngineError`], driving retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration; fatal to the operation, not retried
    /// automatically, and isolated per employee in batch runs.
    Configuration,
    /// An expected, user-correctable rejection (invalid transition, locked
    /// period, duplicate computation without force).
    BusinessRule,
    /// A duplicate concurrent computation attempt; retry after the in-flight
    /// run completes.
    Concurrency,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
/// use payroll_engine::models::PeriodStatus;
///
/// let error = EngineError::InvalidPeriodTransition {
///     from: PeriodStatus::Draft,
///     to: PeriodStatus::Locked,
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid period transition from draft to locked"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A contribution table failed bracket-coverage validation.
    #[error("Invalid {table} contribution table effective {effective_from}: {message}")]
    InvalidContributionTable {
        /// The contribution type the table belongs to.
        table: String,
        /// The effective date of the offending table version.
        effective_from: NaiveDate,
        /// What made the bracket set invalid.
        message: String,
    },

    /// The referenced employee does not exist for the tenant.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        employee_id: Uuid,
    },

    /// The employee has no active work schedule assigned.
    #[error("No active work schedule assigned to employee {employee_id}")]
    ScheduleNotConfigured {
        /// The employee missing a schedule.
        employee_id: Uuid,
    },

    /// The referenced payroll period does not exist for the tenant.
    #[error("Payroll period not found: {period_id}")]
    PeriodNotFound {
        /// The period id that was not found.
        period_id: Uuid,
    },

    /// The referenced payroll cycle does not exist for the tenant.
    #[error("Payroll cycle not found: {cycle_id}")]
    CycleNotFound {
        /// The cycle id that was not found.
        cycle_id: Uuid,
    },

    /// The referenced payroll entry does not exist for the tenant.
    #[error("Payroll entry not found: {entry_id}")]
    EntryNotFound {
        /// The entry id that was not found.
        entry_id: Uuid,
    },

    /// The requested period status transition is not allowed.
    #[error("Invalid period transition from {from} to {to}")]
    InvalidPeriodTransition {
        /// The current period status.
        from: PeriodStatus,
        /// The requested target status.
        to: PeriodStatus,
    },

    /// The requested entry status transition is not allowed.
    #[error("Invalid entry transition from {from} to {to}")]
    InvalidEntryTransition {
        /// The current entry status.
        from: EntryStatus,
        /// The requested target status.
        to: EntryStatus,
    },

    /// Attempted to delete a period that is past Draft.
    #[error("Payroll period {period_id} is not deletable while {status}")]
    PeriodNotDeletable {
        /// The period that was targeted for deletion.
        period_id: Uuid,
        /// Its current status.
        status: PeriodStatus,
    },

    /// Attempted to compute entries under a period whose status forbids it.
    #[error("Payroll period {period_id} does not accept computation while {status}")]
    PeriodNotComputable {
        /// The period computation was attempted under.
        period_id: Uuid,
        /// Its current status.
        status: PeriodStatus,
    },

    /// An entry already exists for the (employee, period) pair and
    /// `force_recompute` was not requested.
    #[error(
        "Payroll entry already computed for employee {employee_id} in period {period_id}; \
         use force_recompute to replace it"
    )]
    AlreadyComputed {
        /// The employee the entry belongs to.
        employee_id: Uuid,
        /// The period the entry belongs to.
        period_id: Uuid,
    },

    /// Attempted to recompute a DTR already included in a closed payroll.
    #[error("Daily time record for employee {employee_id} on {date} is finalized")]
    DtrFinalized {
        /// The employee the record belongs to.
        employee_id: Uuid,
        /// The record's date.
        date: NaiveDate,
    },

    /// A computation for the (employee, period) pair is already in flight.
    #[error("Computation already in progress for employee {employee_id} in period {period_id}")]
    ComputationInProgress {
        /// The employee being computed.
        employee_id: Uuid,
        /// The period being computed.
        period_id: Uuid,
    },
}

impl EngineError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidContributionTable { .. }
            | EngineError::EmployeeNotFound { .. }
            | EngineError::ScheduleNotConfigured { .. }
            | EngineError::PeriodNotFound { .. }
            | EngineError::CycleNotFound { .. }
            | EngineError::EntryNotFound { .. } => ErrorKind::Configuration,
            EngineError::InvalidPeriodTransition { .. }
            | EngineError::InvalidEntryTransition { .. }
            | EngineError::PeriodNotDeletable { .. }
            | EngineError::PeriodNotComputable { .. }
            | EngineError::DtrFinalized { .. }
            | EngineError::AlreadyComputed { .. } => ErrorKind::BusinessRule,
            EngineError::ComputationInProgress { .. } => ErrorKind::Concurrency,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid_1() -> Uuid {
        Uuid::from_u128(1)
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
    }

    #[test]
    fn test_schedule_not_configured_displays_employee() {
        let error = EngineError::ScheduleNotConfigured {
            employee_id: uuid_1(),
        };
        assert!(error.to_string().contains("No active work schedule"));
        assert!(error.to_string().contains(&uuid_1().to_string()));
    }

    #[test]
    fn test_invalid_period_transition_displays_statuses() {
        let error = EngineError::InvalidPeriodTransition {
            from: PeriodStatus::Locked,
            to: PeriodStatus::Open,
        };
        assert_eq!(
            error.to_string(),
            "Invalid period transition from locked to open"
        );
    }

    #[test]
    fn test_already_computed_mentions_force_recompute() {
        let error = EngineError::AlreadyComputed {
            employee_id: uuid_1(),
            period_id: uuid_1(),
        };
        assert!(error.to_string().contains("force_recompute"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            EngineError::ScheduleNotConfigured {
                employee_id: uuid_1()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            EngineError::PeriodNotDeletable {
                period_id: uuid_1(),
                status: PeriodStatus::Open
            }
            .kind(),
            ErrorKind::BusinessRule
        );
        assert_eq!(
            EngineError::ComputationInProgress {
                employee_id: uuid_1(),
                period_id: uuid_1()
            }
            .kind(),
            ErrorKind::Concurrency
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::PeriodNotFound {
                period_id: uuid_1(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
