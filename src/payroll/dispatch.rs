//! Batch dispatch machinery for payroll computation.
//!
//! A dispatched job computes many employees under one period in the
//! background. The [`ComputationGuard`] provides the per-(employee, period)
//! exclusivity marker: a second concurrent computation for the same pair
//! fails fast with a concurrency error instead of racing the first.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, ErrorKind};

/// Guards against duplicate concurrent computation of one (employee,
/// period) pair.
#[derive(Debug, Clone, Default)]
pub struct ComputationGuard {
    in_flight: Arc<Mutex<HashSet<(Uuid, Uuid)>>>,
}

/// A held exclusivity marker; released on drop.
#[derive(Debug)]
pub struct ComputationLease {
    guard: ComputationGuard,
    key: (Uuid, Uuid),
}

impl ComputationGuard {
    /// Creates a guard with nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the marker for (employee, period), failing fast when a
    /// computation for the pair is already running.
    ///
    /// # Errors
    ///
    /// [`EngineError::ComputationInProgress`] when the pair is held.
    pub fn acquire(&self, employee_id: Uuid, period_id: Uuid) -> EngineResult<ComputationLease> {
        let key = (employee_id, period_id);
        let mut in_flight = self.in_flight.lock().expect("guard lock poisoned");
        if !in_flight.insert(key) {
            return Err(EngineError::ComputationInProgress {
                employee_id,
                period_id,
            });
        }
        Ok(ComputationLease {
            guard: self.clone(),
            key,
        })
    }
}

impl Drop for ComputationLease {
    fn drop(&mut self) {
        self.guard
            .in_flight
            .lock()
            .expect("guard lock poisoned")
            .remove(&self.key);
    }
}

/// One employee's failure inside a batch, isolated from the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFailure {
    /// The employee that failed.
    pub employee_id: Uuid,
    /// The error classification, driving retry policy.
    pub kind: ErrorKind,
    /// The rendered error message.
    pub message: String,
}

/// The result of one batch computation job.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// The period computed.
    pub period_id: Uuid,
    /// Employees whose entries were written.
    pub computed: Vec<Uuid>,
    /// Employees skipped because an entry already existed and
    /// `force_recompute` was not set.
    pub skipped: Vec<Uuid>,
    /// Per-employee failures; one employee's configuration error never
    /// aborts the others.
    pub failed: Vec<EmployeeFailure>,
}

/// Handle to a dispatched background computation job.
pub struct JobHandle {
    /// Identifier for tracking the job in logs.
    pub job_id: Uuid,
    handle: JoinHandle<BatchOutcome>,
}

impl JobHandle {
    pub(crate) fn new(job_id: Uuid, handle: JoinHandle<BatchOutcome>) -> Self {
        Self { job_id, handle }
    }

    /// Waits for the batch to finish and returns its outcome.
    ///
    /// # Errors
    ///
    /// The [`JoinError`] of the underlying task if it panicked or was
    /// aborted; already-written entries stay written either way, and the
    /// job may simply be re-dispatched.
    pub async fn join(self) -> Result<BatchOutcome, JoinError> {
        self.handle.await
    }
}
