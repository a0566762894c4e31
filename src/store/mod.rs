//! In-memory tenant-scoped persistence.
//!
//! The store models the logical persisted layout: schedules, punches,
//! holidays, leaves, DTRs (unique on employee+date), periods, entries
//! (unique on employee+period), adjustments, loans, and contribution
//! tables, each partitioned by tenant. Every operation takes an explicit
//! [`TenantId`] — there is no ambient tenant.
//!
//! Uniqueness is structural: DTRs and entries are keyed maps, so an upsert
//! replaces the whole record (all line items included) in a single write —
//! a half-overwritten entry cannot be observed.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::contributions::ContributionTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DailyTimeRecord, Employee, EmployeeAdjustment, EmployeeLoan, Holiday, LeaveRecord,
    PayrollCycle, PayrollEntry, PayrollPeriod, Punch, TenantId, WorkSchedule,
};

#[derive(Default)]
struct TenantState {
    employees: HashMap<Uuid, Employee>,
    schedules: HashMap<Uuid, WorkSchedule>,
    cycles: HashMap<Uuid, PayrollCycle>,
    punches: HashMap<Uuid, Vec<Punch>>,
    holidays: HashMap<NaiveDate, Holiday>,
    leaves: Vec<LeaveRecord>,
    dtrs: HashMap<(Uuid, NaiveDate), DailyTimeRecord>,
    periods: HashMap<Uuid, PayrollPeriod>,
    entries: HashMap<(Uuid, Uuid), PayrollEntry>,
    adjustments: Vec<EmployeeAdjustment>,
    loans: Vec<EmployeeLoan>,
    tables: ContributionTables,
}

/// The in-memory engine store.
///
/// Readers take the lock briefly and clone out what they need, so no lock
/// is held across computation. Contribution tables and schedules are only
/// written through administrative setters, matching their read-only role
/// during computation.
#[derive(Default)]
pub struct EngineStore {
    tenants: RwLock<HashMap<TenantId, TenantState>>,
}

impl EngineStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tenant<T>(&self, tenant: TenantId, f: impl FnOnce(&TenantState) -> T) -> T {
        let guard = self.tenants.read().expect("store lock poisoned");
        match guard.get(&tenant) {
            Some(state) => f(state),
            None => f(&TenantState::default()),
        }
    }

    fn with_tenant_mut<T>(&self, tenant: TenantId, f: impl FnOnce(&mut TenantState) -> T) -> T {
        let mut guard = self.tenants.write().expect("store lock poisoned");
        f(guard.entry(tenant).or_default())
    }

    // ---- administrative setters ------------------------------------------

    /// Inserts or replaces an employee.
    pub fn put_employee(&self, tenant: TenantId, employee: Employee) {
        self.with_tenant_mut(tenant, |s| {
            s.employees.insert(employee.id, employee);
        });
    }

    /// Inserts or replaces a work schedule.
    pub fn put_schedule(&self, tenant: TenantId, schedule: WorkSchedule) {
        self.with_tenant_mut(tenant, |s| {
            s.schedules.insert(schedule.id, schedule);
        });
    }

    /// Inserts or replaces a payroll cycle.
    pub fn put_cycle(&self, tenant: TenantId, cycle: PayrollCycle) {
        self.with_tenant_mut(tenant, |s| {
            s.cycles.insert(cycle.id, cycle);
        });
    }

    /// Records a raw punch.
    pub fn add_punch(&self, tenant: TenantId, punch: Punch) {
        self.with_tenant_mut(tenant, |s| {
            s.punches.entry(punch.employee_id).or_default().push(punch);
        });
    }

    /// Declares a holiday.
    pub fn put_holiday(&self, tenant: TenantId, holiday: Holiday) {
        self.with_tenant_mut(tenant, |s| {
            s.holidays.insert(holiday.date, holiday);
        });
    }

    /// Records a leave day.
    pub fn put_leave(&self, tenant: TenantId, leave: LeaveRecord) {
        self.with_tenant_mut(tenant, |s| s.leaves.push(leave));
    }

    /// Registers an adjustment.
    pub fn put_adjustment(&self, tenant: TenantId, adjustment: EmployeeAdjustment) {
        self.with_tenant_mut(tenant, |s| s.adjustments.push(adjustment));
    }

    /// Registers a loan.
    pub fn put_loan(&self, tenant: TenantId, loan: EmployeeLoan) {
        self.with_tenant_mut(tenant, |s| s.loans.push(loan));
    }

    /// Replaces a loan by id (used when settling installments).
    pub fn replace_loan(&self, tenant: TenantId, loan: EmployeeLoan) {
        self.with_tenant_mut(tenant, |s| {
            if let Some(existing) = s.loans.iter_mut().find(|l| l.id == loan.id) {
                *existing = loan;
            }
        });
    }

    /// Sets the tenant's contribution tables.
    pub fn set_tables(&self, tenant: TenantId, tables: ContributionTables) {
        self.with_tenant_mut(tenant, |s| s.tables = tables);
    }

    // ---- reads -----------------------------------------------------------

    /// Fetches an employee.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmployeeNotFound`] when absent.
    pub fn employee(&self, tenant: TenantId, employee_id: Uuid) -> EngineResult<Employee> {
        self.with_tenant(tenant, |s| s.employees.get(&employee_id).cloned())
            .ok_or(EngineError::EmployeeNotFound { employee_id })
    }

    /// Lists active employees, the default batch population.
    pub fn active_employees(&self, tenant: TenantId) -> Vec<Employee> {
        self.with_tenant(tenant, |s| {
            s.employees
                .values()
                .filter(|e| e.is_active())
                .cloned()
                .collect()
        })
    }

    /// Fetches a schedule by id.
    pub fn schedule(&self, tenant: TenantId, schedule_id: Uuid) -> Option<WorkSchedule> {
        self.with_tenant(tenant, |s| s.schedules.get(&schedule_id).cloned())
    }

    /// Fetches a payroll cycle.
    ///
    /// # Errors
    ///
    /// [`EngineError::CycleNotFound`] when absent.
    pub fn cycle(&self, tenant: TenantId, cycle_id: Uuid) -> EngineResult<PayrollCycle> {
        self.with_tenant(tenant, |s| s.cycles.get(&cycle_id).cloned())
            .ok_or(EngineError::CycleNotFound { cycle_id })
    }

    /// Punches for an employee within `[from, to)`.
    pub fn punches_between(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Vec<Punch> {
        self.with_tenant(tenant, |s| {
            s.punches
                .get(&employee_id)
                .map(|punches| {
                    punches
                        .iter()
                        .filter(|p| p.timestamp >= from && p.timestamp < to)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// The declared holiday on a date, if any.
    pub fn holiday_on(&self, tenant: TenantId, date: NaiveDate) -> Option<Holiday> {
        self.with_tenant(tenant, |s| s.holidays.get(&date).cloned())
    }

    /// Whether the employee has approved leave on a date.
    pub fn on_approved_leave(&self, tenant: TenantId, employee_id: Uuid, date: NaiveDate) -> bool {
        self.with_tenant(tenant, |s| {
            s.leaves
                .iter()
                .any(|l| l.employee_id == employee_id && l.date == date && l.approved)
        })
    }

    /// Adjustments for one employee.
    pub fn adjustments_for(&self, tenant: TenantId, employee_id: Uuid) -> Vec<EmployeeAdjustment> {
        self.with_tenant(tenant, |s| {
            s.adjustments
                .iter()
                .filter(|a| a.employee_id == employee_id)
                .cloned()
                .collect()
        })
    }

    /// Loans for one employee.
    pub fn loans_for(&self, tenant: TenantId, employee_id: Uuid) -> Vec<EmployeeLoan> {
        self.with_tenant(tenant, |s| {
            s.loans
                .iter()
                .filter(|l| l.employee_id == employee_id)
                .cloned()
                .collect()
        })
    }

    /// The tenant's contribution tables.
    pub fn tables(&self, tenant: TenantId) -> ContributionTables {
        self.with_tenant(tenant, |s| s.tables.clone())
    }

    // ---- DTRs ------------------------------------------------------------

    /// The DTR for one (employee, date), if computed.
    pub fn dtr(&self, tenant: TenantId, employee_id: Uuid, date: NaiveDate) -> Option<DailyTimeRecord> {
        self.with_tenant(tenant, |s| s.dtrs.get(&(employee_id, date)).cloned())
    }

    /// DTRs for one employee across an inclusive date range.
    pub fn dtrs_in_range(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<DailyTimeRecord> {
        self.with_tenant(tenant, |s| {
            let mut records: Vec<DailyTimeRecord> = s
                .dtrs
                .values()
                .filter(|d| d.employee_id == employee_id && d.date >= start && d.date <= end)
                .cloned()
                .collect();
            records.sort_by_key(|d| d.date);
            records
        })
    }

    /// Inserts or replaces the DTR for its (employee, date) key.
    pub fn upsert_dtr(&self, tenant: TenantId, dtr: DailyTimeRecord) {
        self.with_tenant_mut(tenant, |s| {
            s.dtrs.insert((dtr.employee_id, dtr.date), dtr);
        });
    }

    /// Applies a mutation to an existing DTR under the write lock.
    ///
    /// # Errors
    ///
    /// Whatever the mutation returns (the record is written back only on
    /// success), or [`EngineError::EmployeeNotFound`] when no DTR exists for
    /// the pair.
    pub fn update_dtr(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        date: NaiveDate,
        f: impl FnOnce(&mut DailyTimeRecord) -> EngineResult<()>,
    ) -> EngineResult<DailyTimeRecord> {
        self.with_tenant_mut(tenant, |s| {
            let dtr = s
                .dtrs
                .get_mut(&(employee_id, date))
                .ok_or(EngineError::EmployeeNotFound { employee_id })?;
            f(dtr)?;
            Ok(dtr.clone())
        })
    }

    // ---- periods and entries --------------------------------------------

    /// Inserts or replaces a period.
    pub fn put_period(&self, tenant: TenantId, period: PayrollPeriod) {
        self.with_tenant_mut(tenant, |s| {
            s.periods.insert(period.id, period);
        });
    }

    /// Fetches a period.
    ///
    /// # Errors
    ///
    /// [`EngineError::PeriodNotFound`] when absent.
    pub fn period(&self, tenant: TenantId, period_id: Uuid) -> EngineResult<PayrollPeriod> {
        self.with_tenant(tenant, |s| s.periods.get(&period_id).cloned())
            .ok_or(EngineError::PeriodNotFound { period_id })
    }

    /// Applies a mutation to a period under the write lock.
    pub fn update_period(
        &self,
        tenant: TenantId,
        period_id: Uuid,
        f: impl FnOnce(&mut PayrollPeriod) -> EngineResult<()>,
    ) -> EngineResult<PayrollPeriod> {
        self.with_tenant_mut(tenant, |s| {
            let period = s
                .periods
                .get_mut(&period_id)
                .ok_or(EngineError::PeriodNotFound { period_id })?;
            f(period)?;
            Ok(period.clone())
        })
    }

    /// Deletes a period, which is only legal while Draft.
    ///
    /// # Errors
    ///
    /// [`EngineError::PeriodNotDeletable`] for non-draft periods,
    /// [`EngineError::PeriodNotFound`] when absent.
    pub fn delete_period(&self, tenant: TenantId, period_id: Uuid) -> EngineResult<()> {
        self.with_tenant_mut(tenant, |s| {
            let period = s
                .periods
                .get(&period_id)
                .ok_or(EngineError::PeriodNotFound { period_id })?;
            if !period.is_deletable() {
                return Err(EngineError::PeriodNotDeletable {
                    period_id,
                    status: period.status,
                });
            }
            s.periods.remove(&period_id);
            Ok(())
        })
    }

    /// The entry for one (employee, period), if computed.
    pub fn entry_for(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        period_id: Uuid,
    ) -> Option<PayrollEntry> {
        self.with_tenant(tenant, |s| s.entries.get(&(employee_id, period_id)).cloned())
    }

    /// Finds an entry by its id.
    ///
    /// # Errors
    ///
    /// [`EngineError::EntryNotFound`] when absent.
    pub fn entry(&self, tenant: TenantId, entry_id: Uuid) -> EngineResult<PayrollEntry> {
        self.with_tenant(tenant, |s| {
            s.entries.values().find(|e| e.id == entry_id).cloned()
        })
        .ok_or(EngineError::EntryNotFound { entry_id })
    }

    /// Inserts or replaces the entry for its (employee, period) key in one
    /// write: earlier line items vanish with the record they belonged to.
    pub fn upsert_entry(&self, tenant: TenantId, entry: PayrollEntry) {
        self.with_tenant_mut(tenant, |s| {
            s.entries.insert((entry.employee_id, entry.period_id), entry);
        });
    }

    /// Applies a mutation to an entry by id.
    pub fn update_entry(
        &self,
        tenant: TenantId,
        entry_id: Uuid,
        f: impl FnOnce(&mut PayrollEntry) -> EngineResult<()>,
    ) -> EngineResult<PayrollEntry> {
        self.with_tenant_mut(tenant, |s| {
            let entry = s
                .entries
                .values_mut()
                .find(|e| e.id == entry_id)
                .ok_or(EngineError::EntryNotFound { entry_id })?;
            f(entry)?;
            Ok(entry.clone())
        })
    }

    /// Marks every draft DTR in a date range finalized, called when the
    /// owning period closes.
    pub fn finalize_dtrs_in_range(
        &self,
        tenant: TenantId,
        start: NaiveDate,
        end: NaiveDate,
    ) {
        use crate::models::DtrStatus;
        self.with_tenant_mut(tenant, |s| {
            for dtr in s.dtrs.values_mut() {
                if dtr.date >= start && dtr.date <= end {
                    dtr.status = DtrStatus::Finalized;
                }
            }
        });
    }
}
