//! The payroll engine façade.
//!
//! [`PayrollEngine`] owns the store, settings, and the computation guard,
//! and exposes every operation the web layer calls: DTR computation and HR
//! actions, period aggregation, contribution calculation, payroll entry
//! computation (synchronous preview and background batch), and the period
//! and entry status transitions.
//!
//! Every operation takes an explicit [`TenantId`]; the engine is cheap to
//! clone and safe to share across worker tasks.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    PeriodSummary, ResolvedShift, calculate_dtr, punch_window, resolve_shift, summarize_period,
};
use crate::config::EngineSettings;
use crate::contributions::ContributionCalculator;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ContributionBreakdown, DailyTimeRecord, DtrStatus, Employee, EntryStatus, PayrollEntry,
    PayrollPeriod, PeriodStatus, TenantId, generate_periods,
};
use crate::payroll::{
    BatchOutcome, ComputationGuard, ComputationInputs, EmployeeFailure, JobHandle, build_entry,
};
use crate::store::EngineStore;

/// The engine façade shared by all callers.
#[derive(Clone)]
pub struct PayrollEngine {
    store: Arc<EngineStore>,
    settings: EngineSettings,
    guard: ComputationGuard,
}

impl PayrollEngine {
    /// Creates an engine with an empty store.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            store: Arc::new(EngineStore::new()),
            settings,
            guard: ComputationGuard::new(),
        }
    }

    /// Returns the underlying store, for seeding and administration.
    pub fn store(&self) -> &EngineStore {
        &self.store
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ---- DTR operations --------------------------------------------------

    fn resolved_shift_for(
        &self,
        tenant: TenantId,
        employee: &Employee,
        date: NaiveDate,
    ) -> EngineResult<ResolvedShift> {
        let schedule_id = employee
            .schedule_id
            .ok_or(EngineError::ScheduleNotConfigured {
                employee_id: employee.id,
            })?;
        let schedule = self
            .store
            .schedule(tenant, schedule_id)
            .filter(|s| s.status == crate::models::ScheduleStatus::Active)
            .ok_or(EngineError::ScheduleNotConfigured {
                employee_id: employee.id,
            })?;

        let holiday = self.store.holiday_on(tenant, date);
        let on_leave = self.store.on_approved_leave(tenant, employee.id, date);
        Ok(resolve_shift(&schedule, date, holiday.as_ref(), on_leave))
    }

    /// Computes (or recomputes) the DTR for one (employee, date) and
    /// persists it.
    ///
    /// # Errors
    ///
    /// Configuration errors for a missing employee or schedule;
    /// [`EngineError::DtrFinalized`] when the record is already part of a
    /// closed payroll.
    pub fn calculate_for_date(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<DailyTimeRecord> {
        let employee = self.store.employee(tenant, employee_id)?;
        let previous = self.store.dtr(tenant, employee_id, date);
        if previous.as_ref().is_some_and(|p| p.status == DtrStatus::Finalized) {
            return Err(EngineError::DtrFinalized { employee_id, date });
        }

        let resolved = self.resolved_shift_for(tenant, &employee, date)?;
        let (from, to) = punch_window(&resolved);
        let punches = self.store.punches_between(tenant, employee_id, from, to);

        let dtr = calculate_dtr(
            employee_id,
            &resolved,
            &punches,
            previous.as_ref(),
            &self.settings,
        );
        self.store.upsert_dtr(tenant, dtr.clone());
        Ok(dtr)
    }

    /// Computes the DTRs of a date range, one record per date.
    ///
    /// Dates whose record is already finalized are returned as-is rather
    /// than recomputed; configuration errors surface immediately since they
    /// apply to every date in the range alike.
    pub fn calculate_for_date_range(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<DailyTimeRecord>> {
        let mut records = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            match self.calculate_for_date(tenant, employee_id, date) {
                Ok(dtr) => records.push(dtr),
                Err(EngineError::DtrFinalized { .. }) => {
                    if let Some(existing) = self.store.dtr(tenant, employee_id, date) {
                        records.push(existing);
                    }
                }
                Err(other) => return Err(other),
            }
        }
        Ok(records)
    }

    /// Approves the overtime on a DTR. Touches only the approval flag.
    pub fn approve_overtime(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<DailyTimeRecord> {
        self.store.update_dtr(tenant, employee_id, date, |dtr| {
            if dtr.status == DtrStatus::Finalized {
                return Err(EngineError::DtrFinalized { employee_id, date });
            }
            dtr.overtime_approved = true;
            Ok(())
        })
    }

    /// Clears the review flag on a DTR after HR has resolved it.
    pub fn resolve_review(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<DailyTimeRecord> {
        self.store.update_dtr(tenant, employee_id, date, |dtr| {
            if dtr.status == DtrStatus::Finalized {
                return Err(EngineError::DtrFinalized { employee_id, date });
            }
            dtr.needs_review = false;
            dtr.review_reason = None;
            Ok(())
        })
    }

    /// Rolls up the stored DTRs of a date range. Gaps are reported in the
    /// summary, never failures.
    pub fn get_period_summary(
        &self,
        tenant: TenantId,
        employee_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<PeriodSummary> {
        self.store.employee(tenant, employee_id)?;
        let dtrs = self.store.dtrs_in_range(tenant, employee_id, start, end);
        Ok(summarize_period(employee_id, start, end, &dtrs))
    }

    // ---- contributions ---------------------------------------------------

    /// Computes the statutory contribution breakdown for a salary.
    ///
    /// `effective_date` defaults to today. Missing tables yield partial
    /// results, not errors.
    pub fn calculate_all_contributions(
        &self,
        tenant: TenantId,
        salary: Decimal,
        effective_date: Option<NaiveDate>,
    ) -> ContributionBreakdown {
        let tables = self.store.tables(tenant);
        ContributionCalculator::calculate_all(&tables, salary, effective_date)
    }

    // ---- periods ---------------------------------------------------------

    /// Generates and persists the periods of one calendar month from a
    /// cycle's cutoff rules.
    pub fn generate_periods_for_month(
        &self,
        tenant: TenantId,
        cycle_id: Uuid,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<PayrollPeriod>> {
        let cycle = self.store.cycle(tenant, cycle_id)?;
        let periods = generate_periods(&cycle, year, month);
        for period in &periods {
            self.store.put_period(tenant, period.clone());
        }
        Ok(periods)
    }

    /// Transitions a period's status, enforcing the transition table.
    ///
    /// Closing a period finalizes every DTR in its cutoff range, which is
    /// what permanently forbids recomputation under it.
    pub fn transition_period_status(
        &self,
        tenant: TenantId,
        period_id: Uuid,
        target: PeriodStatus,
    ) -> EngineResult<PayrollPeriod> {
        let period = self
            .store
            .update_period(tenant, period_id, |p| p.transition_to(target))?;
        if target == PeriodStatus::Closed {
            self.store
                .finalize_dtrs_in_range(tenant, period.cutoff_start, period.cutoff_end);
        }
        info!(%tenant, %period_id, status = %target, "Period transitioned");
        Ok(period)
    }

    /// Deletes a period, which is only legal while Draft.
    pub fn delete_period(&self, tenant: TenantId, period_id: Uuid) -> EngineResult<()> {
        self.store.delete_period(tenant, period_id)
    }

    // ---- entries ---------------------------------------------------------

    /// Transitions an entry's status, enforcing the transition table.
    ///
    /// Marking an entry Paid settles its loan installment lines against
    /// the outstanding balances.
    pub fn transition_entry_status(
        &self,
        tenant: TenantId,
        entry_id: Uuid,
        target: EntryStatus,
    ) -> EngineResult<PayrollEntry> {
        let entry = self
            .store
            .update_entry(tenant, entry_id, |e| e.transition_to(target))?;
        if target == EntryStatus::Paid {
            self.settle_loans(tenant, &entry);
        }
        info!(%tenant, %entry_id, status = %target, "Entry transitioned");
        Ok(entry)
    }

    fn settle_loans(&self, tenant: TenantId, entry: &PayrollEntry) {
        use crate::models::DeductionType;
        let mut loans = self.store.loans_for(tenant, entry.employee_id);
        for line in entry
            .deductions
            .iter()
            .filter(|l| l.deduction_type == DeductionType::Loan)
        {
            if let Some(loan) = loans.iter_mut().find(|l| l.label == line.label) {
                loan.apply_installment(line.amount);
                self.store.replace_loan(tenant, loan.clone());
            }
        }
    }

    fn assemble_entry(
        &self,
        tenant: TenantId,
        period: &PayrollPeriod,
        employee_id: Uuid,
    ) -> EngineResult<PayrollEntry> {
        let employee = self.store.employee(tenant, employee_id)?;
        let cycle = self.store.cycle(tenant, period.cycle_id)?;
        let dtrs = self
            .store
            .dtrs_in_range(tenant, employee_id, period.cutoff_start, period.cutoff_end);
        let summary =
            summarize_period(employee_id, period.cutoff_start, period.cutoff_end, &dtrs);
        let adjustments = self.store.adjustments_for(tenant, employee_id);
        let loans = self.store.loans_for(tenant, employee_id);
        let tables = self.store.tables(tenant);
        let contributions = ContributionCalculator::calculate_all(
            &tables,
            employee.monthly_rate,
            Some(period.pay_date),
        );

        Ok(build_entry(&ComputationInputs {
            employee: &employee,
            period,
            frequency: cycle.frequency,
            summary: &summary,
            dtrs: &dtrs,
            adjustments: &adjustments,
            loans: &loans,
            contributions,
            settings: &self.settings,
        }))
    }

    /// Computes one employee's entry without persisting anything — the
    /// synchronous preview path, sharing all logic with the batch path.
    pub fn preview_payroll_computation(
        &self,
        tenant: TenantId,
        period_id: Uuid,
        employee_id: Uuid,
    ) -> EngineResult<PayrollEntry> {
        let period = self.store.period(tenant, period_id)?;
        if !period.status.allows_computation() {
            return Err(EngineError::PeriodNotComputable {
                period_id,
                status: period.status,
            });
        }
        self.assemble_entry(tenant, &period, employee_id)
    }

    /// Computes and persists one employee's entry for a period.
    ///
    /// Holds the (employee, period) exclusivity marker for the duration;
    /// an existing entry is replaced only under `force_recompute`, and the
    /// replacement swaps all line items in one write.
    pub fn compute_entry(
        &self,
        tenant: TenantId,
        period_id: Uuid,
        employee_id: Uuid,
        force_recompute: bool,
    ) -> EngineResult<PayrollEntry> {
        let period = self.store.period(tenant, period_id)?;
        if !period.status.allows_computation() {
            return Err(EngineError::PeriodNotComputable {
                period_id,
                status: period.status,
            });
        }

        let _lease = self.guard.acquire(employee_id, period_id)?;

        let existing = self.store.entry_for(tenant, employee_id, period_id);
        if existing.is_some() && !force_recompute {
            return Err(EngineError::AlreadyComputed {
                employee_id,
                period_id,
            });
        }

        let mut entry = self.assemble_entry(tenant, &period, employee_id)?;
        if let Some(previous) = existing {
            entry.id = previous.id;
        }
        self.store.upsert_entry(tenant, entry.clone());
        info!(
            %tenant,
            %employee_id,
            %period_id,
            gross = %entry.gross_pay,
            net = %entry.net_pay,
            "Payroll entry computed"
        );
        Ok(entry)
    }

    /// Dispatches a background batch computing entries for a period.
    ///
    /// The period moves Open -> Processing on dispatch. Employees compute
    /// in parallel with no ordering between them, each isolated: one
    /// employee's configuration error lands in the outcome without
    /// aborting the rest. Entries are upserts, so re-dispatching after a
    /// crash cannot duplicate them.
    pub fn dispatch_payroll_computation(
        &self,
        tenant: TenantId,
        period_id: Uuid,
        employee_ids: Option<Vec<Uuid>>,
        force_recompute: bool,
    ) -> EngineResult<JobHandle> {
        let period = self.store.period(tenant, period_id)?;
        match period.status {
            PeriodStatus::Open => {
                self.store
                    .update_period(tenant, period_id, |p| {
                        p.transition_to(PeriodStatus::Processing)
                    })?;
            }
            PeriodStatus::Processing => {}
            status => {
                return Err(EngineError::PeriodNotComputable { period_id, status });
            }
        }

        let population: Vec<Uuid> = employee_ids.unwrap_or_else(|| {
            self.store
                .active_employees(tenant)
                .into_iter()
                .map(|e| e.id)
                .collect()
        });

        let job_id = Uuid::new_v4();
        let engine = self.clone();
        info!(
            %tenant,
            %period_id,
            %job_id,
            employees = population.len(),
            force_recompute,
            "Payroll computation dispatched"
        );

        let handle = tokio::spawn(async move {
            let mut tasks = JoinSet::new();
            for employee_id in population {
                let engine = engine.clone();
                tasks.spawn(async move {
                    (
                        employee_id,
                        engine.compute_entry(tenant, period_id, employee_id, force_recompute),
                    )
                });
            }

            let mut outcome = BatchOutcome {
                period_id,
                ..BatchOutcome::default()
            };
            while let Some(joined) = tasks.join_next().await {
                let Ok((employee_id, result)) = joined else {
                    continue;
                };
                match result {
                    Ok(_) => outcome.computed.push(employee_id),
                    Err(EngineError::AlreadyComputed { .. }) => {
                        outcome.skipped.push(employee_id)
                    }
                    Err(err) => {
                        warn!(%employee_id, error = %err, "Employee computation failed");
                        outcome.failed.push(EmployeeFailure {
                            employee_id,
                            kind: err.kind(),
                            message: err.to_string(),
                        });
                    }
                }
            }
            info!(
                %job_id,
                computed = outcome.computed.len(),
                skipped = outcome.skipped.len(),
                failed = outcome.failed.len(),
                "Payroll computation batch finished"
            );
            outcome
        });

        Ok(JobHandle::new(job_id, handle))
    }
}
