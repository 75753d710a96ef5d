//! Reconciliation driver.
//!
//! The [`Reconciler`] runs the per-employee pipeline:
//!
//! 1. Resolve the current work year from the hire date
//! 2. Ensure a balance exists for every work year up to the next one
//! 3. Recompute usage on every stored balance
//! 4. Propagate carry forward along the whole chain
//!
//! A batch runs the pipeline for many employees with bounded concurrency.
//! Any failure inside one employee's pipeline becomes a failed entry in the
//! report; only a store that cannot list employees aborts the batch.
//!
//! The anniversary report and the leave summary only read the stores.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    AnniversaryInfo, WorkYearPeriod, anniversary_info, available_work_years, leave_year_for,
    resolve_work_year, work_year_period,
};
use crate::config::{EngineConfig, LeavePolicy, ReconcileSettings};
use crate::error::{EngineError, EngineResult, StoreError};
use crate::models::{
    BatchReport, CarryForwardSummary, EmployeeRecord, EmployeeReport, LeaveRequest,
    ReconciliationCounts, ReportedError, TraceStep,
};
use crate::store::Stores;

use super::pipeline::{TraceRecorder, ensure_balance, sync_balance};
use super::propagator::CarryForwardPropagator;
use super::reports::{AnniversaryReport, LeaveSummary, RequestStatistics};

/// Parameters of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Maximum number of employees to process.
    pub limit: Option<usize>,
    /// The date work years are resolved against.
    pub reference_date: NaiveDate,
}

/// An employee's work years as seen on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkYearOverview {
    /// The employee's identifier.
    pub employee_id: String,
    /// The anchoring hire (or joining) date.
    pub hire_date: NaiveDate,
    /// The work year the day falls in.
    pub current_work_year: u32,
    /// The next anniversary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anniversary: Option<AnniversaryInfo>,
    /// Work years from 0 to the one after the current, most recent first.
    pub work_years: Vec<WorkYearPeriod>,
}

/// Mutable state of one employee's pipeline run.
struct EmployeeRun {
    counts: ReconciliationCounts,
    recorder: TraceRecorder,
    current_work_year: Option<u32>,
}

fn store_unavailable(error: StoreError) -> EngineError {
    EngineError::StoreUnavailable {
        message: error.to_string(),
    }
}

/// Reconciles leave balances against leave requests.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use leave_engine::config::EngineConfig;
/// use leave_engine::reconcile::{BatchRequest, Reconciler};
/// use leave_engine::store::{Dataset, InMemoryStore, Stores};
/// use chrono::NaiveDate;
///
/// let store = Arc::new(InMemoryStore::from_dataset(Dataset::default()));
/// let reconciler = Reconciler::from_config(Stores::shared(store), EngineConfig::default());
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let report = rt
///     .block_on(reconciler.run_batch(BatchRequest {
///         limit: None,
///         reference_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     }))
///     .unwrap();
/// assert_eq!(report.processed, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Reconciler {
    stores: Stores,
    policy: Arc<LeavePolicy>,
    settings: ReconcileSettings,
    propagator: CarryForwardPropagator,
}

impl Reconciler {
    /// Creates a reconciler over the given stores.
    pub fn new(stores: Stores, policy: LeavePolicy, settings: ReconcileSettings) -> Self {
        let propagator = CarryForwardPropagator::new(policy.carry_forward);
        Self {
            stores,
            policy: Arc::new(policy),
            settings,
            propagator,
        }
    }

    /// Creates a reconciler from loaded configuration.
    pub fn from_config(stores: Stores, config: EngineConfig) -> Self {
        Self::new(stores, config.policy, config.settings)
    }

    /// The leave policy in force.
    pub fn policy(&self) -> &LeavePolicy {
        &self.policy
    }

    /// The batch settings in force.
    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    /// Reconciles every active employee with a hire date.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` when the employee list cannot be read.
    /// Per-employee failures never fail the batch; they are itemized in the
    /// returned report.
    pub async fn run_batch(&self, request: BatchRequest) -> EngineResult<BatchReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let timer = Instant::now();
        let limit = request.limit.or(self.settings.default_employee_limit);

        let employees = self
            .stores
            .employees
            .find_active_with_hire_date(limit)
            .await
            .map_err(store_unavailable)?;

        let total = employees.len();
        info!(
            run_id = %run_id,
            reference_date = %request.reference_date,
            employees = total,
            max_concurrency = self.settings.max_concurrency,
            "Starting batch reconciliation"
        );

        let reference_date = request.reference_date;
        let mut reports = stream::iter(employees)
            .map(|employee| async move {
                self.reconcile_employee(&employee, reference_date, false)
                    .await
            })
            .buffered(self.settings.max_concurrency.max(1));

        let mut results = Vec::with_capacity(total);
        while let Some(report) = reports.next().await {
            if let Some(error) = &report.error {
                warn!(
                    run_id = %run_id,
                    employee_id = %report.employee_id,
                    kind = %error.kind,
                    error = %error.message,
                    "Employee reconciliation failed"
                );
            }
            results.push(report);

            let processed = results.len();
            if processed % self.settings.progress_interval.max(1) == 0 || processed == total {
                info!(run_id = %run_id, processed, total, "Batch progress");
            }
        }

        let duration_ms = u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX);
        let report = BatchReport::from_results(
            run_id,
            reference_date,
            started_at,
            duration_ms,
            results,
            self.settings.failure_report_limit,
        );

        info!(
            run_id = %run_id,
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed,
            usage_updated = report.totals.usage_updated,
            carry_forward_fixed = report.totals.carry_forward_fixed,
            duration_ms,
            "Batch reconciliation complete"
        );

        Ok(report)
    }

    /// Reconciles one employee by id.
    ///
    /// With `verbose`, every step is logged at `info` and returned as a trace
    /// on the report.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` for an unknown id and `StoreUnavailable`
    /// when the employee cannot be read. Pipeline failures are reported on
    /// the returned [`EmployeeReport`] instead.
    pub async fn run_single(
        &self,
        employee_id: &str,
        reference_date: NaiveDate,
        verbose: bool,
    ) -> EngineResult<EmployeeReport> {
        let employee = self.find_employee(employee_id).await?;
        Ok(self
            .reconcile_employee(&employee, reference_date, verbose)
            .await)
    }

    /// Runs the pipeline for one employee record.
    pub async fn reconcile_employee(
        &self,
        employee: &EmployeeRecord,
        reference_date: NaiveDate,
        verbose: bool,
    ) -> EmployeeReport {
        let mut run = EmployeeRun {
            counts: ReconciliationCounts::default(),
            recorder: TraceRecorder::new(verbose),
            current_work_year: None,
        };

        let outcome = self.run_pipeline(employee, reference_date, &mut run).await;

        EmployeeReport {
            employee_id: employee.id.clone(),
            display_name: employee.label().to_string(),
            success: outcome.is_ok(),
            current_work_year: run.current_work_year,
            counts: run.counts,
            error: outcome.err().as_ref().map(ReportedError::from),
            trace: run.recorder.finish(),
        }
    }

    async fn run_pipeline(
        &self,
        employee: &EmployeeRecord,
        reference_date: NaiveDate,
        run: &mut EmployeeRun,
    ) -> EngineResult<()> {
        let hire_date = employee
            .anchor_date()
            .ok_or_else(|| EngineError::MissingHireDate {
                employee_id: employee.id.clone(),
            })?;

        let resolved = resolve_work_year(hire_date, reference_date);
        let current = resolved.work_year;
        let last = current + 1;
        run.current_work_year = Some(current);
        run.recorder.record(
            &employee.id,
            TraceStep {
                step_number: run.recorder.next_step(),
                rule_id: "work_year_resolution".to_string(),
                rule_name: "Work Year Resolution".to_string(),
                work_year: None,
                input: serde_json::json!({
                    "hire_date": hire_date.to_string(),
                    "reference_date": reference_date.to_string()
                }),
                output: serde_json::json!({
                    "work_year": current,
                    "leave_year": resolved.leave_year,
                    "reconciled_through": last
                }),
                reasoning: format!(
                    "{} falls in work year {} (leave year {}) for hire date {}",
                    reference_date, current, resolved.leave_year, hire_date
                ),
            },
        );

        // Step 2: ensure balances 0..=current+1
        for work_year in 0..=last {
            let template = self.policy.new_balance(employee, hire_date, work_year);
            let ensured = ensure_balance(self.stores.balances.as_ref(), template).await?;
            if ensured.created {
                run.counts.balances_created += 1;
                run.recorder.record(
                    &employee.id,
                    TraceStep {
                        step_number: run.recorder.next_step(),
                        rule_id: "balance_created".to_string(),
                        rule_name: "Balance Creation".to_string(),
                        work_year: Some(work_year),
                        input: serde_json::json!({
                            "leave_year": ensured.balance.leave_year
                        }),
                        output: serde_json::json!({
                            "annual": ensured.balance.annual.allocated.normalize().to_string(),
                            "sick": ensured.balance.sick.allocated.normalize().to_string(),
                            "casual": ensured.balance.casual.allocated.normalize().to_string()
                        }),
                        reasoning: format!(
                            "Created missing balance for work year {} with annual {}, sick {}, casual {}",
                            work_year,
                            ensured.balance.annual.allocated.normalize(),
                            ensured.balance.sick.allocated.normalize(),
                            ensured.balance.casual.allocated.normalize()
                        ),
                    },
                );
            }
        }

        // Step 3: usage per work year
        let requests = self
            .stores
            .requests
            .find_active_by_employee(&employee.id)
            .await?;
        let mut by_work_year: HashMap<u32, Vec<LeaveRequest>> = HashMap::new();
        for request in requests {
            by_work_year
                .entry(request.resolved_work_year(hire_date))
                .or_default()
                .push(request);
        }

        // Every stored balance is synced, including ones an earlier run with a
        // later reference date created; the propagator walks all of them.
        let balances = self.stores.balances.find_by_employee(&employee.id).await?;
        for balance in &balances {
            let requests = by_work_year
                .get(&balance.work_year)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let result = sync_balance(
                self.stores.balances.as_ref(),
                balance,
                requests,
                &mut run.recorder,
            )
            .await?;

            run.counts.work_years_processed += 1;
            run.counts.unmapped_leave_types += result.unmapped_count();
            if result.changed {
                run.counts.usage_updated += 1;
            }
        }

        // Step 4: carry forward over the freshly synced chain
        let chain = self.stores.balances.find_by_employee(&employee.id).await?;
        self.propagator
            .propagate(
                self.stores.balances.as_ref(),
                chain,
                &mut run.counts,
                &mut run.recorder,
            )
            .await
    }

    /// Per-work-year carry forward, remaining and used amounts for an employee.
    pub async fn carry_forward_summary(&self, employee_id: &str) -> EngineResult<CarryForwardSummary> {
        let employee = self.find_employee(employee_id).await?;
        let balances = self.stores.balances.find_by_employee(&employee.id).await?;
        Ok(CarryForwardSummary::from_balances(employee.id, &balances))
    }

    /// The work years of an employee as seen on `today`.
    pub async fn work_years(
        &self,
        employee_id: &str,
        today: NaiveDate,
    ) -> EngineResult<WorkYearOverview> {
        let employee = self.find_employee(employee_id).await?;
        let hire_date = employee
            .anchor_date()
            .ok_or_else(|| EngineError::MissingHireDate {
                employee_id: employee.id.clone(),
            })?;

        Ok(WorkYearOverview {
            current_work_year: resolve_work_year(hire_date, today).work_year,
            anniversary: anniversary_info(hire_date, today),
            work_years: available_work_years(hire_date, today),
            employee_id: employee.id,
            hire_date,
        })
    }

    /// Active employees whose anniversary falls in `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `from` is after `to` and
    /// `StoreUnavailable` when the employee list cannot be read.
    pub async fn anniversaries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<AnniversaryReport> {
        if from > to {
            return Err(EngineError::InvalidDateRange { from, to });
        }

        let employees = self
            .stores
            .employees
            .find_active_with_hire_date(None)
            .await
            .map_err(store_unavailable)?;
        let report = AnniversaryReport::build(&employees, from, to, &self.policy);

        info!(
            from = %from,
            to = %to,
            anniversaries = report.total_anniversaries,
            "Anniversary report built"
        );
        Ok(report)
    }

    /// One work year of an employee: period, stored balance and request counts.
    ///
    /// `work_year` defaults to the one `today` falls in. The stored balance is
    /// shown as is; run the reconciliation first for up-to-date usage.
    pub async fn leave_summary(
        &self,
        employee_id: &str,
        work_year: Option<u32>,
        today: NaiveDate,
    ) -> EngineResult<LeaveSummary> {
        let employee = self.find_employee(employee_id).await?;
        let hire_date = employee
            .anchor_date()
            .ok_or_else(|| EngineError::MissingHireDate {
                employee_id: employee.id.clone(),
            })?;
        let work_year = work_year.unwrap_or_else(|| resolve_work_year(hire_date, today).work_year);

        let balance = self
            .stores
            .balances
            .find_by_employee(&employee.id)
            .await?
            .into_iter()
            .find(|b| b.work_year == work_year);

        let mut requests: Vec<LeaveRequest> = self
            .stores
            .requests
            .find_active_by_employee(&employee.id)
            .await?
            .into_iter()
            .filter(|r| r.resolved_work_year(hire_date) == work_year)
            .collect();
        requests.sort_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| a.id.cmp(&b.id)));

        Ok(LeaveSummary {
            display_name: employee.label().to_string(),
            hire_date,
            work_year,
            leave_year: leave_year_for(hire_date, work_year),
            period: work_year_period(hire_date, work_year).map(|period| WorkYearPeriod {
                is_current: period.contains(today),
                ..period
            }),
            balance,
            anniversary: anniversary_info(hire_date, today),
            statistics: RequestStatistics::from_requests(&requests),
            requests,
            employee_id: employee.id,
        })
    }

    async fn find_employee(&self, employee_id: &str) -> EngineResult<EmployeeRecord> {
        self.stores
            .employees
            .find_by_id(employee_id)
            .await
            .map_err(store_unavailable)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }
}
