//! Reconciliation report models.
//!
//! [`EmployeeReport`] is the per-employee result shared by batch and
//! single-employee runs; [`BatchReport`] aggregates a whole run and keeps the
//! itemized failure list bounded for very large populations.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LeaveBalance, LeaveCategory, ReconciliationTrace};
use crate::error::EngineError;

/// Counters describing what a reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationCounts {
    /// Work-year balances walked by the pipeline.
    pub work_years_processed: u32,
    /// Balances created because they did not exist yet.
    pub balances_created: u32,
    /// Balances whose usage counters were rewritten.
    pub usage_updated: u32,
    /// Balances whose carry forward was corrected.
    pub carry_forward_fixed: u32,
    /// Counted requests whose leave type fell back to casual.
    pub unmapped_leave_types: u32,
}

impl ReconciliationCounts {
    /// Adds another set of counters into this one.
    pub fn absorb(&mut self, other: &ReconciliationCounts) {
        self.work_years_processed += other.work_years_processed;
        self.balances_created += other.balances_created;
        self.usage_updated += other.usage_updated;
        self.carry_forward_fixed += other.carry_forward_fixed;
        self.unmapped_leave_types += other.unmapped_leave_types;
    }

    /// Total number of balance writes these counters represent.
    pub fn writes(&self) -> u32 {
        self.balances_created + self.usage_updated + self.carry_forward_fixed
    }
}

/// An error attached to a failed employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedError {
    /// Stable error code (see [`EngineError::kind`]).
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// The work year at which the pipeline stopped, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_year: Option<u32>,
}

impl From<&EngineError> for ReportedError {
    fn from(error: &EngineError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
            work_year: error.work_year(),
        }
    }
}

/// The outcome of reconciling one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeReport {
    /// The employee's identifier.
    pub employee_id: String,
    /// The employee's display name.
    pub display_name: String,
    /// True when every pipeline step completed.
    pub success: bool,
    /// The work year the reference date falls in, once resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_work_year: Option<u32>,
    /// What the pipeline changed, including partial progress on failure.
    #[serde(flatten)]
    pub counts: ReconciliationCounts,
    /// Why the pipeline failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportedError>,
    /// Step-by-step narration, only for verbose runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ReconciliationTrace>,
}

/// A failed employee as listed in a batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// The employee's identifier.
    pub employee_id: String,
    /// The employee's display name.
    pub display_name: String,
    /// The failure.
    pub error: ReportedError,
}

/// Summary of a batch reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique id of this run, also attached to log lines.
    pub run_id: Uuid,
    /// The date work years were resolved against.
    pub reference_date: NaiveDate,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// Employees the run attempted.
    pub processed: usize,
    /// Employees reconciled without error.
    pub succeeded: usize,
    /// Employees with an error.
    pub failed: usize,
    /// `succeeded / processed` as a percentage with two decimals.
    pub success_rate: Decimal,
    /// Counters summed over every employee.
    pub totals: ReconciliationCounts,
    /// The first failures, capped at the configured limit.
    pub failures: Vec<FailureEntry>,
    /// Failures not itemized because of the cap.
    pub failures_omitted: usize,
    /// Per-employee results, in the order employees were fetched.
    #[serde(skip)]
    pub results: Vec<EmployeeReport>,
}

impl BatchReport {
    /// Aggregates per-employee results into a report.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{BatchReport, EmployeeReport, ReconciliationCounts};
    /// use chrono::{NaiveDate, Utc};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let ok = EmployeeReport {
    ///     employee_id: "emp_001".to_string(),
    ///     display_name: "Ayesha".to_string(),
    ///     success: true,
    ///     current_work_year: Some(1),
    ///     counts: ReconciliationCounts::default(),
    ///     error: None,
    ///     trace: None,
    /// };
    /// let report = BatchReport::from_results(
    ///     Uuid::new_v4(),
    ///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     Utc::now(),
    ///     12,
    ///     vec![ok],
    ///     20,
    /// );
    /// assert_eq!(report.succeeded, 1);
    /// assert_eq!(report.success_rate, Decimal::new(10000, 2));
    /// ```
    pub fn from_results(
        run_id: Uuid,
        reference_date: NaiveDate,
        started_at: DateTime<Utc>,
        duration_ms: u64,
        results: Vec<EmployeeReport>,
        failure_limit: usize,
    ) -> Self {
        let mut totals = ReconciliationCounts::default();
        let mut failures = Vec::new();
        let mut failed = 0;

        for result in &results {
            totals.absorb(&result.counts);
            if result.success {
                continue;
            }
            failed += 1;
            if let Some(error) = result.error.as_ref().filter(|_| failures.len() < failure_limit) {
                failures.push(FailureEntry {
                    employee_id: result.employee_id.clone(),
                    display_name: result.display_name.clone(),
                    error: error.clone(),
                });
            }
        }

        let processed = results.len();
        let succeeded = processed - failed;
        let success_rate = if processed == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(succeeded as u64) * Decimal::ONE_HUNDRED
                / Decimal::from(processed as u64))
            .round_dp(2)
        };

        Self {
            run_id,
            reference_date,
            started_at,
            duration_ms,
            processed,
            succeeded,
            failed,
            success_rate,
            totals,
            failures_omitted: failed - failures.len(),
            failures,
            results,
        }
    }

    /// True when no employee failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Leave reconciliation run {}", self.run_id)?;
        writeln!(f, "  Reference date:        {}", self.reference_date)?;
        writeln!(f, "  Employees processed:   {}", self.processed)?;
        writeln!(f, "  Succeeded:             {}", self.succeeded)?;
        writeln!(f, "  Failed:                {}", self.failed)?;
        writeln!(f, "  Success rate:          {}%", self.success_rate)?;
        writeln!(f, "  Work years processed:  {}", self.totals.work_years_processed)?;
        writeln!(f, "  Balances created:      {}", self.totals.balances_created)?;
        writeln!(f, "  Usage updates:         {}", self.totals.usage_updated)?;
        writeln!(f, "  Carry forward fixes:   {}", self.totals.carry_forward_fixed)?;
        writeln!(f, "  Duration:              {} ms", self.duration_ms)?;

        if !self.failures.is_empty() {
            writeln!(f, "Failures:")?;
            for (idx, failure) in self.failures.iter().enumerate() {
                writeln!(
                    f,
                    "  {}. {} ({}): {}",
                    idx + 1,
                    failure.display_name,
                    failure.employee_id,
                    failure.error.message
                )?;
            }
            if self.failures_omitted > 0 {
                writeln!(f, "  ... and {} more", self.failures_omitted)?;
            }
        }
        Ok(())
    }
}

/// One amount per leave category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmounts {
    /// Annual leave amount.
    pub annual: Decimal,
    /// Sick leave amount.
    pub sick: Decimal,
    /// Casual leave amount.
    pub casual: Decimal,
}

impl CategoryAmounts {
    /// Collects one field of every category of a balance.
    pub fn from_balance(
        balance: &LeaveBalance,
        field: impl Fn(&super::CategoryBalance) -> Decimal,
    ) -> Self {
        Self {
            annual: field(balance.category(LeaveCategory::Annual)),
            sick: field(balance.category(LeaveCategory::Sick)),
            casual: field(balance.category(LeaveCategory::Casual)),
        }
    }

    fn add(&mut self, other: &CategoryAmounts) {
        self.annual += other.annual;
        self.sick += other.sick;
        self.casual += other.casual;
    }
}

/// Carry-forward state of one work year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkYearSummary {
    /// The work year.
    pub work_year: u32,
    /// The calendar year of its anniversary.
    pub leave_year: i32,
    /// Carried forward days per category.
    pub carried_forward: CategoryAmounts,
    /// Remaining days per category.
    pub remaining: CategoryAmounts,
    /// Used days per category.
    pub used: CategoryAmounts,
    /// Days taken beyond what was available, per category.
    pub advance: CategoryAmounts,
    /// Sum of `advance` over the categories.
    pub total_advance: Decimal,
}

/// Carry-forward overview across all of an employee's work years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryForwardSummary {
    /// The employee's identifier.
    pub employee_id: String,
    /// One entry per stored balance, ascending by work year.
    pub work_years: Vec<WorkYearSummary>,
    /// Sum of carried forward days over all work years.
    pub total_carried_forward: CategoryAmounts,
    /// Sum of overdrawn days over all work years.
    pub total_advance: Decimal,
}

impl CarryForwardSummary {
    /// Builds the summary from an employee's balances.
    pub fn from_balances(employee_id: impl Into<String>, balances: &[LeaveBalance]) -> Self {
        let mut ordered: Vec<&LeaveBalance> = balances.iter().collect();
        ordered.sort_by_key(|b| b.work_year);

        let mut total_carried_forward = CategoryAmounts::default();
        let mut total_advance = Decimal::ZERO;
        let work_years = ordered
            .into_iter()
            .map(|balance| {
                let carried_forward =
                    CategoryAmounts::from_balance(balance, |c| c.carried_forward);
                total_carried_forward.add(&carried_forward);
                total_advance += balance.total_advance();
                WorkYearSummary {
                    work_year: balance.work_year,
                    leave_year: balance.leave_year,
                    carried_forward,
                    remaining: CategoryAmounts::from_balance(balance, |c| c.remaining),
                    used: CategoryAmounts::from_balance(balance, |c| c.used),
                    advance: CategoryAmounts::from_balance(balance, |c| c.advance()),
                    total_advance: balance.total_advance(),
                }
            })
            .collect();

        Self {
            employee_id: employee_id.into(),
            work_years,
            total_carried_forward,
            total_advance,
        }
    }
}
