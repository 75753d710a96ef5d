//! Per-balance pipeline steps that touch the store.
//!
//! Each step here wraps a pure calculation with its persistence call and
//! turns store failures into [`EngineError::Persistence`] carrying the
//! employee and work year.

use tracing::{debug, info};

use crate::calculation::{UsageSyncResult, synchronize_usage};
use crate::error::{EngineError, EngineResult, StoreError};
use crate::models::{LeaveBalance, LeaveRequest, ReconciliationTrace, TraceStep, TraceWarning};
use crate::store::{Ensured, LeaveBalanceStore};

/// Numbers trace steps and keeps them when the run is verbose.
///
/// Step numbers advance even when nothing is kept so that log lines from
/// quiet and verbose runs line up.
#[derive(Debug)]
pub(crate) struct TraceRecorder {
    verbose: bool,
    next_step: u32,
    trace: ReconciliationTrace,
}

impl TraceRecorder {
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            verbose,
            next_step: 1,
            trace: ReconciliationTrace::default(),
        }
    }

    pub(crate) fn next_step(&self) -> u32 {
        self.next_step
    }

    pub(crate) fn record(&mut self, employee_id: &str, step: TraceStep) {
        if self.verbose {
            info!(
                employee_id = %employee_id,
                step = step.step_number,
                rule = %step.rule_id,
                work_year = ?step.work_year,
                "{}",
                step.reasoning
            );
            self.trace.steps.push(step);
        } else {
            debug!(
                employee_id = %employee_id,
                step = step.step_number,
                rule = %step.rule_id,
                work_year = ?step.work_year,
                "{}",
                step.reasoning
            );
        }
        self.next_step += 1;
    }

    pub(crate) fn warn(&mut self, warning: TraceWarning) {
        if self.verbose {
            self.trace.warnings.push(warning);
        }
    }

    pub(crate) fn finish(self) -> Option<ReconciliationTrace> {
        self.verbose.then_some(self.trace)
    }
}

fn persistence_error(balance: &LeaveBalance, source: StoreError) -> EngineError {
    EngineError::Persistence {
        employee_id: balance.employee_id.clone(),
        work_year: balance.work_year,
        source,
    }
}

/// Creates `template` unless its balance already exists.
///
/// A `DuplicateKey` means a concurrent writer created the balance between
/// our check and insert; the second `ensure` then reads it back.
pub(crate) async fn ensure_balance(
    store: &dyn LeaveBalanceStore,
    template: LeaveBalance,
) -> EngineResult<Ensured> {
    match store.ensure(template.clone()).await {
        Ok(ensured) => Ok(ensured),
        Err(StoreError::DuplicateKey {
            employee_id,
            work_year,
        }) => {
            debug!(
                employee_id = %employee_id,
                work_year,
                "Balance created concurrently, re-reading"
            );
            store
                .ensure(template.clone())
                .await
                .map_err(|e| persistence_error(&template, e))
        }
        Err(e) => Err(persistence_error(&template, e)),
    }
}

/// Recomputes usage for one balance and writes it back if it changed.
pub(crate) async fn sync_balance(
    store: &dyn LeaveBalanceStore,
    balance: &LeaveBalance,
    requests: &[LeaveRequest],
    recorder: &mut TraceRecorder,
) -> EngineResult<UsageSyncResult> {
    let result = synchronize_usage(balance, requests, recorder.next_step());

    if result.changed {
        store
            .save(&result.balance)
            .await
            .map_err(|e| persistence_error(&result.balance, e))?;
    }

    for warning in &result.warnings {
        recorder.warn(warning.clone());
    }
    recorder.record(&balance.employee_id, result.trace_step.clone());

    Ok(result)
}

/// Writes a carry-forward correction.
pub(crate) async fn persist_fix(
    store: &dyn LeaveBalanceStore,
    balance: &LeaveBalance,
) -> EngineResult<()> {
    store
        .save(balance)
        .await
        .map_err(|e| persistence_error(balance, e))
}
