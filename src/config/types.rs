//! Configuration types for leave reconciliation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{CarryForwardCaps, leave_year_for};
use crate::error::{EngineError, EngineResult};
use crate::models::{CategoryAmounts, CategoryBalance, EmployeeRecord, LeaveBalance};

/// Default allocations granted to every work year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPolicy {
    /// Annual leave days per work year.
    pub annual: Decimal,
    /// Sick leave days per work year.
    pub sick: Decimal,
    /// Casual leave days per work year.
    pub casual: Decimal,
    /// First work year that receives an annual allocation.
    #[serde(default)]
    pub annual_from_work_year: u32,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            annual: Decimal::new(20, 0),
            sick: Decimal::new(10, 0),
            casual: Decimal::new(10, 0),
            annual_from_work_year: 0,
        }
    }
}

/// Leave policy from policy.yaml.
///
/// # Example
///
/// ```
/// use leave_engine::config::LeavePolicy;
/// use rust_decimal::Decimal;
///
/// let policy = LeavePolicy::default();
/// let allocation = policy.allocation_for(1, None);
/// assert_eq!(allocation.annual, Decimal::new(20, 0));
/// assert_eq!(policy.carry_forward.max_total, Decimal::new(40, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePolicy {
    /// Default allocations.
    pub allocations: AllocationPolicy,
    /// Carry-forward caps.
    #[serde(default)]
    pub carry_forward: CarryForwardCaps,
}

impl LeavePolicy {
    /// Returns the allocations for a work year, applying employee overrides.
    pub fn allocation_for(
        &self,
        work_year: u32,
        employee: Option<&EmployeeRecord>,
    ) -> CategoryAmounts {
        let overrides = employee.and_then(|e| e.leave_config.as_ref());
        let annual = if work_year >= self.allocations.annual_from_work_year {
            overrides
                .and_then(|o| o.annual)
                .unwrap_or(self.allocations.annual)
        } else {
            Decimal::ZERO
        };

        CategoryAmounts {
            annual,
            sick: overrides
                .and_then(|o| o.sick)
                .unwrap_or(self.allocations.sick),
            casual: overrides
                .and_then(|o| o.casual)
                .unwrap_or(self.allocations.casual),
        }
    }

    /// Builds the template a missing balance is created from.
    ///
    /// New balances start with nothing used and nothing carried; the
    /// reconciliation pipeline fills both in afterwards.
    pub fn new_balance(
        &self,
        employee: &EmployeeRecord,
        hire_date: chrono::NaiveDate,
        work_year: u32,
    ) -> LeaveBalance {
        let allocation = self.allocation_for(work_year, Some(employee));
        LeaveBalance::new(
            employee.id.clone(),
            work_year,
            leave_year_for(hire_date, work_year),
            CategoryBalance::with_allocation(allocation.annual),
            CategoryBalance::with_allocation(allocation.sick),
            CategoryBalance::with_allocation(allocation.casual),
        )
    }

    /// Checks that every amount is non-negative and the caps are coherent.
    pub fn validate(&self) -> EngineResult<()> {
        let amounts = [
            ("allocations.annual", self.allocations.annual),
            ("allocations.sick", self.allocations.sick),
            ("allocations.casual", self.allocations.casual),
            (
                "carry_forward.max_per_transfer",
                self.carry_forward.max_per_transfer,
            ),
            ("carry_forward.max_total", self.carry_forward.max_total),
        ];

        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    field: field.to_string(),
                    message: format!("must not be negative, got {}", value),
                });
            }
        }

        Ok(())
    }
}

fn default_max_concurrency() -> usize {
    8
}

fn default_progress_interval() -> usize {
    50
}

fn default_failure_report_limit() -> usize {
    100
}

/// Batch execution settings from reconciliation.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSettings {
    /// Employees reconciled at the same time.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// A progress line is logged after this many employees.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    /// Failures itemized in a batch report before the rest are only counted.
    #[serde(default = "default_failure_report_limit")]
    pub failure_report_limit: usize,
    /// Employee limit applied when a batch request does not set one.
    #[serde(default)]
    pub default_employee_limit: Option<usize>,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            progress_interval: default_progress_interval(),
            failure_report_limit: default_failure_report_limit(),
            default_employee_limit: None,
        }
    }
}

impl ReconcileSettings {
    /// Rejects settings that would stall a batch.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_concurrency == 0 {
            return Err(EngineError::InvalidConfig {
                field: "max_concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.progress_interval == 0 {
            return Err(EngineError::InvalidConfig {
                field: "progress_interval".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Allocation and carry-forward policy.
    pub policy: LeavePolicy,
    /// Batch execution settings.
    pub settings: ReconcileSettings,
}
