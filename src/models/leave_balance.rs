//! Leave balance ledger records.
//!
//! One [`LeaveBalance`] exists per employee and work year. Its `remaining`
//! fields are derived values: they are recomputed by [`LeaveBalance::derive`]
//! before every write, never by the store.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The closed set of leave categories a balance tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCategory {
    /// Annual leave, the only category that carries forward.
    Annual,
    /// Sick (and medical) leave.
    Sick,
    /// Casual leave; also the bucket for unmapped leave types.
    Casual,
}

impl LeaveCategory {
    /// Every category, in ledger order.
    pub const ALL: [LeaveCategory; 3] = [
        LeaveCategory::Annual,
        LeaveCategory::Sick,
        LeaveCategory::Casual,
    ];

    /// The snake_case name used in traces and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveCategory::Annual => "annual",
            LeaveCategory::Sick => "sick",
            LeaveCategory::Casual => "casual",
        }
    }
}

impl fmt::Display for LeaveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters for one leave category within one work year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBalance {
    /// Days granted for the work year.
    pub allocated: Decimal,
    /// Days consumed by approved leave requests.
    pub used: Decimal,
    /// Days carried in from the previous work year.
    pub carried_forward: Decimal,
    /// `allocated + carried_forward - used`; negative when overdrawn.
    pub remaining: Decimal,
}

impl CategoryBalance {
    /// Creates a fresh category with nothing used or carried.
    pub fn with_allocation(allocated: Decimal) -> Self {
        Self {
            allocated,
            used: Decimal::ZERO,
            carried_forward: Decimal::ZERO,
            remaining: allocated,
        }
    }

    /// Returns the category with `remaining` recomputed.
    pub fn derive(self) -> Self {
        Self {
            remaining: self.allocated + self.carried_forward - self.used,
            ..self
        }
    }

    /// Days taken beyond what was available (zero when not overdrawn).
    pub fn advance(&self) -> Decimal {
        if self.remaining < Decimal::ZERO {
            -self.remaining
        } else {
            Decimal::ZERO
        }
    }
}

/// The leave ledger for one employee in one work year.
///
/// # Example
///
/// ```
/// use leave_engine::models::{CategoryBalance, LeaveBalance};
/// use rust_decimal::Decimal;
///
/// let mut balance = LeaveBalance::new(
///     "emp_001",
///     0,
///     2024,
///     CategoryBalance::with_allocation(Decimal::new(20, 0)),
///     CategoryBalance::with_allocation(Decimal::new(10, 0)),
///     CategoryBalance::with_allocation(Decimal::new(10, 0)),
/// );
/// balance.annual.used = Decimal::new(15, 0);
///
/// let balance = balance.derive();
/// assert_eq!(balance.annual.remaining, Decimal::new(5, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee this ledger belongs to.
    pub employee_id: String,
    /// Zero-based work year index anchored to the hire date.
    pub work_year: u32,
    /// Calendar year in which this work year's anniversary falls.
    pub leave_year: i32,
    /// Annual leave counters.
    pub annual: CategoryBalance,
    /// Sick leave counters.
    pub sick: CategoryBalance,
    /// Casual leave counters.
    pub casual: CategoryBalance,
    /// True when a non-zero annual carry forward was applied.
    #[serde(default)]
    pub is_carried_forward: bool,
}

impl LeaveBalance {
    /// Creates a balance with the given allocations, already derived.
    pub fn new(
        employee_id: impl Into<String>,
        work_year: u32,
        leave_year: i32,
        annual: CategoryBalance,
        sick: CategoryBalance,
        casual: CategoryBalance,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            work_year,
            leave_year,
            annual,
            sick,
            casual,
            is_carried_forward: false,
        }
        .derive()
    }

    /// Returns the balance with every derived field recomputed.
    ///
    /// This is pure: callers invoke it before persisting so that the stored
    /// `remaining` values always agree with the counters.
    pub fn derive(self) -> Self {
        Self {
            annual: self.annual.derive(),
            sick: self.sick.derive(),
            casual: self.casual.derive(),
            ..self
        }
    }

    /// Returns the counters for one category.
    pub fn category(&self, category: LeaveCategory) -> &CategoryBalance {
        match category {
            LeaveCategory::Annual => &self.annual,
            LeaveCategory::Sick => &self.sick,
            LeaveCategory::Casual => &self.casual,
        }
    }

    /// Returns the counters for one category, mutably.
    pub fn category_mut(&mut self, category: LeaveCategory) -> &mut CategoryBalance {
        match category {
            LeaveCategory::Annual => &mut self.annual,
            LeaveCategory::Sick => &mut self.sick,
            LeaveCategory::Casual => &mut self.casual,
        }
    }

    /// Total overdrawn days across all categories.
    pub fn total_advance(&self) -> Decimal {
        LeaveCategory::ALL
            .iter()
            .map(|c| self.category(*c).advance())
            .sum()
    }
}
