//! Leave request source events.
//!
//! Leave requests are owned by the HR system. The engine reads them to
//! recompute consumed days and never writes them back.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::resolve_work_year;

/// Workflow status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; counts toward usage.
    Approved,
    /// Rejected by an approver.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// A leave request as read from the leave request store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The requesting employee.
    pub employee_id: String,
    /// Leave type code (e.g. "AL", "SICK").
    pub leave_type_code: String,
    /// Leave type display name (e.g. "Annual Leave").
    #[serde(default)]
    pub leave_type_name: Option<String>,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Number of leave days, may be fractional.
    pub total_days: Decimal,
    /// Work year stamped on the request at import, if any.
    #[serde(default)]
    pub work_year: Option<u32>,
    /// Leave year stamped on the request at import, if any.
    #[serde(default)]
    pub leave_year: Option<i32>,
    /// Soft-delete flag.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Workflow status.
    pub status: LeaveStatus,
}

fn default_active() -> bool {
    true
}

impl LeaveRequest {
    /// Whether this request consumes leave days.
    pub fn counts_toward_usage(&self) -> bool {
        self.is_active && self.status == LeaveStatus::Approved
    }

    /// The work year this request belongs to.
    ///
    /// A work year stamped on the request wins; otherwise it is resolved from
    /// the start date against the employee's hire date.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::{LeaveRequest, LeaveStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let request = LeaveRequest {
    ///     id: "lr_1".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     leave_type_code: "AL".to_string(),
    ///     leave_type_name: None,
    ///     start_date: NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
    ///     end_date: None,
    ///     total_days: Decimal::new(2, 0),
    ///     work_year: None,
    ///     leave_year: None,
    ///     is_active: true,
    ///     status: LeaveStatus::Approved,
    /// };
    /// let hire = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
    /// assert_eq!(request.resolved_work_year(hire), 1);
    /// ```
    pub fn resolved_work_year(&self, hire_date: NaiveDate) -> u32 {
        self.work_year
            .unwrap_or_else(|| resolve_work_year(hire_date, self.start_date).work_year)
    }
}
