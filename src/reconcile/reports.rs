//! Read-only reports.
//!
//! Nothing here writes to the stores: the anniversary report lists who
//! starts a new work year inside a window, and the leave summary shows one
//! work year of an employee together with its requests.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{AnniversaryInfo, WorkYearPeriod, anniversary_in, leave_year_for};
use crate::config::LeavePolicy;
use crate::models::{EmployeeRecord, LeaveBalance, LeaveRequest, LeaveStatus};

/// An employee whose anniversary falls inside the report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnniversaryEntry {
    /// The employee's identifier.
    pub employee_id: String,
    /// Name shown in reports.
    pub display_name: String,
    /// The anchoring hire (or joining) date.
    pub hire_date: NaiveDate,
    /// The anniversary inside the window.
    pub anniversary_date: NaiveDate,
    /// The work year that starts on the anniversary.
    pub work_year: u32,
    /// Leave year of that work year.
    pub leave_year: i32,
    /// Annual days allocated to that work year.
    pub annual_allocation: Decimal,
}

/// Anniversaries within `[from, to]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnniversaryReport {
    /// First day of the window.
    pub from: NaiveDate,
    /// Last day of the window (inclusive).
    pub to: NaiveDate,
    /// Number of entries.
    pub total_anniversaries: usize,
    /// Sum of the annual allocations the anniversaries open.
    pub total_annual_allocated: Decimal,
    /// Entries ordered by anniversary date, then employee id.
    pub entries: Vec<AnniversaryEntry>,
}

impl AnniversaryReport {
    /// Collects the anniversaries of `employees` inside `[from, to]`.
    ///
    /// Inactive employees and employees without a hire date are skipped. The
    /// hire date itself is not an anniversary. An employee appears once per
    /// anniversary, so a window longer than a year can list someone twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::config::LeavePolicy;
    /// use leave_engine::models::EmployeeRecord;
    /// use leave_engine::reconcile::AnniversaryReport;
    /// use chrono::NaiveDate;
    ///
    /// let employee: EmployeeRecord = serde_json::from_str(
    ///     r#"{ "id": "emp_001", "hire_date": "2023-11-01" }"#,
    /// ).unwrap();
    /// let report = AnniversaryReport::build(
    ///     &[employee],
    ///     NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 11, 15).unwrap(),
    ///     &LeavePolicy::default(),
    /// );
    /// assert_eq!(report.entries.len(), 1);
    /// assert_eq!(report.entries[0].work_year, 2);
    /// ```
    pub fn build(
        employees: &[EmployeeRecord],
        from: NaiveDate,
        to: NaiveDate,
        policy: &LeavePolicy,
    ) -> Self {
        let mut entries = Vec::new();

        for employee in employees.iter().filter(|e| e.is_active) {
            let Some(hire_date) = employee.anchor_date() else {
                continue;
            };
            let first_year = from.year().max(hire_date.year().saturating_add(1));
            for year in first_year..=to.year() {
                let Some(anniversary_date) = anniversary_in(hire_date, year) else {
                    continue;
                };
                if anniversary_date < from || anniversary_date > to {
                    continue;
                }
                let Ok(work_year) = u32::try_from(year - hire_date.year()) else {
                    continue;
                };
                entries.push(AnniversaryEntry {
                    employee_id: employee.id.clone(),
                    display_name: employee.label().to_string(),
                    hire_date,
                    anniversary_date,
                    work_year,
                    leave_year: leave_year_for(hire_date, work_year),
                    annual_allocation: policy.allocation_for(work_year, Some(employee)).annual,
                });
            }
        }

        entries.sort_by(|a, b| {
            (a.anniversary_date, &a.employee_id).cmp(&(b.anniversary_date, &b.employee_id))
        });

        Self {
            from,
            to,
            total_anniversaries: entries.len(),
            total_annual_allocated: entries.iter().map(|e| e.annual_allocation).sum(),
            entries,
        }
    }
}

/// Request counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatistics {
    /// All active requests in the work year.
    pub total_requests: u32,
    /// Approved requests.
    pub approved: u32,
    /// Requests awaiting a decision.
    pub pending: u32,
    /// Rejected requests.
    pub rejected: u32,
    /// Withdrawn requests.
    pub cancelled: u32,
    /// Days of the approved requests.
    pub total_days_approved: Decimal,
}

impl RequestStatistics {
    /// Tallies `requests`.
    pub fn from_requests<'a>(requests: impl IntoIterator<Item = &'a LeaveRequest>) -> Self {
        let mut stats = Self::default();
        for request in requests {
            stats.total_requests += 1;
            match request.status {
                LeaveStatus::Approved => {
                    stats.approved += 1;
                    stats.total_days_approved += request.total_days;
                }
                LeaveStatus::Pending => stats.pending += 1,
                LeaveStatus::Rejected => stats.rejected += 1,
                LeaveStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }
}

/// One work year of an employee: period, stored balance and requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveSummary {
    /// The employee's identifier.
    pub employee_id: String,
    /// Name shown in reports.
    pub display_name: String,
    /// The anchoring hire (or joining) date.
    pub hire_date: NaiveDate,
    /// The summarized work year.
    pub work_year: u32,
    /// Its leave year.
    pub leave_year: i32,
    /// Its calendar span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<WorkYearPeriod>,
    /// The stored balance, if one exists yet.
    pub balance: Option<LeaveBalance>,
    /// Anniversary information as of the viewing day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anniversary: Option<AnniversaryInfo>,
    /// Request counts by status.
    pub statistics: RequestStatistics,
    /// Active requests of the work year, most recent first.
    pub requests: Vec<LeaveRequest>,
}
