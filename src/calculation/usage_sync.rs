//! Usage synchronization.
//!
//! Recomputes the `used` counters of one work-year balance from the leave
//! requests that belong to it. The recompute starts from zero every time, so
//! running it twice over the same requests yields the same balance.

use rust_decimal::Decimal;

use crate::models::{LeaveBalance, LeaveCategory, LeaveRequest, TraceStep, TraceWarning};

use super::category::map_leave_type;

/// The result of synchronizing usage for one balance.
#[derive(Debug, Clone)]
pub struct UsageSyncResult {
    /// The balance with `used` recomputed and derived fields refreshed.
    pub balance: LeaveBalance,
    /// True when the recomputed balance differs from the input.
    pub changed: bool,
    /// Number of requests that counted toward usage.
    pub counted_requests: u32,
    /// Warnings for counted requests whose leave type was not mapped.
    pub warnings: Vec<TraceWarning>,
    /// The trace step recording this calculation.
    pub trace_step: TraceStep,
}

impl UsageSyncResult {
    /// Number of counted requests that fell back to the default category.
    pub fn unmapped_count(&self) -> u32 {
        self.warnings.len() as u32
    }
}

/// Recomputes the `used` counters of `balance` from `requests`.
///
/// Only active, approved requests count. Each one is mapped to a category
/// and its `total_days` added to that category. The returned balance is
/// derived and ready to persist; `changed` tells the caller whether a write
/// is needed at all.
///
/// # Arguments
///
/// * `balance` - The stored balance for one work year
/// * `requests` - The employee's requests belonging to that work year
/// * `step_number` - The step number for trace sequencing
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::synchronize_usage;
/// use leave_engine::models::{CategoryBalance, LeaveBalance, LeaveRequest, LeaveStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let balance = LeaveBalance::new(
///     "emp_001",
///     0,
///     2024,
///     CategoryBalance::with_allocation(Decimal::new(20, 0)),
///     CategoryBalance::with_allocation(Decimal::new(10, 0)),
///     CategoryBalance::with_allocation(Decimal::new(10, 0)),
/// );
/// let request = LeaveRequest {
///     id: "lr_1".to_string(),
///     employee_id: "emp_001".to_string(),
///     leave_type_code: "AL".to_string(),
///     leave_type_name: None,
///     start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
///     end_date: None,
///     total_days: Decimal::new(15, 0),
///     work_year: Some(0),
///     leave_year: None,
///     is_active: true,
///     status: LeaveStatus::Approved,
/// };
///
/// let result = synchronize_usage(&balance, &[request], 1);
/// assert!(result.changed);
/// assert_eq!(result.balance.annual.used, Decimal::new(15, 0));
/// assert_eq!(result.balance.annual.remaining, Decimal::new(5, 0));
/// ```
pub fn synchronize_usage(
    balance: &LeaveBalance,
    requests: &[LeaveRequest],
    step_number: u32,
) -> UsageSyncResult {
    let mut synced = balance.clone();
    for category in LeaveCategory::ALL {
        synced.category_mut(category).used = Decimal::ZERO;
    }

    let mut counted_requests = 0u32;
    let mut warnings = Vec::new();
    let mut counted_ids = Vec::new();

    for request in requests.iter().filter(|r| r.counts_toward_usage()) {
        let resolution =
            map_leave_type(&request.leave_type_code, request.leave_type_name.as_deref());
        if resolution.is_default() {
            warnings.push(TraceWarning::unmapped_leave_type(
                &request.leave_type_code,
                &request.id,
            ));
        }

        synced.category_mut(resolution.category).used += request.total_days;
        counted_requests += 1;
        counted_ids.push(request.id.clone());
    }

    let synced = synced.derive();
    let changed = synced != *balance;

    let trace_step = TraceStep {
        step_number,
        rule_id: "usage_sync".to_string(),
        rule_name: "Usage Synchronization".to_string(),
        work_year: Some(balance.work_year),
        input: serde_json::json!({
            "requests_seen": requests.len(),
            "counted_request_ids": counted_ids,
            "previous_used": {
                "annual": balance.annual.used.normalize().to_string(),
                "sick": balance.sick.used.normalize().to_string(),
                "casual": balance.casual.used.normalize().to_string()
            }
        }),
        output: serde_json::json!({
            "used": {
                "annual": synced.annual.used.normalize().to_string(),
                "sick": synced.sick.used.normalize().to_string(),
                "casual": synced.casual.used.normalize().to_string()
            },
            "remaining": {
                "annual": synced.annual.remaining.normalize().to_string(),
                "sick": synced.sick.remaining.normalize().to_string(),
                "casual": synced.casual.remaining.normalize().to_string()
            },
            "changed": changed
        }),
        reasoning: format!(
            "Counted {} of {} requests for work year {}: annual {}, sick {}, casual {} days used{}",
            counted_requests,
            requests.len(),
            balance.work_year,
            synced.annual.used.normalize(),
            synced.sick.used.normalize(),
            synced.casual.used.normalize(),
            if changed { "" } else { " (unchanged)" }
        ),
    };

    UsageSyncResult {
        balance: synced,
        changed,
        counted_requests,
        warnings,
        trace_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryBalance, LeaveStatus};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn balance() -> LeaveBalance {
        LeaveBalance::new(
            "emp_001",
            0,
            2024,
            CategoryBalance::with_allocation(dec("20")),
            CategoryBalance::with_allocation(dec("10")),
            CategoryBalance::with_allocation(dec("10")),
        )
    }

    fn request(id: &str, code: &str, days: &str, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            leave_type_code: code.to_string(),
            leave_type_name: None,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: None,
            total_days: dec(days),
            work_year: Some(0),
            leave_year: Some(2024),
            is_active: true,
            status,
        }
    }

    #[test]
    fn test_sums_approved_requests_per_category() {
        let requests = vec![
            request("lr_1", "AL", "10", LeaveStatus::Approved),
            request("lr_2", "AL", "5", LeaveStatus::Approved),
            request("lr_3", "SL", "1.5", LeaveStatus::Approved),
            request("lr_4", "CL", "2", LeaveStatus::Approved),
        ];

        let result = synchronize_usage(&balance(), &requests, 1);
        assert_eq!(result.balance.annual.used, dec("15"));
        assert_eq!(result.balance.annual.remaining, dec("5"));
        assert_eq!(result.balance.sick.used, dec("1.5"));
        assert_eq!(result.balance.sick.remaining, dec("8.5"));
        assert_eq!(result.balance.casual.used, dec("2"));
        assert_eq!(result.counted_requests, 4);
        assert!(result.changed);
    }

    #[test]
    fn test_ignores_pending_rejected_and_inactive() {
        let mut inactive = request("lr_4", "AL", "3", LeaveStatus::Approved);
        inactive.is_active = false;
        let requests = vec![
            request("lr_1", "AL", "2", LeaveStatus::Pending),
            request("lr_2", "AL", "2", LeaveStatus::Rejected),
            request("lr_3", "AL", "2", LeaveStatus::Cancelled),
            inactive,
        ];

        let result = synchronize_usage(&balance(), &requests, 1);
        assert_eq!(result.balance.annual.used, Decimal::ZERO);
        assert_eq!(result.counted_requests, 0);
        assert!(!result.changed);
    }

    #[test]
    fn test_stale_usage_is_reset() {
        let mut stale = balance();
        stale.annual.used = dec("7");
        let stale = stale.derive();

        let result = synchronize_usage(&stale, &[], 1);
        assert_eq!(result.balance.annual.used, Decimal::ZERO);
        assert_eq!(result.balance.annual.remaining, dec("20"));
        assert!(result.changed);
    }

    #[test]
    fn test_second_sync_is_unchanged() {
        let requests = vec![request("lr_1", "AL", "4", LeaveStatus::Approved)];

        let first = synchronize_usage(&balance(), &requests, 1);
        let second = synchronize_usage(&first.balance, &requests, 2);
        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(first.balance, second.balance);
    }

    #[test]
    fn test_unmapped_type_counts_as_casual_with_warning() {
        let requests = vec![request("lr_9", "STUDY", "3", LeaveStatus::Approved)];

        let result = synchronize_usage(&balance(), &requests, 1);
        assert_eq!(result.balance.casual.used, dec("3"));
        assert_eq!(result.unmapped_count(), 1);
        assert_eq!(result.warnings[0].code, "UNMAPPED_LEAVE_TYPE");
    }

    #[test]
    fn test_overuse_goes_negative() {
        let requests = vec![request("lr_1", "CL", "12", LeaveStatus::Approved)];

        let result = synchronize_usage(&balance(), &requests, 1);
        assert_eq!(result.balance.casual.remaining, dec("-2"));
        assert_eq!(result.balance.casual.advance(), dec("2"));
    }

    #[test]
    fn test_carry_forward_is_untouched() {
        let mut carried = balance();
        carried.annual.carried_forward = dec("5");
        carried.is_carried_forward = true;
        let carried = carried.derive();

        let requests = vec![request("lr_1", "AL", "3", LeaveStatus::Approved)];
        let result = synchronize_usage(&carried, &requests, 1);
        assert_eq!(result.balance.annual.carried_forward, dec("5"));
        assert_eq!(result.balance.annual.remaining, dec("22"));
        assert!(result.balance.is_carried_forward);
    }

    #[test]
    fn test_trace_step_records_work_year() {
        let result = synchronize_usage(&balance(), &[], 7);
        assert_eq!(result.trace_step.step_number, 7);
        assert_eq!(result.trace_step.rule_id, "usage_sync");
        assert_eq!(result.trace_step.work_year, Some(0));
    }
}
