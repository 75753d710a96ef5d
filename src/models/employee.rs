//! Employee model as seen by the reconciliation engine.
//!
//! Employees are owned by the HR system; the engine only reads the fields it
//! needs to anchor work years and to pick allocations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-employee overrides of the default leave allocations.
///
/// Any field left empty falls back to the policy default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveEntitlement {
    /// Annual days allocated per work year.
    #[serde(default)]
    pub annual: Option<Decimal>,
    /// Sick days allocated per work year.
    #[serde(default)]
    pub sick: Option<Decimal>,
    /// Casual days allocated per work year.
    #[serde(default)]
    pub casual: Option<Decimal>,
}

/// An employee subject to leave reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// Name used in reports.
    #[serde(default)]
    pub display_name: String,
    /// The contractual hire date.
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    /// The joining date, used when no hire date was recorded.
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    /// Whether the employee is currently employed.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Optional allocation overrides.
    #[serde(default)]
    pub leave_config: Option<LeaveEntitlement>,
}

fn default_active() -> bool {
    true
}

impl EmployeeRecord {
    /// Returns the date work years are anchored to.
    ///
    /// The hire date wins; the joining date is only used when no hire date
    /// was recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::EmployeeRecord;
    /// use chrono::NaiveDate;
    ///
    /// let employee = EmployeeRecord {
    ///     id: "emp_001".to_string(),
    ///     display_name: "Ayesha Khan".to_string(),
    ///     hire_date: None,
    ///     joining_date: NaiveDate::from_ymd_opt(2023, 11, 1),
    ///     is_active: true,
    ///     leave_config: None,
    /// };
    /// assert_eq!(employee.anchor_date(), NaiveDate::from_ymd_opt(2023, 11, 1));
    /// ```
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        self.hire_date.or(self.joining_date)
    }

    /// Returns the display name, or the id when no name is recorded.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}
