//! Step-by-step trace models for diagnostic reconciliation runs.
//!
//! A verbose single-employee run records one [`TraceStep`] per decision the
//! pipeline makes (work-year resolution, balance creation, usage sync,
//! carry-forward), so an operator can see exactly why a balance changed.

use serde::{Deserialize, Serialize};

/// A single step in a reconciliation trace.
///
/// # Example
///
/// ```
/// use leave_engine::models::TraceStep;
///
/// let step = TraceStep {
///     step_number: 1,
///     rule_id: "work_year_resolution".to_string(),
///     rule_name: "Work Year Resolution".to_string(),
///     work_year: None,
///     input: serde_json::json!({"hire_date": "2023-11-01", "reference_date": "2024-11-01"}),
///     output: serde_json::json!({"work_year": 1, "leave_year": 2025}),
///     reasoning: "2024-11-01 is on or after the 2024 anniversary".to_string(),
/// };
/// assert_eq!(step.rule_id, "work_year_resolution");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The work year the step concerns, if it concerns a single one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_year: Option<u32>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning raised during reconciliation that does not stop the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl TraceWarning {
    /// Warning for a leave type that fell back to the default category.
    pub fn unmapped_leave_type(code: &str, request_id: &str) -> Self {
        Self {
            code: "UNMAPPED_LEAVE_TYPE".to_string(),
            message: format!(
                "Leave type '{}' on request '{}' is not mapped, counted as casual",
                code, request_id
            ),
            severity: "low".to_string(),
        }
    }
}

/// The complete trace of one employee's reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationTrace {
    /// All recorded steps, in execution order.
    pub steps: Vec<TraceStep>,
    /// Warnings collected along the way.
    pub warnings: Vec<TraceWarning>,
}

impl ReconciliationTrace {
    /// Returns the steps recorded for one work year.
    pub fn steps_for(&self, work_year: u32) -> impl Iterator<Item = &TraceStep> {
        self.steps
            .iter()
            .filter(move |step| step.work_year == Some(work_year))
    }
}
