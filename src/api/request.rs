//! Request types for the leave reconciliation API.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::reconcile::BatchRequest;

/// Request body for `POST /reconcile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileBatchBody {
    /// Maximum number of employees to process.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Date to resolve work years against; today when omitted.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl ReconcileBatchBody {
    /// Converts the body into a batch request, defaulting the date to `today`.
    pub fn into_batch(self, today: NaiveDate) -> BatchRequest {
        BatchRequest {
            limit: self.limit,
            reference_date: self.reference_date.unwrap_or(today),
        }
    }
}

/// Request body for `POST /employees/:id/reconcile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileEmployeeBody {
    /// Date to resolve work years against; today when omitted.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    /// Return the step-by-step trace.
    #[serde(default)]
    pub verbose: bool,
}

/// Query string for `GET /employees/:id/work-years`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkYearsQuery {
    /// The day to view the work years from; today when omitted.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Days an anniversary window spans when only its start is given.
pub const DEFAULT_ANNIVERSARY_WINDOW_DAYS: i64 = 30;

/// Query string for `GET /anniversaries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnniversaryQuery {
    /// First day of the window; today when omitted.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last day of the window; 30 days after `from` when omitted.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl AnniversaryQuery {
    /// Resolves the window, defaulting its ends from `today`.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let from = self.from.unwrap_or(today);
        let to = self
            .to
            .unwrap_or_else(|| from + Duration::days(DEFAULT_ANNIVERSARY_WINDOW_DAYS));
        (from, to)
    }
}

/// Query string for `GET /employees/:id/leave-summary`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveSummaryQuery {
    /// Work year to summarize; the current one when omitted.
    #[serde(default)]
    pub work_year: Option<u32>,
    /// The viewing day; today when omitted.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}
