//! HTTP API module for the leave reconciliation engine.
//!
//! This module exposes batch and single-employee reconciliation plus the
//! read-only carry-forward, work-year, anniversary and leave summary views
//! as REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AnniversaryQuery, DEFAULT_ANNIVERSARY_WINDOW_DAYS, LeaveSummaryQuery, ReconcileBatchBody,
    ReconcileEmployeeBody, WorkYearsQuery,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
