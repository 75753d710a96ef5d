//! HTTP request handlers for the leave reconciliation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{
    AnniversaryQuery, LeaveSummaryQuery, ReconcileBatchBody, ReconcileEmployeeBody,
    WorkYearsQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reconcile", post(reconcile_batch_handler))
        .route("/employees/:id/reconcile", post(reconcile_employee_handler))
        .route("/employees/:id/carry-forward", get(carry_forward_handler))
        .route("/employees/:id/work-years", get(work_years_handler))
        .route("/employees/:id/leave-summary", get(leave_summary_handler))
        .route("/anniversaries", get(anniversaries_handler))
        .with_state(state)
}

/// Turns a body rejection into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::new("VALIDATION_ERROR", body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

fn engine_error_response(correlation_id: Uuid, err: crate::error::EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        kind = err.kind(),
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

/// Handler for POST /reconcile.
///
/// Runs a batch and returns the aggregate report. Employee failures are part
/// of the report; only a store that cannot be reached yields an error status.
async fn reconcile_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileBatchBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch reconciliation request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let request = body.into_batch(Utc::now().date_naive());
    match state.reconciler().run_batch(request).await {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %report.run_id,
                processed = report.processed,
                failed = report.failed,
                "Batch reconciliation request completed"
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /employees/:id/reconcile.
async fn reconcile_employee_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<ReconcileEmployeeBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        "Processing employee reconciliation request"
    );

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let reference_date = body.reference_date.unwrap_or_else(|| Utc::now().date_naive());
    let start_time = Instant::now();
    match state
        .reconciler()
        .run_single(&employee_id, reference_date, body.verbose)
        .await
    {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                success = report.success,
                writes = report.counts.writes(),
                duration_us = start_time.elapsed().as_micros() as u64,
                "Employee reconciliation completed"
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/carry-forward.
async fn carry_forward_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.reconciler().carry_forward_summary(&employee_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/work-years.
async fn work_years_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Query(query): Query<WorkYearsQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    match state.reconciler().work_years(&employee_id, today).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/leave-summary.
async fn leave_summary_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Query(query): Query<LeaveSummaryQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    match state
        .reconciler()
        .leave_summary(&employee_id, query.work_year, today)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /anniversaries.
///
/// Lists anniversaries between `from` and `to`, by default the next 30 days.
async fn anniversaries_handler(
    State(state): State<AppState>,
    Query(query): Query<AnniversaryQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let (from, to) = query.window(Utc::now().date_naive());
    match state.reconciler().anniversaries(from, to).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => engine_error_response(correlation_id, err),
    }
}
