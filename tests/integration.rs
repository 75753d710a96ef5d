//! Integration tests for the leave reconciliation engine.
//!
//! This suite drives whole reconciliation runs through the public API:
//! - End-to-end batch over an in-memory dataset
//! - Idempotent reruns
//! - Failure isolation between employees
//! - Resuming after a partial failure
//! - Concurrency-independent results
//! - Bounded failure reporting
//! - Anniversary and leave summary reports
//! - HTTP routes

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use leave_engine::api::{AppState, create_router};
use leave_engine::config::{ConfigLoader, EngineConfig, LeavePolicy, ReconcileSettings};
use leave_engine::error::{EngineError, StoreError, StoreResult};
use leave_engine::models::{EmployeeRecord, LeaveBalance, LeaveRequest, LeaveStatus};
use leave_engine::reconcile::{BatchRequest, Reconciler};
use leave_engine::store::{
    Dataset, EmployeeStore, Ensured, InMemoryStore, LeaveBalanceStore, Stores,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn employee(id: &str, hire_date: Option<&str>) -> EmployeeRecord {
    EmployeeRecord {
        id: id.to_string(),
        display_name: format!("Employee {}", id),
        hire_date: hire_date.map(date),
        joining_date: None,
        is_active: true,
        leave_config: None,
    }
}

fn request(id: &str, employee_id: &str, code: &str, start: &str, days: i64) -> LeaveRequest {
    LeaveRequest {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        leave_type_code: code.to_string(),
        leave_type_name: None,
        start_date: date(start),
        end_date: None,
        total_days: dec(days),
        work_year: None,
        leave_year: None,
        is_active: true,
        status: LeaveStatus::Approved,
    }
}

/// Three employees hired 2022-01-10; emp_a has a mix of leave.
fn sample_dataset() -> Dataset {
    let mut pending = request("lr_4", "emp_a", "AL", "2023-08-01", 3);
    pending.status = LeaveStatus::Pending;

    Dataset {
        employees: vec![
            employee("emp_a", Some("2022-01-10")),
            employee("emp_b", Some("2022-01-10")),
            employee("emp_c", Some("2022-01-10")),
        ],
        leave_requests: vec![
            request("lr_1", "emp_a", "AL", "2022-03-01", 5),
            request("lr_2", "emp_a", "SL", "2023-02-01", 2),
            request("lr_3", "emp_a", "AL", "2023-05-02", 10),
            pending,
            request("lr_5", "emp_a", "STUDY", "2024-02-01", 1),
            request("lr_6", "emp_b", "AL", "2022-06-01", 4),
            request("lr_7", "emp_c", "CL", "2023-03-01", 2),
        ],
        leave_balances: vec![],
    }
}

fn settings(max_concurrency: usize) -> ReconcileSettings {
    ReconcileSettings {
        max_concurrency,
        ..ReconcileSettings::default()
    }
}

fn reconciler(stores: Stores, settings: ReconcileSettings) -> Reconciler {
    Reconciler::new(stores, LeavePolicy::default(), settings)
}

fn batch_on(reference_date: &str) -> BatchRequest {
    BatchRequest {
        limit: None,
        reference_date: date(reference_date),
    }
}

/// Balance ledger that rejects `save` for balances matching `fail_when`.
struct FlakyBalances {
    inner: Arc<InMemoryStore>,
    fail_when: fn(&LeaveBalance) -> bool,
    enabled: AtomicBool,
}

impl FlakyBalances {
    fn new(inner: Arc<InMemoryStore>, fail_when: fn(&LeaveBalance) -> bool) -> Self {
        Self {
            inner,
            fail_when,
            enabled: AtomicBool::new(true),
        }
    }

    fn heal(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl LeaveBalanceStore for FlakyBalances {
    async fn ensure(&self, template: LeaveBalance) -> StoreResult<Ensured> {
        self.inner.ensure(template).await
    }

    async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveBalance>> {
        self.inner.find_by_employee(employee_id).await
    }

    async fn save(&self, balance: &LeaveBalance) -> StoreResult<()> {
        if self.enabled.load(Ordering::SeqCst) && (self.fail_when)(balance) {
            return Err(StoreError::WriteRejected {
                message: "connection reset".to_string(),
            });
        }
        self.inner.save(balance).await
    }
}

fn flaky_stores(store: Arc<InMemoryStore>, balances: Arc<FlakyBalances>) -> Stores {
    Stores {
        employees: store.clone(),
        balances,
        requests: store,
    }
}

/// Employee source whose connection is down.
struct DownEmployees;

#[async_trait]
impl EmployeeStore for DownEmployees {
    async fn find_active_with_hire_date(
        &self,
        _limit: Option<usize>,
    ) -> StoreResult<Vec<EmployeeRecord>> {
        Err(StoreError::Unavailable {
            message: "connection refused".to_string(),
        })
    }

    async fn find_by_id(&self, _employee_id: &str) -> StoreResult<Option<EmployeeRecord>> {
        Err(StoreError::Unavailable {
            message: "connection refused".to_string(),
        })
    }
}

/// Employee source that does not filter out records without a hire date.
struct UnfilteredEmployees(Arc<InMemoryStore>);

#[async_trait]
impl EmployeeStore for UnfilteredEmployees {
    async fn find_active_with_hire_date(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<EmployeeRecord>> {
        let dataset = self.0.snapshot().await;
        Ok(dataset
            .employees
            .into_iter()
            .filter(|e| e.is_active)
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn find_by_id(&self, employee_id: &str) -> StoreResult<Option<EmployeeRecord>> {
        self.0.find_by_id(employee_id).await
    }
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// End-to-End Batch
// =============================================================================

#[tokio::test]
async fn test_batch_reconciles_whole_chain() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let engine = reconciler(Stores::shared(store.clone()), settings(4));

    let report = engine.run_batch(batch_on("2024-06-01")).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.success_rate, Decimal::new(10000, 2));
    assert!(report.is_clean());

    let a = report
        .results
        .iter()
        .find(|r| r.employee_id == "emp_a")
        .unwrap();
    assert_eq!(a.current_work_year, Some(2));
    assert_eq!(a.counts.balances_created, 4);
    assert_eq!(a.counts.work_years_processed, 4);
    assert_eq!(a.counts.usage_updated, 3);
    assert_eq!(a.counts.carry_forward_fixed, 3);
    assert_eq!(a.counts.unmapped_leave_types, 1);

    // WY0: 20 allocated, 5 used
    let wy0 = store.balance("emp_a", 0).await.unwrap();
    assert_eq!(wy0.leave_year, 2023);
    assert_eq!(wy0.annual.used, dec(5));
    assert_eq!(wy0.annual.remaining, dec(15));
    assert!(!wy0.is_carried_forward);

    // WY1: 15 carried, 10 annual used; the pending request is ignored
    let wy1 = store.balance("emp_a", 1).await.unwrap();
    assert_eq!(wy1.annual.carried_forward, dec(15));
    assert_eq!(wy1.annual.used, dec(10));
    assert_eq!(wy1.annual.remaining, dec(25));
    assert_eq!(wy1.sick.used, dec(2));
    assert_eq!(wy1.sick.carried_forward, Decimal::ZERO);
    assert!(wy1.is_carried_forward);

    // WY2: 25 left in WY1, capped at 20 per transfer
    let wy2 = store.balance("emp_a", 2).await.unwrap();
    assert_eq!(wy2.annual.carried_forward, dec(20));
    assert_eq!(wy2.annual.remaining, dec(40));
    assert_eq!(wy2.casual.used, dec(1));

    // WY3 is prepared ahead of the next anniversary
    let wy3 = store.balance("emp_a", 3).await.unwrap();
    assert_eq!(wy3.leave_year, 2026);
    assert_eq!(wy3.annual.carried_forward, dec(20));
    assert!(store.balance("emp_a", 4).await.is_none());
}

#[tokio::test]
async fn test_rerun_writes_nothing() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let engine = reconciler(Stores::shared(store.clone()), settings(4));

    engine.run_batch(batch_on("2024-06-01")).await.unwrap();
    let saves = store.save_count();
    let inserts = store.insert_count();
    let before = store.snapshot().await;

    let report = engine.run_batch(batch_on("2024-06-01")).await.unwrap();

    assert_eq!(report.totals.writes(), 0);
    assert_eq!(store.save_count(), saves);
    assert_eq!(store.insert_count(), inserts);
    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn test_new_leave_is_picked_up_on_rerun() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let engine = reconciler(Stores::shared(store.clone()), settings(2));
    engine.run_batch(batch_on("2024-06-01")).await.unwrap();

    store
        .insert_request(request("lr_9", "emp_b", "AL", "2022-09-01", 6))
        .await;
    let report = engine
        .run_single("emp_b", date("2024-06-01"), false)
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.counts.usage_updated, 1);
    let wy0 = store.balance("emp_b", 0).await.unwrap();
    assert_eq!(wy0.annual.used, dec(10));
    let wy1 = store.balance("emp_b", 1).await.unwrap();
    assert_eq!(wy1.annual.carried_forward, dec(10));
}

// =============================================================================
// Failure Isolation
// =============================================================================

#[tokio::test]
async fn test_failing_employee_does_not_stop_others() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let balances = Arc::new(FlakyBalances::new(store.clone(), |b| b.employee_id == "emp_a"));
    let engine = reconciler(flaky_stores(store.clone(), balances), settings(3));

    let report = engine.run_batch(batch_on("2024-06-01")).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].employee_id, "emp_a");
    assert_eq!(report.failures[0].error.kind, "persistence_failure");

    for id in ["emp_b", "emp_c"] {
        let result = report.results.iter().find(|r| r.employee_id == id).unwrap();
        assert!(result.success, "{} should succeed", id);
        assert!(store.balance(id, 1).await.unwrap().is_carried_forward);
    }
}

#[tokio::test]
async fn test_rerun_after_partial_failure_does_not_double_count() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let balances = Arc::new(FlakyBalances::new(store.clone(), |b| {
        b.employee_id == "emp_a" && b.work_year == 3
    }));
    let engine = reconciler(flaky_stores(store.clone(), balances.clone()), settings(3));

    let report = engine.run_batch(batch_on("2024-06-01")).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].error.work_year, Some(3));

    // Writes before the failing work year are kept
    assert_eq!(
        store.balance("emp_a", 1).await.unwrap().annual.carried_forward,
        dec(15)
    );
    assert_eq!(
        store.balance("emp_a", 2).await.unwrap().annual.carried_forward,
        dec(20)
    );
    assert_eq!(
        store.balance("emp_a", 3).await.unwrap().annual.carried_forward,
        Decimal::ZERO
    );

    balances.heal();
    let rerun = engine.run_batch(batch_on("2024-06-01")).await.unwrap();

    assert!(rerun.is_clean());
    for id in ["emp_b", "emp_c"] {
        let result = rerun.results.iter().find(|r| r.employee_id == id).unwrap();
        assert_eq!(result.counts.writes(), 0, "{} was already reconciled", id);
    }
    let a = rerun.results.iter().find(|r| r.employee_id == "emp_a").unwrap();
    assert_eq!(a.counts.usage_updated, 0);
    assert_eq!(a.counts.carry_forward_fixed, 1);

    assert_eq!(store.balance("emp_a", 0).await.unwrap().annual.used, dec(5));
    assert_eq!(store.balance("emp_a", 1).await.unwrap().annual.used, dec(10));
    assert_eq!(store.balance("emp_a", 2).await.unwrap().casual.used, dec(1));
    let wy3 = store.balance("emp_a", 3).await.unwrap();
    assert_eq!(wy3.annual.carried_forward, dec(20));
    assert_eq!(wy3.annual.remaining, dec(40));
}

#[tokio::test]
async fn test_unreachable_employee_store_aborts_batch() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let stores = Stores {
        employees: Arc::new(DownEmployees),
        balances: store.clone(),
        requests: store.clone(),
    };
    let engine = reconciler(stores, settings(4));

    let result = engine.run_batch(batch_on("2024-06-01")).await;

    match result {
        Err(EngineError::StoreUnavailable { message }) => {
            assert!(message.contains("connection refused"));
        }
        other => panic!("Expected StoreUnavailable, got {:?}", other),
    }
    assert_eq!(store.insert_count(), 0);
}

#[tokio::test]
async fn test_employee_without_hire_date_is_reported_not_fatal() {
    let mut dataset = sample_dataset();
    dataset.employees.push(employee("emp_d", None));
    let store = Arc::new(InMemoryStore::from_dataset(dataset));
    let stores = Stores {
        employees: Arc::new(UnfilteredEmployees(store.clone())),
        balances: store.clone(),
        requests: store.clone(),
    };
    let engine = reconciler(stores, settings(4));

    let report = engine.run_batch(batch_on("2024-06-01")).await.unwrap();

    assert_eq!(report.processed, 4);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.success_rate, Decimal::new(7500, 2));
    assert_eq!(report.failures[0].employee_id, "emp_d");
    assert_eq!(report.failures[0].error.kind, "missing_hire_date");
    assert!(store.balance("emp_d", 0).await.is_none());
}

#[tokio::test]
async fn test_failure_list_is_capped() {
    let dataset = Dataset {
        employees: (0..5)
            .map(|i| employee(&format!("emp_{:03}", i), Some("2021-04-01")))
            .collect(),
        ..Dataset::default()
    };
    let store = Arc::new(InMemoryStore::from_dataset(dataset));
    let balances = Arc::new(FlakyBalances::new(store.clone(), |_| true));
    let settings = ReconcileSettings {
        failure_report_limit: 2,
        ..settings(2)
    };
    let engine = reconciler(flaky_stores(store, balances), settings);

    let report = engine.run_batch(batch_on("2024-06-01")).await.unwrap();

    assert_eq!(report.processed, 5);
    assert_eq!(report.failed, 5);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures_omitted, 3);
    assert_eq!(report.success_rate, Decimal::ZERO);
}

// =============================================================================
// Concurrency
// =============================================================================

fn population() -> Dataset {
    let employees: Vec<EmployeeRecord> = (0..20)
        .map(|i| {
            let hire = format!("{}-{:02}-15", 2018 + (i % 5), (i % 12) + 1);
            employee(&format!("emp_{:03}", i), Some(&hire))
        })
        .collect();
    let leave_requests = employees
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let start = e.hire_date.unwrap() + chrono::Duration::days(40);
            request(
                &format!("lr_{:03}", i),
                &e.id,
                "AL",
                &start.to_string(),
                3 + (i as i64 % 4),
            )
        })
        .collect();
    Dataset {
        employees,
        leave_requests,
        leave_balances: vec![],
    }
}

#[tokio::test]
async fn test_results_do_not_depend_on_concurrency() {
    let serial_store = Arc::new(InMemoryStore::from_dataset(population()));
    let parallel_store = Arc::new(InMemoryStore::from_dataset(population()));

    let serial = reconciler(Stores::shared(serial_store.clone()), settings(1))
        .run_batch(batch_on("2024-06-01"))
        .await
        .unwrap();
    let parallel = reconciler(Stores::shared(parallel_store.clone()), settings(8))
        .run_batch(batch_on("2024-06-01"))
        .await
        .unwrap();

    assert_eq!(serial.totals, parallel.totals);
    let serial_ids: Vec<_> = serial.results.iter().map(|r| &r.employee_id).collect();
    let parallel_ids: Vec<_> = parallel.results.iter().map(|r| &r.employee_id).collect();
    assert_eq!(serial_ids, parallel_ids);
    assert_eq!(
        serial_store.snapshot().await.leave_balances,
        parallel_store.snapshot().await.leave_balances
    );
}

#[tokio::test]
async fn test_limit_bounds_the_batch() {
    let store = Arc::new(InMemoryStore::from_dataset(population()));
    let engine = reconciler(Stores::shared(store), settings(8));

    let report = engine
        .run_batch(BatchRequest {
            limit: Some(5),
            reference_date: date("2024-06-01"),
        })
        .await
        .unwrap();

    assert_eq!(report.processed, 5);
    assert_eq!(report.results[0].employee_id, "emp_000");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_default_config_directory_matches_built_in_defaults() {
    let loader = ConfigLoader::load("./config/default").expect("Failed to load config");
    assert_eq!(loader.config(), &EngineConfig::default());
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_reports_after_batch_write_nothing() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let engine = reconciler(Stores::shared(store.clone()), settings(4));
    engine.run_batch(batch_on("2024-06-01")).await.unwrap();
    let saves = store.save_count();
    let inserts = store.insert_count();

    let anniversaries = engine
        .anniversaries(date("2025-01-01"), date("2025-01-31"))
        .await
        .unwrap();
    let ids: Vec<&str> = anniversaries
        .entries
        .iter()
        .map(|e| e.employee_id.as_str())
        .collect();
    assert_eq!(ids, vec!["emp_a", "emp_b", "emp_c"]);
    assert!(anniversaries.entries.iter().all(|e| e.work_year == 3));
    assert_eq!(anniversaries.total_annual_allocated, dec(60));

    let summary = engine
        .leave_summary("emp_a", Some(1), date("2024-06-01"))
        .await
        .unwrap();
    assert_eq!(summary.statistics.total_requests, 3);
    assert_eq!(summary.statistics.approved, 2);
    assert_eq!(summary.statistics.pending, 1);
    assert_eq!(summary.statistics.total_days_approved, dec(12));
    let ids: Vec<&str> = summary.requests.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["lr_4", "lr_3", "lr_2"]);

    let balance = summary.balance.unwrap();
    assert_eq!(balance.annual.used, dec(10));
    assert_eq!(balance.annual.carried_forward, dec(15));
    assert_eq!(balance.sick.used, dec(2));

    assert_eq!(store.save_count(), saves);
    assert_eq!(store.insert_count(), inserts);
}

#[tokio::test]
async fn test_anniversaries_with_unreachable_store() {
    let store = Arc::new(InMemoryStore::default());
    let stores = Stores {
        employees: Arc::new(DownEmployees),
        balances: store.clone(),
        requests: store,
    };
    let engine = reconciler(stores, settings(1));

    let result = engine
        .anniversaries(date("2025-01-01"), date("2025-12-31"))
        .await;
    assert!(matches!(result, Err(EngineError::StoreUnavailable { .. })));
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn test_http_batch_then_summary() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let state = AppState::new(reconciler(Stores::shared(store), settings(4)));

    let (status, body) = send(
        create_router(state.clone()),
        post_json("/reconcile", json!({ "reference_date": "2024-06-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], 3);
    assert_eq!(body["failed"], 0);
    assert!(body.get("results").is_none());

    let (status, body) = send(
        create_router(state),
        Request::builder()
            .uri("/employees/emp_a/carry-forward")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["work_years"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_http_unreachable_store_returns_503() {
    let store = Arc::new(InMemoryStore::default());
    let stores = Stores {
        employees: Arc::new(DownEmployees),
        balances: store.clone(),
        requests: store,
    };
    let state = AppState::new(reconciler(stores, settings(1)));

    let (status, body) = send(create_router(state), post_json("/reconcile", json!({}))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORE_UNAVAILABLE");
}

#[tokio::test]
async fn test_http_verbose_employee_run_returns_trace() {
    let store = Arc::new(InMemoryStore::from_dataset(sample_dataset()));
    let state = AppState::new(reconciler(Stores::shared(store), settings(1)));

    let (status, body) = send(
        create_router(state),
        post_json(
            "/employees/emp_a/reconcile",
            json!({ "reference_date": "2024-06-01", "verbose": true }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let steps = body["trace"]["steps"].as_array().unwrap();
    assert_eq!(steps[0]["rule_id"], "work_year_resolution");
    assert!(steps.iter().any(|s| s["rule_id"] == "carry_forward"));
    let warnings = body["trace"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
}

#[tokio::test]
async fn test_http_reports() {
    let mut dataset = sample_dataset();
    dataset.employees.push(employee("emp_d", None));
    let store = Arc::new(InMemoryStore::from_dataset(dataset));
    let state = AppState::new(reconciler(Stores::shared(store), settings(1)));

    let get = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let (status, body) = send(
        create_router(state.clone()),
        get("/anniversaries?from=2024-01-01&to=2024-01-31"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_anniversaries"], 3);
    assert_eq!(body["entries"][0]["anniversary_date"], "2024-01-10");
    assert_eq!(body["entries"][0]["work_year"], 2);

    let (status, body) = send(
        create_router(state.clone()),
        get("/employees/emp_a/leave-summary?today=2024-06-01"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["work_year"], 2);
    assert_eq!(body["period"]["is_current"], true);
    assert_eq!(body["statistics"]["total_requests"], 1);
    assert!(body["balance"].is_null());

    let (status, body) = send(
        create_router(state),
        get("/employees/emp_d/leave-summary"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "MISSING_HIRE_DATE");
}
