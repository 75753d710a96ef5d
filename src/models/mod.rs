//! Core data models for the leave reconciliation engine.
//!
//! This module contains the ledger records the engine maintains, the source
//! records it reads, and the reports it produces.

mod employee;
mod leave_balance;
mod leave_request;
mod report;
mod trace;

pub use employee::{EmployeeRecord, LeaveEntitlement};
pub use leave_balance::{CategoryBalance, LeaveBalance, LeaveCategory};
pub use leave_request::{LeaveRequest, LeaveStatus};
pub use report::{
    BatchReport, CarryForwardSummary, CategoryAmounts, EmployeeReport, FailureEntry,
    ReconciliationCounts, ReportedError, WorkYearSummary,
};
pub use trace::{ReconciliationTrace, TraceStep, TraceWarning};
