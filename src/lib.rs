//! Anniversary-based leave entitlement and carry-forward reconciliation.
//!
//! Every employee's leave is tracked in one balance per work year, where work
//! years are anchored to the hire-date anniversary. This crate keeps those
//! balances consistent with the leave requests they are derived from: it
//! recomputes consumed days per work year and propagates a capped annual
//! carry forward along each employee's chain of balances. Runs are safe to
//! repeat, and a batch isolates every employee's failures from the rest.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod store;
