//! Reconciliation of stored leave balances.
//!
//! This module applies the pure calculations from [`crate::calculation`] to
//! the ledger held by the [`crate::store`] collaborators, one employee at a
//! time or as a bounded-concurrency batch, and builds the read-only
//! anniversary and leave summary reports.

mod driver;
mod pipeline;
mod propagator;
mod reports;

pub use driver::{BatchRequest, Reconciler, WorkYearOverview};
pub use propagator::CarryForwardPropagator;
pub use reports::{
    AnniversaryEntry, AnniversaryReport, LeaveSummary, RequestStatistics,
};
