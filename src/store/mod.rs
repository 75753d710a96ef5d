//! Persistence collaborators.
//!
//! The engine never talks to a database directly. It reads employees and
//! leave requests, and reads and writes leave balances, through the three
//! traits below. Implementations are injected as `Arc<dyn ...>` so a run can
//! be pointed at a real backend or at [`InMemoryStore`] in tests.

mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{EmployeeRecord, LeaveBalance, LeaveRequest};

pub use memory::{Dataset, InMemoryStore};

/// Read access to employee records.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Active employees that have a hire or joining date, ordered by id.
    async fn find_active_with_hire_date(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<EmployeeRecord>>;

    /// Looks up one employee regardless of status.
    async fn find_by_id(&self, employee_id: &str) -> StoreResult<Option<EmployeeRecord>>;
}

/// The outcome of [`LeaveBalanceStore::ensure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensured {
    /// The stored balance, either pre-existing or just created.
    pub balance: LeaveBalance,
    /// True when this call created the balance.
    pub created: bool,
}

/// Read/write access to the leave balance ledger.
#[async_trait]
pub trait LeaveBalanceStore: Send + Sync {
    /// Creates the balance from `template` unless one already exists for its
    /// (employee, work year) key, returning whichever is stored.
    ///
    /// Implementations backed by a unique index may still surface
    /// [`StoreError::DuplicateKey`](crate::error::StoreError::DuplicateKey)
    /// when a concurrent writer wins the race.
    async fn ensure(&self, template: LeaveBalance) -> StoreResult<Ensured>;

    /// All balances of one employee, ascending by work year.
    async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveBalance>>;

    /// Overwrites an existing balance.
    async fn save(&self, balance: &LeaveBalance) -> StoreResult<()>;
}

/// Read access to leave requests.
#[async_trait]
pub trait LeaveRequestStore: Send + Sync {
    /// Active (not soft-deleted) requests of one employee.
    async fn find_active_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveRequest>>;
}

/// The set of collaborators a reconciliation run uses.
#[derive(Clone)]
pub struct Stores {
    /// Employee source.
    pub employees: Arc<dyn EmployeeStore>,
    /// Balance ledger.
    pub balances: Arc<dyn LeaveBalanceStore>,
    /// Leave request source.
    pub requests: Arc<dyn LeaveRequestStore>,
}

impl Stores {
    /// Uses one backend for all three collaborators.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: EmployeeStore + LeaveBalanceStore + LeaveRequestStore + 'static,
    {
        Self {
            employees: store.clone(),
            balances: store.clone(),
            requests: store,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
