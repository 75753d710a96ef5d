//! In-memory store backed by a JSON dataset.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult, StoreError, StoreResult};
use crate::models::{EmployeeRecord, LeaveBalance, LeaveRequest};

use super::{EmployeeStore, Ensured, LeaveBalanceStore, LeaveRequestStore};

/// The on-disk shape of a dataset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Employee records.
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
    /// Leave requests.
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequest>,
    /// Stored leave balances.
    #[serde(default)]
    pub leave_balances: Vec<LeaveBalance>,
}

impl Dataset {
    /// Reads a dataset from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| EngineError::DatasetError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| EngineError::DatasetError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Writes the dataset as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| EngineError::DatasetError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        fs::write(path, content).map_err(|e| EngineError::DatasetError {
            path: path_str,
            message: e.to_string(),
        })
    }
}

type BalanceKey = (String, u32);

/// A store holding every record in memory.
///
/// Balances are keyed by (employee id, work year), so the unique key holds by
/// construction and [`LeaveBalanceStore::ensure`] never reports a duplicate.
///
/// # Example
///
/// ```
/// use leave_engine::store::{Dataset, InMemoryStore, LeaveBalanceStore};
///
/// let store = InMemoryStore::from_dataset(Dataset::default());
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let balances = rt.block_on(store.find_by_employee("emp_001")).unwrap();
/// assert!(balances.is_empty());
/// assert_eq!(store.save_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    employees: RwLock<BTreeMap<String, EmployeeRecord>>,
    requests: RwLock<Vec<LeaveRequest>>,
    balances: RwLock<BTreeMap<BalanceKey, LeaveBalance>>,
    saves: AtomicUsize,
    inserts: AtomicUsize,
}

impl InMemoryStore {
    /// Creates a store seeded from a dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let employees = dataset
            .employees
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();
        let balances = dataset
            .leave_balances
            .into_iter()
            .map(|b| ((b.employee_id.clone(), b.work_year), b))
            .collect();

        Self {
            employees: RwLock::new(employees),
            requests: RwLock::new(dataset.leave_requests),
            balances: RwLock::new(balances),
            saves: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Creates a store from a JSON dataset file.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Ok(Self::from_dataset(Dataset::load(path)?))
    }

    /// Copies the current contents into a dataset.
    pub async fn snapshot(&self) -> Dataset {
        Dataset {
            employees: self.employees.read().await.values().cloned().collect(),
            leave_requests: self.requests.read().await.clone(),
            leave_balances: self.balances.read().await.values().cloned().collect(),
        }
    }

    /// Adds a leave request.
    pub async fn insert_request(&self, request: LeaveRequest) {
        self.requests.write().await.push(request);
    }

    /// Returns one stored balance.
    pub async fn balance(&self, employee_id: &str, work_year: u32) -> Option<LeaveBalance> {
        self.balances
            .read()
            .await
            .get(&(employee_id.to_string(), work_year))
            .cloned()
    }

    /// Number of successful [`LeaveBalanceStore::save`] calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of balances created through [`LeaveBalanceStore::ensure`].
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmployeeStore for InMemoryStore {
    async fn find_active_with_hire_date(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<EmployeeRecord>> {
        let employees = self.employees.read().await;
        Ok(employees
            .values()
            .filter(|e| e.is_active && e.anchor_date().is_some())
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, employee_id: &str) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.employees.read().await.get(employee_id).cloned())
    }
}

#[async_trait]
impl LeaveBalanceStore for InMemoryStore {
    async fn ensure(&self, template: LeaveBalance) -> StoreResult<Ensured> {
        let mut balances = self.balances.write().await;
        let key = (template.employee_id.clone(), template.work_year);

        if let Some(existing) = balances.get(&key) {
            return Ok(Ensured {
                balance: existing.clone(),
                created: false,
            });
        }

        balances.insert(key, template.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(Ensured {
            balance: template,
            created: true,
        })
    }

    async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveBalance>> {
        let balances = self.balances.read().await;
        let start = (employee_id.to_string(), 0);
        let end = (employee_id.to_string(), u32::MAX);
        Ok(balances.range(start..=end).map(|(_, b)| b.clone()).collect())
    }

    async fn save(&self, balance: &LeaveBalance) -> StoreResult<()> {
        let mut balances = self.balances.write().await;
        let key = (balance.employee_id.clone(), balance.work_year);

        match balances.get_mut(&key) {
            Some(stored) => {
                *stored = balance.clone();
                self.saves.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(StoreError::BalanceNotFound {
                employee_id: balance.employee_id.clone(),
                work_year: balance.work_year,
            }),
        }
    }
}

#[async_trait]
impl LeaveRequestStore for InMemoryStore {
    async fn find_active_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .filter(|r| r.employee_id == employee_id && r.is_active)
            .cloned()
            .collect())
    }
}
