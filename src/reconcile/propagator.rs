//! Ordered carry-forward propagation.
//!
//! Carry forward into work year `n` depends on the remaining balance of work
//! year `n - 1`, which itself includes the carry forward into `n - 1`. The
//! chain is therefore walked strictly in ascending order, and each step reads
//! the predecessor as it was last persisted by this walk.

use tracing::debug;

use crate::calculation::{
    CarryForwardCaps, apply_carry_forward, calculate_carry_forward, needs_carry_forward_fix,
};
use crate::error::EngineResult;
use crate::models::{LeaveBalance, ReconciliationCounts};
use crate::store::LeaveBalanceStore;

use super::pipeline::{TraceRecorder, persist_fix};

/// Walks an employee's balances fixing annual carry forward.
#[derive(Debug, Clone, Copy)]
pub struct CarryForwardPropagator {
    caps: CarryForwardCaps,
}

impl CarryForwardPropagator {
    /// Creates a propagator applying the given caps.
    pub fn new(caps: CarryForwardCaps) -> Self {
        Self { caps }
    }

    /// Propagates carry forward through `chain`.
    ///
    /// `chain` must hold one employee's balances in ascending work year
    /// order. Corrections are saved one by one; a failed save stops the walk
    /// and the fixes made so far stay counted in `counts`.
    pub(crate) async fn propagate(
        &self,
        store: &dyn LeaveBalanceStore,
        chain: Vec<LeaveBalance>,
        counts: &mut ReconciliationCounts,
        recorder: &mut TraceRecorder,
    ) -> EngineResult<()> {
        let mut previous: Option<LeaveBalance> = None;

        for balance in chain {
            let previous_remaining = previous
                .as_ref()
                .filter(|p| p.work_year + 1 == balance.work_year)
                .map(|p| p.annual.remaining);

            let result = calculate_carry_forward(
                balance.work_year,
                previous_remaining,
                balance.annual.allocated,
                &self.caps,
                recorder.next_step(),
            );
            recorder.record(&balance.employee_id, result.trace_step);

            let current = if needs_carry_forward_fix(&balance, result.carried_forward) {
                let fixed = apply_carry_forward(balance, result.carried_forward);
                persist_fix(store, &fixed).await?;
                counts.carry_forward_fixed += 1;
                debug!(
                    employee_id = %fixed.employee_id,
                    work_year = fixed.work_year,
                    carried_forward = %fixed.annual.carried_forward,
                    "Carry forward corrected"
                );
                fixed
            } else {
                balance
            };

            previous = Some(current);
        }

        Ok(())
    }
}

impl Default for CarryForwardPropagator {
    fn default() -> Self {
        Self::new(CarryForwardCaps::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, StoreError, StoreResult};
    use crate::models::CategoryBalance;
    use crate::store::{Ensured, InMemoryStore};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn balance(work_year: u32, allocated: &str, used: &str) -> LeaveBalance {
        let mut balance = LeaveBalance::new(
            "emp_001",
            work_year,
            2024 + work_year as i32,
            CategoryBalance::with_allocation(dec(allocated)),
            CategoryBalance::with_allocation(dec("10")),
            CategoryBalance::with_allocation(dec("10")),
        );
        balance.annual.used = dec(used);
        balance.derive()
    }

    async fn seeded(balances: &[LeaveBalance]) -> InMemoryStore {
        let store = InMemoryStore::default();
        for balance in balances {
            store.ensure(balance.clone()).await.unwrap();
        }
        store
    }

    async fn run(store: &dyn LeaveBalanceStore, employee_id: &str) -> (ReconciliationCounts, EngineResult<()>) {
        let chain = store.find_by_employee(employee_id).await.unwrap();
        let mut counts = ReconciliationCounts::default();
        let mut recorder = TraceRecorder::new(false);
        let result = CarryForwardPropagator::default()
            .propagate(store, chain, &mut counts, &mut recorder)
            .await;
        (counts, result)
    }

    #[tokio::test]
    async fn test_carry_forward_flows_through_chain() {
        let store = seeded(&[
            balance(0, "20", "15"),
            balance(1, "20", "0"),
            balance(2, "20", "30"),
            balance(3, "20", "0"),
        ])
        .await;

        let (counts, result) = run(&store, "emp_001").await;
        result.unwrap();

        let wy1 = store.balance("emp_001", 1).await.unwrap();
        assert_eq!(wy1.annual.carried_forward, dec("5"));
        assert_eq!(wy1.annual.remaining, dec("25"));
        assert!(wy1.is_carried_forward);

        // wy2 receives 20 of the 25 left in wy1, capped per transfer
        let wy2 = store.balance("emp_001", 2).await.unwrap();
        assert_eq!(wy2.annual.carried_forward, dec("20"));
        assert_eq!(wy2.annual.remaining, dec("10"));

        let wy3 = store.balance("emp_001", 3).await.unwrap();
        assert_eq!(wy3.annual.carried_forward, dec("10"));
        assert_eq!(counts.carry_forward_fixed, 3);
    }

    #[tokio::test]
    async fn test_second_walk_makes_no_writes() {
        let store = seeded(&[balance(0, "20", "12"), balance(1, "20", "3")]).await;

        run(&store, "emp_001").await.1.unwrap();
        let saves = store.save_count();

        let (counts, result) = run(&store, "emp_001").await;
        result.unwrap();
        assert_eq!(counts.carry_forward_fixed, 0);
        assert_eq!(store.save_count(), saves);
    }

    #[tokio::test]
    async fn test_gap_resets_carry_forward() {
        let mut stale = balance(2, "20", "0");
        stale.annual.carried_forward = dec("8");
        stale.is_carried_forward = true;
        let store = seeded(&[balance(0, "20", "0"), stale.derive()]).await;

        run(&store, "emp_001").await.1.unwrap();

        let wy2 = store.balance("emp_001", 2).await.unwrap();
        assert_eq!(wy2.annual.carried_forward, Decimal::ZERO);
        assert!(!wy2.is_carried_forward);
    }

    #[tokio::test]
    async fn test_sick_and_casual_carry_forward_cleared() {
        let mut wy1 = balance(1, "20", "20");
        wy1.sick.carried_forward = dec("3");
        let store = seeded(&[balance(0, "20", "20"), wy1.derive()]).await;

        let (counts, result) = run(&store, "emp_001").await;
        result.unwrap();

        let wy1 = store.balance("emp_001", 1).await.unwrap();
        assert_eq!(wy1.sick.carried_forward, Decimal::ZERO);
        assert_eq!(wy1.sick.remaining, dec("10"));
        assert_eq!(counts.carry_forward_fixed, 1);
    }

    /// Fails every save after the first `allowed`.
    struct FailingAfter {
        inner: InMemoryStore,
        allowed: usize,
    }

    #[async_trait]
    impl LeaveBalanceStore for FailingAfter {
        async fn ensure(&self, template: LeaveBalance) -> StoreResult<Ensured> {
            self.inner.ensure(template).await
        }

        async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveBalance>> {
            self.inner.find_by_employee(employee_id).await
        }

        async fn save(&self, balance: &LeaveBalance) -> StoreResult<()> {
            if self.inner.save_count() >= self.allowed {
                return Err(StoreError::WriteRejected {
                    message: "disk full".to_string(),
                });
            }
            self.inner.save(balance).await
        }
    }

    #[tokio::test]
    async fn test_failed_save_stops_walk() {
        let store = FailingAfter {
            inner: seeded(&[
                balance(0, "20", "10"),
                balance(1, "20", "10"),
                balance(2, "20", "10"),
            ])
            .await,
            allowed: 1,
        };

        let (counts, result) = run(&store, "emp_001").await;
        match result {
            Err(EngineError::Persistence { work_year, .. }) => assert_eq!(work_year, 2),
            other => panic!("Expected Persistence error, got {:?}", other),
        }
        assert_eq!(counts.carry_forward_fixed, 1);

        let wy2 = store.inner.balance("emp_001", 2).await.unwrap();
        assert_eq!(wy2.annual.carried_forward, Decimal::ZERO);
    }
}
