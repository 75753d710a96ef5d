//! Carry-forward calculation.
//!
//! The carry forward into work year `wy` is the previous work year's unused
//! annual leave, capped twice: once per transfer and once so that the
//! allocation plus the carried amount stays under a yearly total.
//!
//! ```text
//! cf(wy) = min(min(remaining(wy - 1), per_transfer), max(0, total - allocated(wy)))
//! ```
//!
//! Work year 0 never receives a carry forward, and neither does a work year
//! whose predecessor is missing. Only annual leave carries; sick and casual
//! carry forwards are always zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LeaveBalance, TraceStep};

/// The caps applied to every transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryForwardCaps {
    /// Maximum days moved from one work year to the next.
    pub max_per_transfer: Decimal,
    /// Ceiling on allocated plus carried annual leave in a single work year.
    pub max_total: Decimal,
}

impl Default for CarryForwardCaps {
    fn default() -> Self {
        Self {
            max_per_transfer: Decimal::new(20, 0),
            max_total: Decimal::new(40, 0),
        }
    }
}

/// What bounded the computed carry forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarryForwardLimit {
    /// Work year 0 has no predecessor by definition.
    FirstWorkYear,
    /// The previous work year's balance does not exist.
    MissingPredecessor,
    /// The previous work year's remaining annual leave was used up.
    NothingRemaining,
    /// The full remaining balance fit under both caps.
    Remaining,
    /// The per-transfer cap applied.
    PerTransferCap,
    /// The yearly total cap applied.
    TotalCap,
}

/// The result of a carry-forward calculation.
#[derive(Debug, Clone)]
pub struct CarryForwardResult {
    /// The annual carry forward the work year should hold.
    pub carried_forward: Decimal,
    /// Room left under the yearly total cap.
    pub total_cap_room: Decimal,
    /// Which bound decided the amount.
    pub limit: CarryForwardLimit,
    /// The trace step recording this calculation.
    pub trace_step: TraceStep,
}

/// Computes the carry forward into `work_year`.
///
/// # Arguments
///
/// * `work_year` - The receiving work year
/// * `previous_remaining` - Annual `remaining` of work year `work_year - 1`,
///   or `None` when that balance does not exist
/// * `allocated_annual` - Annual allocation of the receiving work year
/// * `caps` - The per-transfer and total caps
/// * `step_number` - The step number for trace sequencing
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::{calculate_carry_forward, CarryForwardCaps};
/// use rust_decimal::Decimal;
///
/// let caps = CarryForwardCaps::default();
///
/// // 25 left over, 20 allocated: both caps leave room for 20.
/// let result = calculate_carry_forward(1, Some(Decimal::new(25, 0)), Decimal::new(20, 0), &caps, 1);
/// assert_eq!(result.carried_forward, Decimal::new(20, 0));
///
/// // 35 allocated leaves only 5 under the total cap.
/// let result = calculate_carry_forward(1, Some(Decimal::new(5, 0)), Decimal::new(35, 0), &caps, 1);
/// assert_eq!(result.carried_forward, Decimal::new(5, 0));
/// ```
pub fn calculate_carry_forward(
    work_year: u32,
    previous_remaining: Option<Decimal>,
    allocated_annual: Decimal,
    caps: &CarryForwardCaps,
    step_number: u32,
) -> CarryForwardResult {
    let total_cap_room = (caps.max_total - allocated_annual).max(Decimal::ZERO);

    let (carried_forward, limit) = match (work_year, previous_remaining) {
        (0, _) => (Decimal::ZERO, CarryForwardLimit::FirstWorkYear),
        (_, None) => (Decimal::ZERO, CarryForwardLimit::MissingPredecessor),
        (_, Some(remaining)) if remaining <= Decimal::ZERO => {
            (Decimal::ZERO, CarryForwardLimit::NothingRemaining)
        }
        (_, Some(remaining)) => {
            let individual = remaining.min(caps.max_per_transfer);
            let limit = if total_cap_room < individual {
                CarryForwardLimit::TotalCap
            } else if caps.max_per_transfer < remaining {
                CarryForwardLimit::PerTransferCap
            } else {
                CarryForwardLimit::Remaining
            };
            (individual.min(total_cap_room), limit)
        }
    };

    let trace_step = TraceStep {
        step_number,
        rule_id: "carry_forward".to_string(),
        rule_name: "Annual Leave Carry Forward".to_string(),
        work_year: Some(work_year),
        input: serde_json::json!({
            "previous_remaining": previous_remaining.map(|r| r.normalize().to_string()),
            "allocated_annual": allocated_annual.normalize().to_string(),
            "max_per_transfer": caps.max_per_transfer.normalize().to_string(),
            "max_total": caps.max_total.normalize().to_string()
        }),
        output: serde_json::json!({
            "carried_forward": carried_forward.normalize().to_string(),
            "total_cap_room": total_cap_room.normalize().to_string(),
            "limit": limit
        }),
        reasoning: match limit {
            CarryForwardLimit::FirstWorkYear => {
                "Work year 0 receives no carry forward".to_string()
            }
            CarryForwardLimit::MissingPredecessor => format!(
                "No balance for work year {}, nothing to carry",
                work_year.saturating_sub(1)
            ),
            CarryForwardLimit::NothingRemaining => format!(
                "Work year {} has no unused annual leave",
                work_year - 1
            ),
            CarryForwardLimit::Remaining => format!(
                "Carried all {} unused days into work year {}",
                carried_forward.normalize(),
                work_year
            ),
            CarryForwardLimit::PerTransferCap => format!(
                "Carried {} days, limited by the per-transfer cap of {}",
                carried_forward.normalize(),
                caps.max_per_transfer.normalize()
            ),
            CarryForwardLimit::TotalCap => format!(
                "Carried {} days, limited by the total cap of {} with {} allocated",
                carried_forward.normalize(),
                caps.max_total.normalize(),
                allocated_annual.normalize()
            ),
        },
    };

    CarryForwardResult {
        carried_forward,
        total_cap_room,
        limit,
        trace_step,
    }
}

/// Whether `balance` disagrees with the expected annual carry forward.
///
/// A balance also needs correcting when sick or casual leave carries
/// anything, or when its `is_carried_forward` flag is stale.
pub fn needs_carry_forward_fix(balance: &LeaveBalance, expected: Decimal) -> bool {
    balance.annual.carried_forward != expected
        || balance.sick.carried_forward != Decimal::ZERO
        || balance.casual.carried_forward != Decimal::ZERO
        || balance.is_carried_forward != (expected > Decimal::ZERO)
}

/// Returns `balance` holding `carried_forward` as its annual carry forward.
///
/// Sick and casual carry forwards are zeroed and the result is derived.
pub fn apply_carry_forward(balance: LeaveBalance, carried_forward: Decimal) -> LeaveBalance {
    let mut balance = balance;
    balance.annual.carried_forward = carried_forward;
    balance.sick.carried_forward = Decimal::ZERO;
    balance.casual.carried_forward = Decimal::ZERO;
    balance.is_carried_forward = carried_forward > Decimal::ZERO;
    balance.derive()
}
