//! Calculation logic for the leave reconciliation engine.
//!
//! Everything in this module is pure: work year resolution from hire-date
//! anniversaries, leave type to category mapping, usage recomputation for a
//! single balance, and the capped annual carry forward. Persistence and
//! ordering live in [`crate::reconcile`].

mod carry_forward;
mod category;
mod usage_sync;
mod work_year;

pub use carry_forward::{
    CarryForwardCaps, CarryForwardLimit, CarryForwardResult, apply_carry_forward,
    calculate_carry_forward, needs_carry_forward_fix,
};
pub use category::{CategoryResolution, DEFAULT_CATEGORY, ResolutionSource, map_leave_type};
pub use usage_sync::{UsageSyncResult, synchronize_usage};
pub use work_year::{
    AnniversaryInfo, WorkYear, WorkYearPeriod, anniversary_in, anniversary_info,
    available_work_years, leave_year_for, resolve_work_year, work_year_period,
};
