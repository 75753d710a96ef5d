//! Configuration loading and management for the leave reconciliation engine.
//!
//! This module loads the leave policy (allocations and carry-forward caps)
//! and the batch settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Annual allocation: {}", config.policy().allocations.annual);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AllocationPolicy, EngineConfig, LeavePolicy, ReconcileSettings};
