//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the leave
//! policy and batch settings from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, LeavePolicy, ReconcileSettings};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml          # Allocations and carry-forward caps
/// └── reconciliation.yaml  # Batch concurrency and reporting settings
/// ```
///
/// `reconciliation.yaml` is optional; built-in defaults apply without it.
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Per-transfer cap: {}", loader.policy().carry_forward.max_per_transfer);
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `policy.yaml` is missing
    /// - Any file contains invalid YAML
    /// - Any value fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<LeavePolicy>(&path.join("policy.yaml"))?;
        policy.validate()?;

        let settings_path = path.join("reconciliation.yaml");
        let settings = if settings_path.exists() {
            Self::load_yaml::<ReconcileSettings>(&settings_path)?
        } else {
            ReconcileSettings::default()
        };
        settings.validate()?;

        Ok(Self {
            config: EngineConfig { policy, settings },
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the leave policy.
    pub fn policy(&self) -> &LeavePolicy {
        &self.config.policy
    }

    /// Returns the batch settings.
    pub fn settings(&self) -> &ReconcileSettings {
        &self.config.settings
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}
