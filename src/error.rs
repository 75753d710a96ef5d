//! Error types for the leave reconciliation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! [`StoreError`] describes failures reported by the persistence collaborators,
//! while [`EngineError`] is what every engine operation returns.

use thiserror::Error;

/// Errors reported by the store collaborators.
///
/// The engine never retries a store call itself: a failed call either aborts
/// the current employee's pipeline or, at batch start, the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached at all.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// A description of the connectivity problem.
        message: String,
    },

    /// A concurrent writer created the same balance first.
    #[error("Duplicate leave balance for employee '{employee_id}' work year {work_year}")]
    DuplicateKey {
        /// The employee the balance belongs to.
        employee_id: String,
        /// The work year of the duplicated balance.
        work_year: u32,
    },

    /// The store rejected a write.
    #[error("Write rejected: {message}")]
    WriteRejected {
        /// A description of why the write was rejected.
        message: String,
    },

    /// A balance that was expected to exist is missing.
    #[error("Leave balance not found for employee '{employee_id}' work year {work_year}")]
    BalanceNotFound {
        /// The employee the balance belongs to.
        employee_id: String,
        /// The missing work year.
        work_year: u32,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// The main error type for the leave reconciliation engine.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
///
/// let error = EngineError::MissingHireDate {
///     employee_id: "emp_042".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee 'emp_042' has no hire or joining date");
/// assert_eq!(error.kind(), "missing_hire_date");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value is outside its allowed range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A dataset file could not be read or written.
    #[error("Dataset error for '{path}': {message}")]
    DatasetError {
        /// The dataset path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The requested employee does not exist.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The identifier that was looked up.
        employee_id: String,
    },

    /// The employee has neither a hire date nor a joining date.
    #[error("Employee '{employee_id}' has no hire or joining date")]
    MissingHireDate {
        /// The employee that cannot be resolved into work years.
        employee_id: String,
    },

    /// A balance write failed part-way through an employee's chain.
    #[error("Failed to persist work year {work_year} for employee '{employee_id}': {source}")]
    Persistence {
        /// The employee whose chain was aborted.
        employee_id: String,
        /// The work year whose write failed.
        work_year: u32,
        /// The underlying store failure.
        source: StoreError,
    },

    /// A report window ends before it starts.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// First day of the window.
        from: chrono::NaiveDate,
        /// Last day of the window.
        to: chrono::NaiveDate,
    },

    /// The store was unreachable when the run started.
    #[error("Store unreachable, run aborted: {message}")]
    StoreUnavailable {
        /// A description of the connectivity problem.
        message: String,
    },

    /// Any other store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Returns a stable snake_case code for reports and API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => "config_error",
            EngineError::DatasetError { .. } => "dataset_error",
            EngineError::EmployeeNotFound { .. } => "employee_not_found",
            EngineError::MissingHireDate { .. } => "missing_hire_date",
            EngineError::InvalidDateRange { .. } => "invalid_date_range",
            EngineError::Persistence { .. } => "persistence_failure",
            EngineError::StoreUnavailable { .. } => "store_unavailable",
            EngineError::Store(_) => "store_error",
        }
    }

    /// The work year the error is attached to, if any.
    pub fn work_year(&self) -> Option<u32> {
        match self {
            EngineError::Persistence { work_year, .. } => Some(*work_year),
            EngineError::Store(StoreError::DuplicateKey { work_year, .. })
            | EngineError::Store(StoreError::BalanceNotFound { work_year, .. }) => Some(*work_year),
            _ => None,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
