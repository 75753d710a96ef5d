//! Application state for the leave reconciliation API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::reconcile::Reconciler;

/// Shared application state.
///
/// Holds the reconciler, which in turn owns the store handles and the
/// loaded policy.
#[derive(Clone)]
pub struct AppState {
    reconciler: Arc<Reconciler>,
}

impl AppState {
    /// Creates a new application state around a reconciler.
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
        }
    }

    /// Returns the shared reconciler.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }
}
