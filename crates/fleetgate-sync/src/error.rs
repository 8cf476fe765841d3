//! Error types for the reconciliation jobs.

use thiserror::Error;

/// Result type alias using [`SyncError`].
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that abort a reconciliation run.
///
/// Per-record failures never surface here; they are logged, counted, and the
/// loop continues. Only failures to query either external system, or to
/// persist the exception report, terminate a run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The managed-device directory could not be queried.
    #[error("Directory error: {0}")]
    Directory(#[from] fleetgate_graph::GraphError),

    /// The record store could not be queried.
    #[error("Record store error: {0}")]
    Store(#[from] fleetgate_store::StoreError),

    /// The exception report could not be written.
    #[error("Failed to write exception report: {0}")]
    Report(#[from] std::io::Error),
}
