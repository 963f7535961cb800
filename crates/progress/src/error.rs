//! Tracker errors.

use ironlog_core::ValidationError;
use ironlog_storage::StorageError;

/// Errors returned by tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Input rejected before any state changed
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationError),

    /// Backing store failed
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}
