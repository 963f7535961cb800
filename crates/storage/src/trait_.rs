//! Storage trait abstraction.

use async_trait::async_trait;
use ironlog_core::RecordBook;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Durable backing store for the record book.
///
/// Backends own their retry and timeout policy; the engine calls `save`
/// once per mutation and never buffers.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the whole book. A store that has never been written returns an
    /// empty book.
    async fn load(&self) -> Result<RecordBook>;

    /// Replace the stored book.
    async fn save(&mut self, book: &RecordBook) -> Result<()>;

    /// Remove everything. Irreversible.
    async fn clear(&mut self) -> Result<()>;
}
