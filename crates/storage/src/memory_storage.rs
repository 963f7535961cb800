//! In-memory storage backend.

use std::sync::Arc;

use ironlog_core::RecordBook;
use super::{Storage, Result};
use tokio::sync::RwLock;

/// Storage that keeps the book in process memory.
///
/// Clones share the same underlying book, so a test can hand one clone to
/// the tracker and inspect what was persisted through the other.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    book: Arc<RwLock<RecordBook>>,
    saves: Arc<RwLock<usize>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `book`.
    pub fn with_book(book: RecordBook) -> Self {
        Self {
            book: Arc::new(RwLock::new(book)),
            saves: Arc::default(),
        }
    }

    /// Copy of the last saved book.
    pub async fn persisted(&self) -> RecordBook {
        self.book.read().await.clone()
    }

    /// Number of completed saves.
    pub async fn save_count(&self) -> usize {
        *self.saves.read().await
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<RecordBook> {
        Ok(self.book.read().await.clone())
    }

    async fn save(&mut self, book: &RecordBook) -> Result<()> {
        *self.book.write().await = book.clone();
        *self.saves.write().await += 1;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        *self.book.write().await = RecordBook::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let inspector = MemoryStorage::new();
        let mut storage = inspector.clone();

        let mut book = RecordBook::new();
        let sample = ironlog_core::PerformanceSample::new(
            "ohp".into(),
            "Overhead Press",
            50.0,
            5,
            chrono::Utc::now(),
        )
        .unwrap();
        book.append_sample(sample);

        storage.save(&book).await.unwrap();
        assert_eq!(inspector.persisted().await, book);
        assert_eq!(inspector.save_count().await, 1);

        storage.clear().await.unwrap();
        assert!(inspector.load().await.unwrap().is_empty());
    }
}
