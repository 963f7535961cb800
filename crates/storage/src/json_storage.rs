//! JSON file storage implementation.
//!
//! Stores the record book as a single `records.json` file inside a data
//! directory and keeps a small meta marker (version + updated_at) next to it.
//! Writes go to a temporary file first and are renamed into place.

use std::path::{Path, PathBuf};

use ironlog_core::RecordBook;
use super::{Storage, Result};
use tokio::fs;
use tracing::debug;

const RECORDS_FILE: &str = "records.json";
const META_FILE: &str = "records.meta.json";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("meta")).await?;
        Ok(Self { root })
    }

    /// Directory this storage writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn records_path(&self) -> PathBuf {
        self.root.join(RECORDS_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join("meta").join(META_FILE)
    }

    /// Current version marker; 0 when nothing has been saved.
    pub async fn version(&self) -> Result<u64> {
        let meta: Option<serde_json::Value> = read_json(&self.meta_path()).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }

    /// Read and increment the version marker, return the new version.
    async fn bump_version(&self) -> Result<u64> {
        let version = self.version().await.unwrap_or(0) + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(self.meta_path(), serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load(&self) -> Result<RecordBook> {
        Ok(read_json(&self.records_path()).await?.unwrap_or_default())
    }

    async fn save(&mut self, book: &RecordBook) -> Result<()> {
        let path = self.records_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(book)?;
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        let version = self.bump_version().await?;
        debug!("Saved record book v{} ({} exercises)", version, book.records.len());
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        for path in [self.records_path(), self.meta_path()] {
            fs::remove_file(&path).await.or_else(|e| {
                if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
            })?;
        }
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironlog_core::{PerformanceSample, PersonalRecordState};

    fn book_with_bench() -> RecordBook {
        let sample = PerformanceSample::new(
            "bench".into(),
            "Bench Press",
            80.0,
            5,
            chrono::Utc::now(),
        )
        .unwrap();
        let mut book = RecordBook::new();
        book.records.insert(sample.exercise_id.clone(), PersonalRecordState::first(&sample));
        book.append_sample(sample);
        book
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        let book = storage.load().await.unwrap();
        assert!(book.is_empty());
        assert_eq!(storage.version().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let book = book_with_bench();

        storage.save(&book).await.unwrap();
        storage.save(&book).await.unwrap();

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        assert_eq!(reopened.load().await.unwrap(), book);
        assert_eq!(reopened.version().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_clear_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.save(&book_with_bench()).await.unwrap();

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_empty());
        // Clearing twice is fine
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        fs::write(dir.path().join(RECORDS_FILE), b"{ not json").await.unwrap();

        assert!(matches!(storage.load().await, Err(crate::StorageError::Json(_))));
    }
}
