//! Record store: cached record book over an injected backing store.
//!
//! The book is loaded lazily on first use. Readers clone whole entries out
//! of an `RwLock`, so they see either the state before a mutation or the
//! state after it. Writers for the same exercise are serialized through a
//! per-exercise mutex, and a store-wide gate lets `reset` wait for in-flight
//! writers. An exercise's mutex only lives while someone holds or waits
//! for it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use ironlog_core::{ExerciseId, RecordBook};
use ironlog_storage::{Storage, StorageError};
use tokio::sync::{Mutex, OnceCell, OwnedMutexGuard, OwnedRwLockReadGuard, RwLock};
use tracing::{debug, error, warn};

type LockRegistry = Arc<std::sync::Mutex<HashMap<ExerciseId, Arc<Mutex<()>>>>>;

/// Guard held for the duration of one exercise's mutation.
pub(crate) struct ExerciseGuard {
    id: ExerciseId,
    registry: LockRegistry,
    exercise: Option<OwnedMutexGuard<()>>,
    _gate: OwnedRwLockReadGuard<()>,
}

impl Drop for ExerciseGuard {
    fn drop(&mut self) {
        // Unlock first; the registry's own handle is then the last one
        // unless another writer is queued.
        drop(self.exercise.take());

        let mut locks = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(&self.id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.id);
        }
    }
}

/// Cached record book with write-through persistence.
pub struct RecordStore<S: Storage> {
    storage: Mutex<S>,
    book: RwLock<RecordBook>,
    loaded: OnceCell<()>,
    locks: LockRegistry,
    gate: Arc<RwLock<()>>,
}

impl<S: Storage> RecordStore<S> {
    /// Wrap a backing store. Nothing is read until the first access.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Mutex::new(storage),
            book: RwLock::new(RecordBook::default()),
            loaded: OnceCell::new(),
            locks: LockRegistry::default(),
            gate: Arc::new(RwLock::new(())),
        }
    }

    /// Load the book from storage once.
    ///
    /// A failed load starts from an empty book; the failure is logged.
    async fn ensure_loaded(&self) {
        self.loaded
            .get_or_init(|| async {
                let loaded = self.storage.lock().await.load().await;
                let book = match loaded {
                    Ok(book) => book,
                    Err(e) => {
                        warn!("Failed to load records, starting empty: {}", e);
                        RecordBook::default()
                    }
                };

                for problem in book.invariant_violations() {
                    error!(target: "ironlog::invariant", "Loaded record book is inconsistent: {}", problem);
                }
                debug!("Loaded {} exercise records", book.records.len());

                *self.book.write().await = book;
            })
            .await;
    }

    /// Serialize mutations of one exercise.
    ///
    /// Different exercises get different locks and may proceed together.
    pub(crate) async fn lock_exercise(&self, id: &ExerciseId) -> ExerciseGuard {
        let gate = self.gate.clone().read_owned().await;
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(id.clone()).or_default().clone()
        };
        ExerciseGuard {
            id: id.clone(),
            registry: self.locks.clone(),
            exercise: Some(lock.lock_owned().await),
            _gate: gate,
        }
    }

    /// Run `f` against the book under the write lock.
    ///
    /// `f` must not block; persistence happens separately in [`persist`].
    ///
    /// [`persist`]: RecordStore::persist
    pub(crate) async fn mutate<T>(&self, f: impl FnOnce(&mut RecordBook) -> T) -> T {
        self.ensure_loaded().await;
        let mut book = self.book.write().await;
        f(&mut book)
    }

    /// Run `f` against the book under the read lock.
    pub async fn read<T>(&self, f: impl FnOnce(&RecordBook) -> T) -> T {
        self.ensure_loaded().await;
        let book = self.book.read().await;
        f(&book)
    }

    /// Write the current book through to storage.
    ///
    /// The storage lock is taken before the snapshot, so the last save to
    /// finish always carries every applied mutation.
    pub async fn persist(&self) -> Result<(), StorageError> {
        let mut storage = self.storage.lock().await;
        let snapshot = self.book.read().await.clone();
        storage.save(&snapshot).await
    }

    /// Drop every record and all history, in memory and in storage.
    ///
    /// Waits for in-flight exercise mutations to finish first.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.ensure_loaded().await;
        let _gate = self.gate.write().await;
        let mut storage = self.storage.lock().await;
        *self.book.write().await = RecordBook::default();
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).clear();
        storage.clear().await
    }
}
