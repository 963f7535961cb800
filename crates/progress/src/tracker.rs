//! PR tracking service.

use async_trait::async_trait;
use chrono::Utc;
use ironlog_core::{
    ExerciseId, PerformanceSample, PersonalRecordState, PrNotification, Time,
};
use ironlog_storage::{Storage, StorageError};
use tracing::{debug, error, info};

use crate::comparator;
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::store::RecordStore;

/// Outcome of evaluating one logged set.
#[derive(Debug)]
pub struct Evaluation {
    /// Record that fell, if any
    pub notification: Option<PrNotification>,

    /// Set when the in-memory update could not be written through.
    ///
    /// The in-memory state keeps the update either way; the caller decides
    /// whether to retry or reconcile.
    pub persist_error: Option<StorageError>,
}

impl Evaluation {
    /// Whether the update reached the backing store.
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Whether a record fell.
    pub fn is_pr(&self) -> bool {
        self.notification.is_some()
    }
}

/// PR tracking service.
#[async_trait]
pub trait PrTracker: Send + Sync {
    /// Record a completed set and report the record it broke, if any.
    ///
    /// `timestamp` defaults to now.
    async fn evaluate(
        &self,
        exercise_id: ExerciseId,
        exercise_name: &str,
        weight: f64,
        reps: u32,
        timestamp: Option<Time>,
    ) -> Result<Evaluation, TrackerError>;

    /// Current record state for an exercise.
    async fn record(&self, exercise_id: &ExerciseId) -> Option<PersonalRecordState>;

    /// Irreversibly clear every record and all history.
    async fn reset_all(&self) -> Result<(), TrackerError>;
}

/// Basic PR tracker implementation.
pub struct BasicPrTracker<S: Storage> {
    pub(crate) store: RecordStore<S>,
    pub(crate) config: TrackerConfig,
}

impl<S: Storage> BasicPrTracker<S> {
    /// Create a new tracker over the given backing store.
    pub fn new(storage: S) -> Self {
        Self {
            store: RecordStore::new(storage),
            config: TrackerConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

#[async_trait]
impl<S: Storage + 'static> PrTracker for BasicPrTracker<S> {
    async fn evaluate(
        &self,
        exercise_id: ExerciseId,
        exercise_name: &str,
        weight: f64,
        reps: u32,
        timestamp: Option<Time>,
    ) -> Result<Evaluation, TrackerError> {
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let sample = PerformanceSample::new(exercise_id.clone(), exercise_name, weight, reps, timestamp)?;

        let _guard = self.store.lock_exercise(&exercise_id).await;

        let notification = self
            .store
            .mutate(|book| {
                let result = comparator::compare(book.records.get(&exercise_id), &sample);
                if let Some(next) = result.next_state {
                    if let Some(problem) = next.invariant_violation() {
                        error!(target: "ironlog::invariant", "Record update broke an invariant: {}", problem);
                    }
                    book.records.insert(exercise_id.clone(), next);
                }
                book.append_sample(sample);
                result.notification
            })
            .await;

        match &notification {
            Some(n) => info!(
                "New {} PR on {}: {} -> {} ({:+.1}%)",
                n.kind, n.exercise_name, n.old_value, n.new_value, n.improvement_percent
            ),
            None => debug!("No PR on {} ({} kg x {})", exercise_id, weight, reps),
        }

        let persist_error = self.store.persist().await.err();
        if let Some(e) = &persist_error {
            error!("Failed to persist record book after {}: {}", exercise_id, e);
        }

        Ok(Evaluation { notification, persist_error })
    }

    async fn record(&self, exercise_id: &ExerciseId) -> Option<PersonalRecordState> {
        self.store.read(|book| book.records.get(exercise_id).cloned()).await
    }

    async fn reset_all(&self) -> Result<(), TrackerError> {
        self.store.reset().await?;
        info!("All records and history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use ironlog_core::{PrKind, RecordBook};
    use ironlog_storage::MemoryStorage;
    use std::sync::Arc;

    fn t0() -> Time {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap()
    }

    /// Storage whose reads and writes always fail.
    struct BrokenStorage;

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn load(&self) -> ironlog_storage::Result<RecordBook> {
            Err(StorageError::Other("disk unplugged".to_string()))
        }
        async fn save(&mut self, _book: &RecordBook) -> ironlog_storage::Result<()> {
            Err(StorageError::Other("disk unplugged".to_string()))
        }
        async fn clear(&mut self) -> ironlog_storage::Result<()> {
            Err(StorageError::Other("disk unplugged".to_string()))
        }
    }

    async fn log(tracker: &impl PrTracker, weight: f64, reps: u32, minutes: i64) -> Evaluation {
        tracker
            .evaluate("bench".into(), "Bench Press", weight, reps, Some(t0() + Duration::minutes(minutes)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_sample_creates_record() {
        let storage = MemoryStorage::new();
        let tracker = BasicPrTracker::new(storage.clone());

        let eval = log(&tracker, 100.0, 5, 0).await;
        let n = eval.notification.unwrap();
        assert_eq!(n.kind, PrKind::Weight);
        assert_eq!(n.old_value, 0.0);
        assert_eq!(n.improvement_percent, 100.0);
        assert!(eval.persist_error.is_none());

        let persisted = storage.persisted().await;
        assert_eq!(persisted.records.len(), 1);
        assert_eq!(persisted.history_len(&"bench".into()), 1);
    }

    #[tokio::test]
    async fn test_priority_sequence() {
        let tracker = BasicPrTracker::new(MemoryStorage::new());
        log(&tracker, 100.0, 5, 0).await;

        let eval = log(&tracker, 110.0, 3, 1).await;
        assert_eq!(eval.notification.unwrap().kind, PrKind::Weight);

        let eval = log(&tracker, 90.0, 8, 2).await;
        assert_eq!(eval.notification.unwrap().kind, PrKind::Volume);

        // 110 × 4 = 440 < 720: reps at the best weight
        let eval = log(&tracker, 110.0, 4, 3).await;
        let n = eval.notification.unwrap();
        assert_eq!(n.kind, PrKind::Reps);
        assert_eq!((n.old_value, n.new_value), (3.0, 4.0));

        let state = tracker.record(&"bench".into()).await.unwrap();
        assert_eq!(state.best_weight, 110.0);
        assert_eq!(state.best_reps_at_best_weight, 4);
        assert_eq!(state.best_volume, 720.0);
        assert_eq!(state.previous_state.unwrap().best_reps_at_best_weight, 3);
    }

    #[tokio::test]
    async fn test_every_set_is_recorded() {
        let storage = MemoryStorage::new();
        let tracker = BasicPrTracker::new(storage.clone());

        for (i, (weight, reps)) in [(60.0, 10), (50.0, 5), (50.0, 5), (65.0, 8)].into_iter().enumerate() {
            log(&tracker, weight, reps, i as i64).await;
            assert_eq!(storage.persisted().await.history_len(&"bench".into()), i + 1);
        }
        assert_eq!(storage.save_count().await, 4);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_mutation() {
        let storage = MemoryStorage::new();
        let tracker = BasicPrTracker::new(storage.clone());

        let err = tracker
            .evaluate("bench".into(), "Bench Press", -20.0, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Invalid(_)));
        assert!(tracker.record(&"bench".into()).await.is_none());
        assert_eq!(storage.save_count().await, 0);
    }

    #[tokio::test]
    async fn test_existing_records_are_loaded_lazily() {
        let storage = MemoryStorage::new();
        {
            let tracker = BasicPrTracker::new(storage.clone());
            log(&tracker, 100.0, 5, 0).await;
        }

        let tracker = BasicPrTracker::new(storage.clone());
        let eval = log(&tracker, 100.0, 5, 10).await;
        assert!(eval.notification.is_none());
        assert_eq!(storage.persisted().await.history_len(&"bench".into()), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_memory_state() {
        let tracker = BasicPrTracker::new(BrokenStorage);

        let eval = log(&tracker, 100.0, 5, 0).await;
        assert!(eval.is_pr());
        assert!(!eval.is_durable());

        let state = tracker.record(&"bench".into()).await.unwrap();
        assert_eq!(state.best_weight, 100.0);

        assert!(matches!(tracker.reset_all().await, Err(TrackerError::Storage(_))));
        assert!(tracker.record(&"bench".into()).await.is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let storage = MemoryStorage::new();
        let tracker = BasicPrTracker::new(storage.clone());
        log(&tracker, 100.0, 5, 0).await;

        tracker.reset_all().await.unwrap();
        assert!(tracker.record(&"bench".into()).await.is_none());
        assert!(storage.persisted().await.is_empty());

        // Next sample is a first sample again
        let eval = log(&tracker, 40.0, 5, 1).await;
        assert_eq!(eval.notification.unwrap().old_value, 0.0);
    }

    #[tokio::test]
    async fn test_concurrent_exercises() {
        let storage = MemoryStorage::new();
        let tracker = Arc::new(BasicPrTracker::new(storage.clone()));

        let mut handles = Vec::new();
        for ex in ["squat", "bench", "deadlift", "row"] {
            for i in 0..10u32 {
                let tracker = tracker.clone();
                handles.push(tokio::spawn(async move {
                    tracker
                        .evaluate(ex.into(), ex, 50.0 + i as f64, 5, Some(t0() + Duration::minutes(i as i64)))
                        .await
                        .unwrap()
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let persisted = storage.persisted().await;
        assert_eq!(persisted.records.len(), 4);
        for ex in ["squat", "bench", "deadlift", "row"] {
            let id = ExerciseId::new(ex);
            assert_eq!(persisted.history_len(&id), 10);
            assert_eq!(persisted.records[&id].best_weight, 59.0);
        }
        assert!(persisted.invariant_violations().is_empty());
    }
}
