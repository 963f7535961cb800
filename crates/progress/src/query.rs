//! Read-only history and record queries.
//!
//! Queries never mutate and never fail: unknown exercises yield empty
//! results.

use chrono::Utc;
use ironlog_core::{ExerciseId, HistoryWindow, PerformanceSample, PersonalRecordState, Time};
use ironlog_storage::Storage;

use crate::estimator::peak_one_rep_max;
use crate::tracker::BasicPrTracker;

impl<S: Storage> BasicPrTracker<S> {
    /// Samples for an exercise inside `window`, oldest first.
    pub async fn query_history(
        &self,
        exercise_id: &ExerciseId,
        window: HistoryWindow,
    ) -> Vec<PerformanceSample> {
        self.query_history_at(exercise_id, window, Utc::now()).await
    }

    /// [`query_history`](Self::query_history) with an explicit reference instant.
    pub async fn query_history_at(
        &self,
        exercise_id: &ExerciseId,
        window: HistoryWindow,
        now: Time,
    ) -> Vec<PerformanceSample> {
        self.store
            .read(|book| {
                book.history
                    .get(exercise_id)
                    .map(|samples| {
                        samples
                            .iter()
                            .filter(|s| window.contains(s.timestamp, now))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .await
    }

    /// Highest estimated 1RM across an exercise's whole history.
    ///
    /// A lighter set taken for many reps can beat the heaviest single, so
    /// this looks at every logged sample rather than the record state.
    pub async fn max_estimated_one_rep_max(&self, exercise_id: &ExerciseId) -> Option<f64> {
        self.store
            .read(|book| book.history.get(exercise_id).and_then(|s| peak_one_rep_max(s)))
            .await
    }

    /// Every record state, ordered by exercise id.
    pub async fn query_all_records(&self) -> Vec<PersonalRecordState> {
        self.store.read(|book| book.records.values().cloned().collect()).await
    }

    /// Record states last moved within the trailing `days`.
    pub async fn query_recent_records(&self, days: u32) -> Vec<PersonalRecordState> {
        self.query_recent_records_at(days, Utc::now()).await
    }

    /// [`query_recent_records`](Self::query_recent_records) with an explicit
    /// reference instant.
    pub async fn query_recent_records_at(&self, days: u32, now: Time) -> Vec<PersonalRecordState> {
        let window = HistoryWindow::Days(days);
        self.store
            .read(|book| {
                book.records
                    .values()
                    .filter(|r| window.contains(r.last_updated_at, now))
                    .cloned()
                    .collect()
            })
            .await
    }
}
