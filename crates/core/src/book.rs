//! The record book - everything the backing store persists.

use std::collections::BTreeMap;

use crate::id::ExerciseId;
use crate::record::PersonalRecordState;
use crate::sample::PerformanceSample;
use serde::{Deserialize, Serialize};

/// Snapshot of all record states and per-exercise histories.
///
/// Persisted as a mapping `exercise_id -> state` plus an ordered array of
/// samples per exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBook {
    /// Current bests by exercise
    #[serde(default)]
    pub records: BTreeMap<ExerciseId, PersonalRecordState>,

    /// Timestamp-ascending samples by exercise
    #[serde(default)]
    pub history: BTreeMap<ExerciseId, Vec<PerformanceSample>>,
}

impl RecordBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.history.is_empty()
    }

    /// Append a sample, keeping the exercise history in timestamp order.
    ///
    /// A sample is placed after every existing sample with the same or an
    /// earlier timestamp; existing entries are never touched.
    pub fn append_sample(&mut self, sample: PerformanceSample) {
        let entries = self.history.entry(sample.exercise_id.clone()).or_default();
        let at = entries.partition_point(|s| s.timestamp <= sample.timestamp);
        entries.insert(at, sample);
    }

    /// Number of samples logged for an exercise.
    pub fn history_len(&self, id: &ExerciseId) -> usize {
        self.history.get(id).map_or(0, Vec::len)
    }

    /// Describe every broken invariant in the book.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems: Vec<String> = self
            .records
            .values()
            .filter_map(PersonalRecordState::invariant_violation)
            .collect();

        for (id, samples) in &self.history {
            if samples.windows(2).any(|w| w[0].timestamp > w[1].timestamp) {
                problems.push(format!("{}: history is not in timestamp order", id));
            }
        }

        problems
    }
}
