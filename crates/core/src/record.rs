//! Per-exercise personal-record state.

use crate::id::ExerciseId;
use crate::sample::PerformanceSample;
use crate::Time;
use serde::{Deserialize, Serialize};

/// Best-ever values for one exercise.
///
/// The three bests are maximized independently and need not come from the
/// same set. `best_reps_at_best_weight` is re-baselined whenever the weight
/// record moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecordState {
    /// Exercise this state belongs to
    pub exercise_id: ExerciseId,

    /// Most recent display name
    pub exercise_name: String,

    /// Heaviest weight ever lifted
    pub best_weight: f64,

    /// Reps achieved at `best_weight`
    pub best_reps_at_best_weight: u32,

    /// Largest single-set volume
    pub best_volume: f64,

    /// Timestamp of the sample that last moved a record
    pub last_updated_at: Time,

    /// State before the last PR, one level deep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<RecordSnapshot>,
}

/// Frozen copy of the bests, kept as the one-level-back history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Heaviest weight at the time
    pub best_weight: f64,

    /// Reps at that weight
    pub best_reps_at_best_weight: u32,

    /// Largest volume at the time
    pub best_volume: f64,

    /// When that state was established
    pub updated_at: Time,
}

impl PersonalRecordState {
    /// Baseline state created from the first sample ever seen for an exercise.
    pub fn first(sample: &PerformanceSample) -> Self {
        Self {
            exercise_id: sample.exercise_id.clone(),
            exercise_name: sample.exercise_name.clone(),
            best_weight: sample.weight,
            best_reps_at_best_weight: sample.reps,
            best_volume: sample.volume(),
            last_updated_at: sample.timestamp,
            previous_state: None,
        }
    }

    /// Current bests without the previous-state link.
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            best_weight: self.best_weight,
            best_reps_at_best_weight: self.best_reps_at_best_weight,
            best_volume: self.best_volume,
            updated_at: self.last_updated_at,
        }
    }

    /// Describe a broken internal invariant, if any.
    ///
    /// `best_volume` must cover the set that produced the weight record.
    pub fn invariant_violation(&self) -> Option<String> {
        let implied = self.best_weight * self.best_reps_at_best_weight as f64;
        if self.best_volume < implied {
            Some(format!(
                "{}: best_volume {} < best_weight {} x best_reps_at_best_weight {}",
                self.exercise_id, self.best_volume, self.best_weight, self.best_reps_at_best_weight
            ))
        } else {
            None
        }
    }
}
