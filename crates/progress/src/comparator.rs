//! PR decision procedure.
//!
//! Given a candidate sample and the stored best, decide which record (if
//! any) the sample breaks and what the state becomes. Only one record type
//! is reported per sample, checked in a fixed order:
//!
//! ```text
//! weight > best_weight                                   -> Weight
//! else volume > best_volume                              -> Volume
//! else weight == best_weight && reps > best_reps         -> Reps
//! ```

use ironlog_core::{PerformanceSample, PersonalRecordState, PrKind, PrNotification};

/// Result of comparing one sample against the stored best.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Notification to deliver, if a record fell
    pub notification: Option<PrNotification>,
    /// Replacement state, present exactly when `notification` is
    pub next_state: Option<PersonalRecordState>,
}

impl Comparison {
    fn unchanged() -> Self {
        Self { notification: None, next_state: None }
    }
}

/// Compare `sample` against `current` (absent for a never-seen exercise).
pub fn compare(current: Option<&PersonalRecordState>, sample: &PerformanceSample) -> Comparison {
    let Some(current) = current else {
        return Comparison {
            notification: Some(PrNotification::first(
                sample.exercise_name.clone(),
                sample.weight,
                sample.timestamp,
            )),
            next_state: Some(PersonalRecordState::first(sample)),
        };
    };

    let volume = sample.volume();
    let reps = sample.reps as f64;

    let (kind, new_value, old_value) = if sample.weight > current.best_weight {
        (PrKind::Weight, sample.weight, current.best_weight)
    } else if volume > current.best_volume {
        (PrKind::Volume, volume, current.best_volume)
    } else if sample.weight == current.best_weight && sample.reps > current.best_reps_at_best_weight {
        (PrKind::Reps, reps, current.best_reps_at_best_weight as f64)
    } else {
        return Comparison::unchanged();
    };

    Comparison {
        notification: Some(PrNotification::new(
            kind,
            sample.exercise_name.clone(),
            new_value,
            old_value,
            sample.timestamp,
        )),
        next_state: Some(advance(current, sample)),
    }
}

/// Fold a record-breaking sample into the state.
///
/// The old bests move into `previous_state`, replacing whatever was there.
fn advance(current: &PersonalRecordState, sample: &PerformanceSample) -> PersonalRecordState {
    let best_reps_at_best_weight = if sample.weight >= current.best_weight {
        sample.reps
    } else {
        current.best_reps_at_best_weight
    };

    PersonalRecordState {
        exercise_id: current.exercise_id.clone(),
        exercise_name: sample.exercise_name.clone(),
        best_weight: sample.weight.max(current.best_weight),
        best_reps_at_best_weight,
        best_volume: sample.volume().max(current.best_volume),
        last_updated_at: sample.timestamp,
        previous_state: Some(current.snapshot()),
    }
}
