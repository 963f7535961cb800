//! Proximity-to-PR signals and record statistics.

use chrono::Utc;
use ironlog_core::{ExerciseId, HistoryWindow, PersonalRecordState, RecordBook, Time};
use ironlog_storage::Storage;
use serde::Serialize;

use crate::estimator::peak_one_rep_max;
use crate::tracker::BasicPrTracker;

/// How close a planned weight is to the weight record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityLevel {
    /// Within the floor but under 95%
    Close,
    /// 95% or more, but not a record yet
    VeryClose,
    /// At or above the current best
    NewRecord,
}

impl ProximityLevel {
    /// Classify a closeness percentage. Below `floor` there is no signal.
    pub fn classify(percent: f64, floor: f64) -> Option<Self> {
        if percent >= 100.0 {
            Some(ProximityLevel::NewRecord)
        } else if percent >= 95.0 {
            Some(ProximityLevel::VeryClose)
        } else if percent >= floor {
            Some(ProximityLevel::Close)
        } else {
            None
        }
    }
}

/// A proximity signal for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proximity {
    /// Planned weight as a percent of the best weight
    pub percent: f64,
    /// Classified level
    pub level: ProximityLevel,
    /// Kilograms still missing; zero at or above the record
    pub remaining_kg: f64,
}

/// `weight` as a percent of `best_weight`; `None` without a usable best.
pub fn closeness_percent(weight: f64, best_weight: f64) -> Option<f64> {
    if best_weight > 0.0 && weight.is_finite() {
        Some(weight / best_weight * 100.0)
    } else {
        None
    }
}

/// Summary counts over the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrStats {
    /// Exercises with a record
    pub total_records: usize,
    /// Records moved within the recent window
    pub recent_records: usize,
    /// Records moved within the last week
    pub this_week_records: usize,
    /// Exercise with the highest estimated 1RM
    pub strongest_lift: Option<StrongestLift>,
}

/// The strongest lift across exercises.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrongestLift {
    /// Exercise id
    pub exercise_id: ExerciseId,
    /// Exercise display name
    pub exercise_name: String,
    /// Best estimated 1RM over the exercise's history
    pub estimated_one_rep_max: f64,
}

/// Exercise whose history holds the highest estimated 1RM. Ties keep the
/// first exercise in id order.
fn strongest(book: &RecordBook) -> Option<StrongestLift> {
    book.records
        .values()
        .filter_map(|r| {
            let peak = book.history.get(&r.exercise_id).and_then(|s| peak_one_rep_max(s))?;
            Some((r, peak))
        })
        .fold(None, |best: Option<(&PersonalRecordState, f64)>, (r, orm)| match best {
            Some((_, top)) if top >= orm => best,
            _ => Some((r, orm)),
        })
        .map(|(r, orm)| StrongestLift {
            exercise_id: r.exercise_id.clone(),
            exercise_name: r.exercise_name.clone(),
            estimated_one_rep_max: orm,
        })
}

impl<S: Storage> BasicPrTracker<S> {
    /// Proximity signal for lifting `weight` on an exercise.
    ///
    /// `None` for unseen exercises, a zero best weight, or closeness under
    /// the configured floor.
    pub async fn proximity(&self, exercise_id: &ExerciseId, weight: f64) -> Option<Proximity> {
        let best = self
            .store
            .read(|book| book.records.get(exercise_id).map(|r| r.best_weight))
            .await?;
        let percent = closeness_percent(weight, best)?;
        let level = ProximityLevel::classify(percent, self.config.proximity_floor_percent)?;

        Some(Proximity {
            percent,
            level,
            remaining_kg: (best - weight).max(0.0),
        })
    }

    /// Record statistics as of now.
    pub async fn pr_stats(&self) -> PrStats {
        self.pr_stats_at(Utc::now()).await
    }

    /// Record statistics as of `now`.
    pub async fn pr_stats_at(&self, now: Time) -> PrStats {
        let recent = HistoryWindow::Days(self.config.recent_days);
        let week = HistoryWindow::Days(self.config.week_days);

        self.store
            .read(|book| {
                let count_within = |window: HistoryWindow| {
                    book.records
                        .values()
                        .filter(|r| window.contains(r.last_updated_at, now))
                        .count()
                };

                PrStats {
                    total_records: book.records.len(),
                    recent_records: count_within(recent),
                    this_week_records: count_within(week),
                    strongest_lift: strongest(book),
                }
            })
            .await
    }
}
