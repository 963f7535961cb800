//! Account-level achievements derived from the record store.
//!
//! Nothing here is stored: every flag and progress pair is recomputed from
//! the current records, so flags cannot drift from the data behind them.

use ironlog_core::PersonalRecordState;
use ironlog_storage::Storage;
use serde::Serialize;

use crate::tracker::BasicPrTracker;

/// Cumulative best-volume target for `volume_king`.
pub const VOLUME_KING_KG: f64 = 100_000.0;

/// What an achievement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementMetric {
    /// Distinct exercises with at least one PR
    ExercisesWithPr,
    /// Heaviest best weight across all exercises
    MaxWeight,
    /// Sum of every exercise's best volume
    TotalBestVolume,
}

struct AchievementDef {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    metric: AchievementMetric,
    requirement: f64,
}

const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_pr",
        title: "First PR",
        description: "Set your first personal record",
        metric: AchievementMetric::ExercisesWithPr,
        requirement: 1.0,
    },
    AchievementDef {
        id: "pr_collector",
        title: "PR Collector",
        description: "Set personal records in 10 different exercises",
        metric: AchievementMetric::ExercisesWithPr,
        requirement: 10.0,
    },
    AchievementDef {
        id: "pr_master",
        title: "PR Master",
        description: "Set personal records in 25 different exercises",
        metric: AchievementMetric::ExercisesWithPr,
        requirement: 25.0,
    },
    AchievementDef {
        id: "century_club",
        title: "Century Club",
        description: "Lift 100 kg or more",
        metric: AchievementMetric::MaxWeight,
        requirement: 100.0,
    },
    AchievementDef {
        id: "beast_mode",
        title: "Beast Mode",
        description: "Lift 140 kg or more",
        metric: AchievementMetric::MaxWeight,
        requirement: 140.0,
    },
    AchievementDef {
        id: "titan",
        title: "Titan",
        description: "Lift 180 kg or more",
        metric: AchievementMetric::MaxWeight,
        requirement: 180.0,
    },
    AchievementDef {
        id: "legend",
        title: "Legend",
        description: "Lift 200 kg or more",
        metric: AchievementMetric::MaxWeight,
        requirement: 200.0,
    },
    AchievementDef {
        id: "volume_king",
        title: "Volume King",
        description: "Reach 100,000 kg of combined best-set volume",
        metric: AchievementMetric::TotalBestVolume,
        requirement: VOLUME_KING_KG,
    },
];

/// An achievement and the caller's progress toward it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    /// Stable identifier
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// What it takes
    pub description: &'static str,
    /// Measured quantity
    pub metric: AchievementMetric,
    /// Whether `current >= requirement`
    pub unlocked: bool,
    /// Current value of the metric
    pub current: f64,
    /// Value needed to unlock
    pub requirement: f64,
}

impl Achievement {
    /// Progress toward the requirement, clamped to 0..=100.
    pub fn progress_percent(&self) -> f64 {
        if self.requirement <= 0.0 {
            return 100.0;
        }
        (self.current / self.requirement * 100.0).clamp(0.0, 100.0)
    }
}

/// Aggregates over a record snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Totals {
    exercises: usize,
    max_weight: f64,
    total_volume: f64,
}

impl Totals {
    fn of(records: &[PersonalRecordState]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            exercises: acc.exercises + 1,
            max_weight: acc.max_weight.max(r.best_weight),
            total_volume: acc.total_volume + r.best_volume,
        })
    }

    fn value(&self, metric: AchievementMetric) -> f64 {
        match metric {
            AchievementMetric::ExercisesWithPr => self.exercises as f64,
            AchievementMetric::MaxWeight => self.max_weight,
            AchievementMetric::TotalBestVolume => self.total_volume,
        }
    }
}

/// Evaluate every achievement against a record snapshot.
pub fn evaluate_achievements(records: &[PersonalRecordState]) -> Vec<Achievement> {
    let totals = Totals::of(records);

    ACHIEVEMENTS
        .iter()
        .map(|def| {
            let current = totals.value(def.metric);
            Achievement {
                id: def.id,
                title: def.title,
                description: def.description,
                metric: def.metric,
                unlocked: current >= def.requirement,
                current,
                requirement: def.requirement,
            }
        })
        .collect()
}

impl<S: Storage> BasicPrTracker<S> {
    /// Achievements for the current record store.
    pub async fn achievements(&self) -> Vec<Achievement> {
        evaluate_achievements(&self.query_all_records().await)
    }
}
