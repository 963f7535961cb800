//! PR notification - the comparator's transient output.

use crate::Time;
use serde::{Deserialize, Serialize};

/// Which record a sample broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrKind {
    /// Heavier than ever before
    Weight,
    /// More reps at the current best weight
    Reps,
    /// Largest single-set volume
    Volume,
}

impl PrKind {
    /// Unit of the values carried for this kind.
    pub fn unit(&self) -> &'static str {
        match self {
            PrKind::Weight | PrKind::Volume => "kg",
            PrKind::Reps => "reps",
        }
    }
}

impl std::fmt::Display for PrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PrKind::Weight => "weight",
            PrKind::Reps => "reps",
            PrKind::Volume => "volume",
        })
    }
}

/// A confirmed personal record. Produced at most once per sample and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrNotification {
    /// Record type that fired
    pub kind: PrKind,

    /// Exercise display name
    pub exercise_name: String,

    /// New best value
    pub new_value: f64,

    /// Best value before this sample (0 for a first sample)
    pub old_value: f64,

    /// Unrounded `(new - old) / old * 100`
    pub improvement_percent: f64,

    /// Timestamp of the sample
    pub timestamp: Time,

    /// Set when this is the exercise's first logged sample
    #[serde(default)]
    pub first_record: bool,
}

impl PrNotification {
    /// Build a notification, computing the improvement from old to new.
    ///
    /// A zero baseline reports 100%.
    pub fn new(
        kind: PrKind,
        exercise_name: impl Into<String>,
        new_value: f64,
        old_value: f64,
        timestamp: Time,
    ) -> Self {
        let improvement_percent = if old_value > 0.0 {
            (new_value - old_value) / old_value * 100.0
        } else {
            100.0
        };

        Self {
            kind,
            exercise_name: exercise_name.into(),
            new_value,
            old_value,
            improvement_percent,
            timestamp,
            first_record: false,
        }
    }

    /// Notification for an exercise's first sample: a weight record over
    /// a zero baseline.
    pub fn first(exercise_name: impl Into<String>, weight: f64, timestamp: Time) -> Self {
        Self {
            first_record: true,
            ..Self::new(PrKind::Weight, exercise_name, weight, 0.0, timestamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_improvement_is_unrounded() {
        let n = PrNotification::new(PrKind::Weight, "Bench Press", 110.0, 100.0, Utc::now());
        assert!((n.improvement_percent - 10.0).abs() < 1e-9);

        let n = PrNotification::new(PrKind::Reps, "Bench Press", 7.0, 6.0, Utc::now());
        assert!((n.improvement_percent - 16.666_666_666).abs() < 1e-6);
    }

    #[test]
    fn test_zero_baseline_reports_hundred() {
        let n = PrNotification::new(PrKind::Reps, "Pull-up", 12.0, 0.0, Utc::now());
        assert_eq!(n.improvement_percent, 100.0);
    }

    #[test]
    fn test_zero_baseline_is_not_a_first_record() {
        let n = PrNotification::new(PrKind::Volume, "Bench Press", 200.0, 0.0, Utc::now());
        assert!(!n.first_record);

        let n = PrNotification::first("Bench Press", 50.0, Utc::now());
        assert!(n.first_record);
        assert_eq!(n.kind, PrKind::Weight);
        assert_eq!(n.old_value, 0.0);
        assert_eq!(n.improvement_percent, 100.0);
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(serde_json::to_string(&PrKind::Volume).unwrap(), "\"volume\"");
        assert_eq!(PrKind::Reps.unit(), "reps");
    }
}
