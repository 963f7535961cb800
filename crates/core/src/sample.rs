//! Performance samples - one logged set - and history windows.

use crate::error::ValidationError;
use crate::id::ExerciseId;
use crate::Time;
use serde::{Deserialize, Serialize};

/// One completed set as reported by the workout recorder.
///
/// Samples are immutable once created and are only ever appended to an
/// exercise's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// Exercise performed
    pub exercise_id: ExerciseId,

    /// Display name at the time of logging
    pub exercise_name: String,

    /// Load in kilograms
    pub weight: f64,

    /// Completed repetitions
    pub reps: u32,

    /// When the set was completed
    pub timestamp: Time,
}

impl PerformanceSample {
    /// Create a sample, rejecting unusable weights.
    pub fn new(
        exercise_id: ExerciseId,
        exercise_name: impl Into<String>,
        weight: f64,
        reps: u32,
        timestamp: Time,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            exercise_id,
            exercise_name: exercise_name.into(),
            weight: ValidationError::check_weight(weight)?,
            reps,
            timestamp,
        })
    }

    /// Single-set volume (weight × reps).
    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

/// Time window for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryWindow {
    /// The trailing N days, inclusive of the boundary instant.
    Days(u32),
    /// The whole history.
    All,
}

impl HistoryWindow {
    /// Earliest timestamp still inside the window.
    ///
    /// `None` for `All`, and for day counts reaching past the earliest
    /// representable time, which then bound nothing.
    pub fn cutoff(&self, now: Time) -> Option<Time> {
        match self {
            HistoryWindow::Days(days) => {
                now.checked_sub_signed(chrono::TimeDelta::try_days(i64::from(*days))?)
            }
            HistoryWindow::All => None,
        }
    }

    /// Whether `timestamp` falls inside the window ending at `now`.
    pub fn contains(&self, timestamp: Time, now: Time) -> bool {
        match self.cutoff(now) {
            Some(cutoff) => timestamp >= cutoff,
            None => true,
        }
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        HistoryWindow::All
    }
}

impl std::fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryWindow::Days(days) => write!(f, "{}", days),
            HistoryWindow::All => f.write_str("all"),
        }
    }
}

impl std::str::FromStr for HistoryWindow {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(HistoryWindow::All);
        }
        s.parse::<u32>()
            .map(HistoryWindow::Days)
            .map_err(|_| ValidationError::BadWindow(s.to_string()))
    }
}
