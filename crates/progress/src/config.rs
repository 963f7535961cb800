//! Tracker configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the PR tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Window, in days, for "recent" record counts
    pub recent_days: u32,
    /// Window, in days, for "this week" record counts
    pub week_days: u32,
    /// Closeness below this percent of the best weight yields no proximity signal
    pub proximity_floor_percent: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            recent_days: 30,
            week_days: 7,
            proximity_floor_percent: 90.0,
        }
    }
}
