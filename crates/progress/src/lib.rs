//! Progress Tracking
//!
//! Personal-record detection, one-rep-max estimation, history queries,
//! milestones, achievements and PR notifications.

#![warn(missing_docs)]

pub mod estimator;
pub mod comparator;
pub mod store;
pub mod tracker;
pub mod query;
pub mod milestone;
pub mod achievement;
pub mod proximity;
pub mod notify;
pub mod config;
pub mod error;

pub use estimator::{estimate_one_rep_max, intensity_table, peak_one_rep_max, round1, IntensityRow};
pub use comparator::{compare, Comparison};
pub use store::RecordStore;
pub use tracker::{BasicPrTracker, Evaluation, PrTracker};
pub use milestone::{compute_milestones, plate_count, Milestone};
pub use achievement::{evaluate_achievements, Achievement, AchievementMetric, VOLUME_KING_KG};
pub use proximity::{closeness_percent, PrStats, Proximity, ProximityLevel, StrongestLift};
pub use notify::{emit, BroadcastSink, LogSink, NotificationSink, PrEvent};
pub use config::TrackerConfig;
pub use error::TrackerError;
