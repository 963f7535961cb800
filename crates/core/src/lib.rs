//! ironlog core data models.
//!
//! This crate defines the data structures shared by the record store,
//! the PR comparator and the presentation-facing queries.

#![warn(missing_docs)]

// Core identities
mod id;

// Logged sets and per-exercise bests
mod sample;
mod record;
mod book;

// Comparator output
mod notification;

// Input validation
mod error;

// Re-exports
pub use id::ExerciseId;

pub use sample::{HistoryWindow, PerformanceSample};
pub use record::{PersonalRecordState, RecordSnapshot};
pub use book::RecordBook;
pub use notification::{PrKind, PrNotification};
pub use error::ValidationError;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
