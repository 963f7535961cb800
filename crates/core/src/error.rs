//! Input validation errors.

use thiserror::Error;

/// Rejections raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Weight is negative, NaN or infinite.
    #[error("weight must be a finite, non-negative number: {0}")]
    BadWeight(f64),

    /// Repetition count outside the accepted range.
    #[error("repetitions must be at least {min}: {value}")]
    BadReps {
        /// Value supplied by the caller
        value: u32,
        /// Smallest accepted value
        min: u32,
    },

    /// Timestamp text that could not be parsed.
    #[error("malformed timestamp: {0}")]
    BadTimestamp(String),

    /// History window text that is neither `all` nor a day count.
    #[error("invalid history window: {0}")]
    BadWindow(String),
}

impl ValidationError {
    /// Check that a weight is usable for comparisons and volume math.
    pub fn check_weight(weight: f64) -> Result<f64, Self> {
        if weight.is_finite() && weight >= 0.0 {
            Ok(weight)
        } else {
            Err(Self::BadWeight(weight))
        }
    }

    /// Parse an RFC 3339 timestamp into UTC.
    pub fn parse_timestamp(text: &str) -> Result<crate::Time, Self> {
        chrono::DateTime::parse_from_rfc3339(text.trim())
            .map(|t| t.with_timezone(&chrono::Utc))
            .map_err(|_| Self::BadTimestamp(text.to_string()))
    }
}
