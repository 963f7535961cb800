//! One-rep-max estimation.

use ironlog_core::{PerformanceSample, ValidationError};
use serde::Serialize;

/// Estimate a single-repetition maximum with the Epley formula.
///
/// A single rep is already a 1RM and is returned unchanged. Otherwise the
/// result is `weight × (1 + reps / 30)` rounded to one decimal place.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> Result<f64, ValidationError> {
    let weight = ValidationError::check_weight(weight)?;
    if reps < 1 {
        return Err(ValidationError::BadReps { value: reps, min: 1 });
    }

    if reps == 1 {
        return Ok(weight);
    }

    Ok(round1(weight * (1.0 + reps as f64 / 30.0)))
}

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage-of-1RM chart: (percent, typical rep range).
const INTENSITY_CHART: &[(u32, &str)] = &[
    (100, "1"),
    (95, "2"),
    (93, "3"),
    (90, "4"),
    (87, "5"),
    (85, "6"),
    (83, "7"),
    (80, "8"),
    (77, "9"),
    (75, "10"),
    (70, "11-12"),
    (65, "13-15"),
    (60, "16-20"),
];

/// One row of a training-intensity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityRow {
    /// Percent of the 1RM
    pub percent: u32,
    /// Target load at that percent
    pub weight: f64,
    /// Rep range usually achievable at that load
    pub reps: &'static str,
}

/// Target loads for the standard intensity chart.
pub fn intensity_table(one_rep_max: f64) -> Vec<IntensityRow> {
    INTENSITY_CHART
        .iter()
        .map(|&(percent, reps)| IntensityRow {
            percent,
            weight: round1(one_rep_max * percent as f64 / 100.0),
            reps,
        })
        .collect()
}

/// Highest estimated 1RM over `samples`.
///
/// Zero-rep sets carry no strength signal and are skipped. `None` when no
/// sample qualifies.
pub fn peak_one_rep_max(samples: &[PerformanceSample]) -> Option<f64> {
    samples
        .iter()
        .filter_map(|s| estimate_one_rep_max(s.weight, s.reps).ok())
        .fold(None, |peak: Option<f64>, orm| Some(peak.map_or(orm, |p| p.max(orm))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn set(weight: f64, reps: u32) -> PerformanceSample {
        PerformanceSample::new("bench".into(), "Bench Press", weight, reps, Utc::now()).unwrap()
    }

    #[test]
    fn test_single_rep_is_unchanged() {
        assert_eq!(estimate_one_rep_max(100.0, 1).unwrap(), 100.0);
        assert_eq!(estimate_one_rep_max(142.5, 1).unwrap(), 142.5);
    }

    #[test]
    fn test_epley_rounded_to_one_decimal() {
        // 100 × (1 + 10/30) = 133.33…
        assert_eq!(estimate_one_rep_max(100.0, 10).unwrap(), 133.3);
        // 100 × (1 + 5/30) = 116.66…
        assert_eq!(estimate_one_rep_max(100.0, 5).unwrap(), 116.7);
        assert_eq!(estimate_one_rep_max(0.0, 5).unwrap(), 0.0);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            estimate_one_rep_max(100.0, 0),
            Err(ValidationError::BadReps { value: 0, min: 1 })
        );
        assert_eq!(estimate_one_rep_max(-1.0, 5), Err(ValidationError::BadWeight(-1.0)));
    }

    #[test]
    fn test_intensity_table() {
        let table = intensity_table(200.0);
        assert_eq!(table.len(), 13);
        assert_eq!(table[0], IntensityRow { percent: 100, weight: 200.0, reps: "1" });
        assert_eq!(table[4].weight, 174.0);
        assert_eq!(table[12].reps, "16-20");
        assert!(table.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn test_peak_prefers_lighter_high_rep_set() {
        // 90 × (1 + 10/30) = 120 beats the 100 kg single
        assert_eq!(peak_one_rep_max(&[set(100.0, 1), set(90.0, 10)]), Some(120.0));
        assert_eq!(peak_one_rep_max(&[set(100.0, 1), set(60.0, 5)]), Some(100.0));
    }

    #[test]
    fn test_peak_skips_zero_rep_sets() {
        assert_eq!(peak_one_rep_max(&[]), None);
        assert_eq!(peak_one_rep_max(&[set(200.0, 0)]), None);
        assert_eq!(peak_one_rep_max(&[set(200.0, 0), set(80.0, 3)]), Some(88.0));
    }
}
