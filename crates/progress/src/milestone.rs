//! Weight milestones.

use serde::Serialize;

/// Absolute weight thresholds and their badge labels, ascending.
const WEIGHT_MILESTONES: &[(f64, &str)] = &[
    (100.0, "Century Club"),
    (140.0, "140kg Club"),
    (180.0, "180kg Club"),
    (200.0, "200kg Club"),
    (225.0, "225kg Master"),
];

/// Plate size used for plate-count milestones.
const PLATE_KG: f64 = 20.0;

/// Smallest plate count that earns a badge.
const MIN_PLATES: u32 = 3;

/// Largest plate count that earns a badge (500 kg).
pub const MAX_PLATES: u32 = 25;

/// A badge unlocked by a best weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Milestone {
    /// Crossed a fixed weight threshold
    Weight {
        /// Threshold in kg
        threshold: f64,
        /// Badge label
        label: &'static str,
    },
    /// Lifted at least this many 20 kg plates' worth
    Plates {
        /// Plate count
        count: u32,
    },
}

impl Milestone {
    /// Display label.
    pub fn label(&self) -> String {
        match self {
            Milestone::Weight { label, .. } => (*label).to_string(),
            Milestone::Plates { count } => format!("{} Plates", count),
        }
    }
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Milestones unlocked by `best_weight`, weight badges first, then plates.
///
/// Every plate count from three up to `floor(best_weight / 20)` is listed,
/// so a heavier weight always unlocks a superset of a lighter one. Plate
/// badges stop at [`MAX_PLATES`].
pub fn compute_milestones(best_weight: f64) -> Vec<Milestone> {
    let mut milestones: Vec<Milestone> = WEIGHT_MILESTONES
        .iter()
        .take_while(|(threshold, _)| best_weight >= *threshold)
        .map(|&(threshold, label)| Milestone::Weight { threshold, label })
        .collect();

    let plates = plate_count(best_weight);
    milestones.extend((MIN_PLATES..=plates).map(|count| Milestone::Plates { count }));

    milestones
}

/// Whole 20 kg plates in `weight`, saturating at [`MAX_PLATES`].
pub fn plate_count(weight: f64) -> u32 {
    if weight.is_finite() && weight > 0.0 {
        let plates = (weight / PLATE_KG).floor();
        if plates >= MAX_PLATES as f64 {
            MAX_PLATES
        } else {
            plates as u32
        }
    } else {
        0
    }
}
