//! Reactive recomputation rules and the outputs they produce
//!
//! Two independent units read the shared store:
//! - [`drill`]: bar-click driven stat cards and species pie
//! - [`paths`]: filter-control driven migration map
//!
//! Both are pure functions of (store, selection); nothing here is cached.

pub mod drill;
pub mod paths;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::aggregate::{grouped_outcome_counts, GroupKey, OutcomeCounts, SummaryStats};
use crate::model::{GeoPoint, MigrationOutcome};
use crate::store::DatasetStore;

pub use drill::{compute_drill_outputs, DrillOutputs, DrillState};
pub use paths::compute_map_paths;

/// Text shown on a stat card when its aggregate is undefined
pub const PLACEHOLDER: &str = "—";

/// Values for the four stat cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsCardOutput {
    pub mode_reason: String,
    pub max_distance_label: String,
    pub mean_flock_size: String,
    pub min_altitude_label: String,
}

impl StatsCardOutput {
    /// Cards for a selection with no rows
    pub fn placeholder() -> Self {
        Self {
            mode_reason: PLACEHOLDER.to_string(),
            max_distance_label: PLACEHOLDER.to_string(),
            mean_flock_size: PLACEHOLDER.to_string(),
            min_altitude_label: PLACEHOLDER.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

/// Card text for a float aggregate. Whole values keep one decimal so the
/// cards read the same whether or not the value has a fraction.
pub fn card_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl From<&SummaryStats> for StatsCardOutput {
    fn from(stats: &SummaryStats) -> Self {
        Self {
            mode_reason: stats.mode_reason.clone(),
            max_distance_label: format!("{} km", card_number(stats.max_distance)),
            mean_flock_size: card_number(stats.mean_flock_size),
            min_altitude_label: format!("{} m", card_number(stats.min_altitude)),
        }
    }
}

/// Slices of the species pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl PieChartData {
    pub fn from_composition(title: impl Into<String>, composition: &IndexMap<String, usize>) -> Self {
        Self {
            title: title.into(),
            labels: composition.keys().cloned().collect(),
            values: composition.values().copied().collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.values.iter().sum()
    }
}

/// Series of the grouped outcome bar chart, one entry per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartData {
    pub categories: Vec<String>,
    pub successful: Vec<usize>,
    pub failed: Vec<usize>,
}

impl BarChartData {
    /// Outcome counts per region over the whole table.
    ///
    /// Computed once at startup; the bar chart is not linked to any filter.
    pub fn from_store(store: &DatasetStore) -> Self {
        Self::from_groups(&grouped_outcome_counts(&store.all(), GroupKey::Region))
    }

    pub fn from_groups(groups: &IndexMap<String, OutcomeCounts>) -> Self {
        Self {
            categories: groups.keys().cloned().collect(),
            successful: groups.values().map(|c| c.successful).collect(),
            failed: groups.values().map(|c| c.failed).collect(),
        }
    }

    /// Counts of one outcome series
    pub fn series(&self, outcome: MigrationOutcome) -> &[usize] {
        match outcome {
            MigrationOutcome::Successful => &self.successful,
            MigrationOutcome::Failed => &self.failed,
        }
    }

    pub fn max_count(&self) -> usize {
        self.successful.iter().chain(self.failed.iter()).copied().max().unwrap_or(0)
    }
}

/// Two-point path between a migration's start and end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Original table index of the row
    pub segment_id: usize,
    pub points: [GeoPoint; 2],
}

/// Segments drawn on the migration map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPathData {
    pub segments: Vec<PathSegment>,
}

impl MapPathData {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MigrationOutcome::*;
    use crate::store::test_support::record;

    #[test]
    fn test_stats_card_labels() {
        let stats = SummaryStats {
            mode_reason: "Feeding".to_string(),
            max_distance: 2986.61,
            mean_flock_size: 48.5,
            min_altitude: 1200.0,
        };
        let cards = StatsCardOutput::from(&stats);
        assert_eq!(cards.mode_reason, "Feeding");
        assert_eq!(cards.max_distance_label, "2986.61 km");
        assert_eq!(cards.mean_flock_size, "48.5");
        assert_eq!(cards.min_altitude_label, "1200.0 m");
        assert!(!cards.is_placeholder());
        assert!(StatsCardOutput::placeholder().is_placeholder());
    }

    #[test]
    fn test_whole_card_values_keep_a_decimal() {
        let stats = SummaryStats {
            mode_reason: "Breeding".to_string(),
            max_distance: 3000.0,
            mean_flock_size: 48.0,
            min_altitude: 0.5,
        };
        let cards = StatsCardOutput::from(&stats);
        assert_eq!(cards.max_distance_label, "3000.0 km");
        assert_eq!(cards.mean_flock_size, "48.0");
        assert_eq!(cards.min_altitude_label, "0.5 m");
        assert_eq!(card_number(-0.0), "-0.0");
        assert_eq!(card_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_bar_chart_data_from_store() {
        let store = DatasetStore::new(vec![
            record("Europe", "Stork", Failed, "Breeding", 2),
            record("Asia", "Eagle", Successful, "Feeding", 3),
            record("Europe", "Stork", Failed, "Breeding", 2),
        ]);

        let bars = BarChartData::from_store(&store);
        assert_eq!(bars.categories, vec!["Europe", "Asia"]);
        assert_eq!(bars.series(Successful), &[0, 1]);
        assert_eq!(bars.series(Failed), &[2, 0]);
        assert_eq!(bars.max_count(), 2);
    }
}
