//! Aggregations over filtered views of the migration table

use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::model::{MigrationOutcome, MigrationRecord};
use crate::reactive::PathSegment;
use crate::store::FilteredView;

/// Column a grouped count partitions rows by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Region,
    Species,
    MigrationReason,
}

impl GroupKey {
    fn value<'r>(&self, record: &'r MigrationRecord) -> &'r str {
        match self {
            GroupKey::Region => &record.region,
            GroupKey::Species => &record.species,
            GroupKey::MigrationReason => &record.migration_reason,
        }
    }
}

/// Per-outcome row counts for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub successful: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    pub fn get(&self, outcome: MigrationOutcome) -> usize {
        match outcome {
            MigrationOutcome::Successful => self.successful,
            MigrationOutcome::Failed => self.failed,
        }
    }

    fn increment(&mut self, outcome: MigrationOutcome) {
        match outcome {
            MigrationOutcome::Successful => self.successful += 1,
            MigrationOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.successful + self.failed
    }
}

/// Summary statistics shown on the stat cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mode_reason: String,
    pub max_distance: f64,
    pub mean_flock_size: f64,
    pub min_altitude: f64,
}

/// Count rows per outcome within each group.
///
/// Every group carries both outcomes, zero when a group has no rows of that
/// outcome. Groups appear in the order their key value first occurs.
pub fn grouped_outcome_counts(view: &FilteredView<'_>, key: GroupKey) -> IndexMap<String, OutcomeCounts> {
    let mut groups: IndexMap<String, OutcomeCounts> = IndexMap::new();

    for record in view.records() {
        let value = key.value(record);
        match groups.get_mut(value) {
            Some(counts) => counts.increment(record.migration_success),
            None => {
                let mut counts = OutcomeCounts::default();
                counts.increment(record.migration_success);
                groups.insert(value.to_string(), counts);
            }
        }
    }

    groups
}

/// Count rows per species over the globally known species set.
///
/// The keys are exactly `known_species` in the given order; species absent
/// from the view map to zero and species outside the set are not counted.
pub fn species_composition(view: &FilteredView<'_>, known_species: &[String]) -> IndexMap<String, usize> {
    let mut composition: IndexMap<String, usize> =
        known_species.iter().map(|species| (species.clone(), 0)).collect();

    for record in view.records() {
        if let Some(count) = composition.get_mut(&record.species) {
            *count += 1;
        }
    }

    composition
}

/// Mode, max, mean and min over the view.
///
/// Returns [`DashboardError::EmptySelection`] for an empty view since none of
/// the aggregates is defined there.
pub fn summary_stats(view: &FilteredView<'_>) -> Result<SummaryStats> {
    if view.is_empty() {
        return Err(DashboardError::EmptySelection { aggregate: "summary statistics" });
    }

    let mode_reason = mode_reason(view)
        .ok_or(DashboardError::EmptySelection { aggregate: "migration reason mode" })?;

    let mut max_distance = f64::NEG_INFINITY;
    let mut min_altitude = f64::INFINITY;
    let mut flock_total = 0.0;

    for record in view.records() {
        max_distance = max_distance.max(record.flight_distance_km);
        min_altitude = min_altitude.min(record.min_altitude_m);
        flock_total += record.flock_size;
    }

    let mean_flock_size = round_half_even(flock_total / view.len() as f64, 2);

    Ok(SummaryStats {
        mode_reason,
        max_distance,
        mean_flock_size,
        min_altitude,
    })
}

/// Most frequent migration reason.
///
/// Ties go to the value whose running count reaches the final maximum first
/// while scanning the rows in table order.
fn mode_reason(view: &FilteredView<'_>) -> Option<String> {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for record in view.records() {
        *counts.entry(record.migration_reason.as_str()).or_insert(0) += 1;
    }

    let max_count = counts.values().copied().max()?;

    let mut running: AHashMap<&str, usize> = AHashMap::new();
    for record in view.records() {
        let count = running.entry(record.migration_reason.as_str()).or_insert(0);
        *count += 1;
        if *count == max_count {
            return Some(record.migration_reason.clone());
        }
    }

    None
}

/// One start-to-end segment per row, identified by the row's table index
pub fn migration_path_segments(view: &FilteredView<'_>) -> Vec<PathSegment> {
    view.iter()
        .map(|(idx, record)| PathSegment {
            segment_id: idx,
            points: [record.start, record.end],
        })
        .collect()
}

/// Round to `decimals` places, ties to even
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
