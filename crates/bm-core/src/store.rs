//! Read-only in-memory dataset

use crate::model::MigrationRecord;

/// The full migration table, loaded once at startup and never mutated.
///
/// Distinct regions and species are kept in first-appearance order so that
/// chart categories and dropdowns follow the table rather than a sort.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    records: Vec<MigrationRecord>,
    regions: Vec<String>,
    species: Vec<String>,
    rest_stop_bounds: Option<(i64, i64)>,
}

impl DatasetStore {
    /// Build a store from records in table order
    pub fn new(records: Vec<MigrationRecord>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        let mut species: Vec<String> = Vec::new();
        let mut rest_stop_bounds: Option<(i64, i64)> = None;

        for record in &records {
            if !regions.contains(&record.region) {
                regions.push(record.region.clone());
            }
            if !species.contains(&record.species) {
                species.push(record.species.clone());
            }
            rest_stop_bounds = Some(match rest_stop_bounds {
                None => (record.rest_stops, record.rest_stops),
                Some((low, high)) => (low.min(record.rest_stops), high.max(record.rest_stops)),
            });
        }

        tracing::debug!(
            "Dataset store built: {} rows, {} regions, {} species",
            records.len(),
            regions.len(),
            species.len()
        );

        Self {
            records,
            regions,
            species,
            rest_stop_bounds,
        }
    }

    pub fn records(&self) -> &[MigrationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions in first-appearance order
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Distinct species in first-appearance order
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Observed (min, max) of `rest_stops`, `None` for an empty table
    pub fn rest_stop_bounds(&self) -> Option<(i64, i64)> {
        self.rest_stop_bounds
    }

    /// View over every row of the table
    pub fn all(&self) -> FilteredView<'_> {
        FilteredView {
            store: self,
            indices: (0..self.records.len()).collect(),
        }
    }

    /// View over the rows matching `predicate`, in table order
    pub fn filter<F>(&self, predicate: F) -> FilteredView<'_>
    where
        F: Fn(&MigrationRecord) -> bool,
    {
        let indices = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| predicate(record))
            .map(|(idx, _)| idx)
            .collect();

        FilteredView { store: self, indices }
    }
}

/// A subset of table rows that keeps each row's original index
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    store: &'a DatasetStore,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Original table indices of the rows in this view
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Rows with their original table index, in table order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a MigrationRecord)> + '_ {
        let records = self.store.records();
        self.indices.iter().map(move |&idx| (idx, &records[idx]))
    }

    /// Rows without their index
    pub fn records(&self) -> impl Iterator<Item = &'a MigrationRecord> + '_ {
        self.iter().map(|(_, record)| record)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{GeoPoint, MigrationOutcome, MigrationRecord};

    /// Build a record with the fields the aggregates look at
    pub fn record(
        region: &str,
        species: &str,
        outcome: MigrationOutcome,
        reason: &str,
        rest_stops: i64,
    ) -> MigrationRecord {
        MigrationRecord {
            region: region.to_string(),
            species: species.to_string(),
            migration_success: outcome,
            migration_reason: reason.to_string(),
            flight_distance_km: 1000.0,
            flock_size: 10.0,
            min_altitude_m: 500.0,
            rest_stops,
            start: GeoPoint::new(10.0, 20.0),
            end: GeoPoint::new(30.0, 40.0),
        }
    }
}
