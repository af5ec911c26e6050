//! Selection state driven by the filter controls and bar clicks

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result, SelectionField};
use crate::events::FilterChangeEvent;
use crate::model::{MigrationOutcome, MigrationRecord};
use crate::settings::DashboardSettings;
use crate::store::DatasetStore;

/// Inclusive range of rest stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestStopRange {
    pub low: i64,
    pub high: i64,
}

impl RestStopRange {
    pub fn new(low: i64, high: i64) -> Result<Self> {
        if low > high {
            return Err(DashboardError::InvalidSelection {
                field: SelectionField::RestStopRange,
                value: format!("({}, {})", low, high),
            });
        }
        Ok(Self { low, high })
    }

    /// Every rest-stop count the range admits
    pub fn values(&self) -> std::ops::RangeInclusive<i64> {
        self.low..=self.high
    }

    pub fn contains(&self, rest_stops: i64) -> bool {
        self.values().contains(&rest_stops)
    }

    /// Clamp both ends into `(min, max)`
    pub fn clamp_to(&self, (min, max): (i64, i64)) -> Self {
        let low = self.low.clamp(min, max);
        let high = self.high.clamp(low, max);
        Self { low, high }
    }
}

/// Current filter-control values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub region: String,
    pub species: String,
    pub rest_stop_range: RestStopRange,
}

impl SelectionState {
    /// Whether a row passes the map filter
    pub fn matches(&self, record: &MigrationRecord) -> bool {
        record.region == self.region
            && record.species == self.species
            && self.rest_stop_range.contains(record.rest_stops)
    }

    /// Startup selection: configured defaults when the table has them,
    /// otherwise the first distinct values, with the range clamped into the
    /// observed bounds.
    pub fn initial(settings: &DashboardSettings, domain: &SelectionDomain) -> Self {
        let region = domain
            .pick(&domain.regions, &settings.default_region)
            .unwrap_or_default();
        let species = domain
            .pick(&domain.species, &settings.default_species)
            .unwrap_or_default();

        let (low, high) = settings.default_rest_stops;
        let requested = RestStopRange {
            low: low.min(high),
            high: low.max(high),
        };
        let rest_stop_range = match domain.rest_stop_bounds {
            Some(bounds) => requested.clamp_to(bounds),
            None => requested,
        };

        Self {
            region,
            species,
            rest_stop_range,
        }
    }

    /// Produce the replacement selection for a filter change.
    ///
    /// The current state is untouched; a rejected change leaves the caller
    /// holding the prior selection.
    pub fn apply(&self, change: &FilterChangeEvent, domain: &SelectionDomain) -> Result<SelectionState> {
        let mut next = self.clone();
        match change {
            FilterChangeEvent::Region(region) => next.region = region.clone(),
            FilterChangeEvent::Species(species) => next.species = species.clone(),
            FilterChangeEvent::RestStopRange { low, high } => {
                next.rest_stop_range = RestStopRange::new(*low, *high)?;
            }
        }
        domain.validate(&next)?;
        Ok(next)
    }
}

/// Values a selection may take, as observed in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDomain {
    pub regions: Vec<String>,
    pub species: Vec<String>,
    pub rest_stop_bounds: Option<(i64, i64)>,
}

impl SelectionDomain {
    pub fn from_store(store: &DatasetStore) -> Self {
        Self {
            regions: store.regions().to_vec(),
            species: store.species().to_vec(),
            rest_stop_bounds: store.rest_stop_bounds(),
        }
    }

    fn pick(&self, values: &[String], preferred: &str) -> Option<String> {
        if values.iter().any(|v| v == preferred) {
            Some(preferred.to_string())
        } else {
            values.first().cloned()
        }
    }

    pub fn validate_region(&self, region: &str) -> Result<()> {
        if self.regions.iter().any(|r| r == region) {
            Ok(())
        } else {
            Err(DashboardError::InvalidSelection {
                field: SelectionField::Region,
                value: region.to_string(),
            })
        }
    }

    pub fn validate_species(&self, species: &str) -> Result<()> {
        if self.species.iter().any(|s| s == species) {
            Ok(())
        } else {
            Err(DashboardError::InvalidSelection {
                field: SelectionField::Species,
                value: species.to_string(),
            })
        }
    }

    pub fn validate_range(&self, range: &RestStopRange) -> Result<()> {
        let in_bounds = match self.rest_stop_bounds {
            Some((min, max)) => range.low <= range.high && range.low >= min && range.high <= max,
            None => false,
        };
        if in_bounds {
            Ok(())
        } else {
            Err(DashboardError::InvalidSelection {
                field: SelectionField::RestStopRange,
                value: format!("({}, {})", range.low, range.high),
            })
        }
    }

    pub fn validate(&self, selection: &SelectionState) -> Result<()> {
        self.validate_region(&selection.region)?;
        self.validate_species(&selection.species)?;
        self.validate_range(&selection.rest_stop_range)
    }
}

/// Region and outcome implied by a bar-chart click
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillSelection {
    pub region: String,
    pub outcome: MigrationOutcome,
}

impl DrillSelection {
    /// Rows behind the clicked bar
    pub fn matches(&self, record: &MigrationRecord) -> bool {
        record.region == self.region && record.migration_success == self.outcome
    }

    /// Rows feeding the species pie, which filters on region only
    pub fn matches_region(&self, record: &MigrationRecord) -> bool {
        record.region == self.region
    }
}
