//! Bar-click driven recomputation of the stat cards and species pie

use crate::aggregate::{species_composition, summary_stats};
use crate::error::{DashboardError, Result, SelectionField};
use crate::events::BarClickEvent;
use crate::model::MigrationOutcome;
use crate::selection::{DrillSelection, SelectionDomain};
use crate::store::DatasetStore;

use super::{PieChartData, StatsCardOutput};

pub const SPECIES_TITLE: &str = "Species Population";
pub const SPECIES_PER_REGION_TITLE: &str = "Species Population per Region";

/// Drill state of the stats/pie unit.
///
/// There is no click that returns to `Unselected`; only a dashboard reset
/// does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DrillState {
    #[default]
    Unselected,
    Drilled(DrillSelection),
}

impl DrillState {
    /// State entered on a bar click.
    ///
    /// Curves other than the two outcome series are rejected, as are
    /// categories that are not regions of the table.
    pub fn on_click(event: &BarClickEvent, domain: &SelectionDomain) -> Result<DrillState> {
        let outcome = MigrationOutcome::from_curve_number(event.curve_number).ok_or(
            DashboardError::UnrecognizedEvent {
                curve_number: event.curve_number,
            },
        )?;

        if !domain.regions.iter().any(|r| *r == event.x_value) {
            return Err(DashboardError::InvalidSelection {
                field: SelectionField::Region,
                value: event.x_value.clone(),
            });
        }

        Ok(DrillState::Drilled(DrillSelection {
            region: event.x_value.clone(),
            outcome,
        }))
    }

    pub fn drill(&self) -> Option<&DrillSelection> {
        match self {
            DrillState::Unselected => None,
            DrillState::Drilled(drill) => Some(drill),
        }
    }
}

/// Outputs of the stats/pie unit
#[derive(Debug, Clone, PartialEq)]
pub struct DrillOutputs {
    pub stats: StatsCardOutput,
    pub pie: PieChartData,
    /// Rows behind the stat cards
    pub row_count: usize,
}

/// Recompute stat cards and species pie for a drill state.
///
/// `Unselected` aggregates the whole table. `Drilled` computes the stats over
/// region and outcome but the pie over region alone. An empty view yields
/// placeholder cards.
pub fn compute_drill_outputs(store: &DatasetStore, state: &DrillState) -> DrillOutputs {
    let (stats_view, pie_view, title) = match state {
        DrillState::Unselected => (store.all(), store.all(), SPECIES_TITLE),
        DrillState::Drilled(drill) => (
            store.filter(|r| drill.matches(r)),
            store.filter(|r| drill.matches_region(r)),
            SPECIES_PER_REGION_TITLE,
        ),
    };

    let stats = match summary_stats(&stats_view) {
        Ok(stats) => StatsCardOutput::from(&stats),
        Err(err) => {
            tracing::debug!("Showing placeholder stats: {}", err);
            StatsCardOutput::placeholder()
        }
    };

    let composition = species_composition(&pie_view, store.species());

    DrillOutputs {
        stats,
        pie: PieChartData::from_composition(title, &composition),
        row_count: stats_view.len(),
    }
}
