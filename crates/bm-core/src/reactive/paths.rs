//! Filter-control driven recomputation of the migration map

use crate::aggregate::migration_path_segments;
use crate::selection::SelectionState;
use crate::store::DatasetStore;

use super::MapPathData;

/// Path segments for the rows matching region, species and rest-stop range.
///
/// Any field change recomputes the whole list; an empty match is an empty
/// map.
pub fn compute_map_paths(store: &DatasetStore, selection: &SelectionState) -> MapPathData {
    let view = store.filter(|r| selection.matches(r));
    tracing::debug!(
        "Map filter {}/{} rest stops {}..={} matched {} rows",
        selection.region,
        selection.species,
        selection.rest_stop_range.low,
        selection.rest_stop_range.high,
        view.len()
    );

    MapPathData {
        segments: migration_path_segments(&view),
    }
}
