//! Filter form driving the migration map
//! Region and species pickers plus a two-handle rest-stop range

use egui::{ComboBox, Slider, Ui};

use bm_core::{FilterChangeEvent, RestStopRange, SelectionDomain, SelectionState};

/// Which handle of the range the user moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeHandle {
    Low,
    High,
}

/// Filter panel configuration
#[derive(Debug, Clone)]
pub struct FilterPanelConfig {
    pub region_label: String,
    pub species_label: String,
    pub rest_stops_label: String,

    /// Width of the pickers
    pub combo_width: f32,
}

impl Default for FilterPanelConfig {
    fn default() -> Self {
        Self {
            region_label: "Select region".to_string(),
            species_label: "Select species".to_string(),
            rest_stops_label: "Number of rest stops".to_string(),
            combo_width: 180.0,
        }
    }
}

/// Range after moving one handle, keeping `low <= high` by pushing the other
/// handle along
pub fn moved_range(current: RestStopRange, handle: RangeHandle, value: i64) -> RestStopRange {
    match handle {
        RangeHandle::Low => RestStopRange {
            low: value,
            high: current.high.max(value),
        },
        RangeHandle::High => RestStopRange {
            low: current.low.min(value),
            high: value,
        },
    }
}

fn picker(ui: &mut Ui, id: &str, label: &str, current: &str, options: &[String], width: f32) -> Option<String> {
    let mut picked = None;
    ui.label(label);
    ComboBox::from_id_source(id)
        .selected_text(current)
        .width(width)
        .show_ui(ui, |ui| {
            for option in options {
                if ui.selectable_label(option == current, option.as_str()).clicked() && option != current {
                    picked = Some(option.clone());
                }
            }
        });
    picked
}

/// Draw the filter controls and return the changes the user made this frame
pub fn show_filter_panel(
    ui: &mut Ui,
    selection: &SelectionState,
    domain: &SelectionDomain,
    config: &FilterPanelConfig,
) -> Vec<FilterChangeEvent> {
    let mut changes = Vec::new();

    ui.horizontal_wrapped(|ui| {
        if let Some(region) = picker(
            ui,
            "region_picker",
            &config.region_label,
            &selection.region,
            &domain.regions,
            config.combo_width,
        ) {
            changes.push(FilterChangeEvent::Region(region));
        }

        ui.add_space(16.0);

        if let Some(species) = picker(
            ui,
            "species_picker",
            &config.species_label,
            &selection.species,
            &domain.species,
            config.combo_width,
        ) {
            changes.push(FilterChangeEvent::Species(species));
        }
    });

    let Some((min, max)) = domain.rest_stop_bounds else {
        return changes;
    };

    ui.label(config.rest_stops_label.as_str());
    let current = selection.rest_stop_range;
    let mut low = current.low;
    let mut high = current.high;
    let mut moved = None;

    ui.horizontal(|ui| {
        if ui.add(Slider::new(&mut low, min..=max).text("from")).changed() {
            moved = Some(moved_range(current, RangeHandle::Low, low));
        }
        if ui.add(Slider::new(&mut high, min..=max).text("to")).changed() {
            moved = Some(moved_range(moved.unwrap_or(current), RangeHandle::High, high));
        }
    });

    if let Some(range) = moved.filter(|range| *range != current) {
        tracing::debug!("Rest stop range moved to {}..={}", range.low, range.high);
        changes.push(FilterChangeEvent::RestStopRange {
            low: range.low,
            high: range.high,
        });
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(low: i64, high: i64) -> RestStopRange {
        RestStopRange { low, high }
    }

    #[test]
    fn test_moving_low_past_high_pushes_high() {
        assert_eq!(moved_range(range(3, 6), RangeHandle::Low, 8), range(8, 8));
        assert_eq!(moved_range(range(3, 6), RangeHandle::Low, 4), range(4, 6));
    }

    #[test]
    fn test_moving_high_below_low_pushes_low() {
        assert_eq!(moved_range(range(3, 6), RangeHandle::High, 1), range(1, 1));
        assert_eq!(moved_range(range(3, 6), RangeHandle::High, 10), range(3, 10));
    }
}
