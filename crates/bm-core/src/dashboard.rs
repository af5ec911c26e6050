//! Dashboard coordinator
//!
//! Owns the read-only store, the current selection and drill state, and
//! routes interaction events to the two reactive units. Event handling is
//! serialized behind a single lock so every interaction runs to completion
//! before the next is applied. Notifications for an interaction go out on the
//! event bus after its state is committed and the lock is released.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::DashboardError;
use crate::events::{events, BarClickEvent, EventBus, FilterChangeEvent};
use crate::reactive::{compute_drill_outputs, compute_map_paths, BarChartData, DrillOutputs, DrillState, MapPathData};
use crate::selection::{SelectionDomain, SelectionState};
use crate::settings::DashboardSettings;
use crate::store::DatasetStore;

/// The dashboard's shared state
pub struct Dashboard {
    /// The loaded table
    store: Arc<DatasetStore>,

    /// Values the filter controls may take
    domain: SelectionDomain,

    /// Selection restored by [`Dashboard::reset`]
    initial_selection: SelectionState,

    /// Current filter-control selection
    selection: Arc<RwLock<SelectionState>>,

    /// Current bar-click drill state
    drill: Arc<RwLock<DrillState>>,

    /// Outcome counts per region, fixed for the lifetime of the store
    bar_chart: BarChartData,

    /// Serializes event handling
    handling: Mutex<()>,

    /// The event bus
    event_bus: Arc<EventBus>,
}

impl Dashboard {
    /// Create a dashboard over a loaded store
    pub fn new(store: Arc<DatasetStore>, settings: &DashboardSettings) -> Self {
        let domain = SelectionDomain::from_store(&store);
        let initial_selection = SelectionState::initial(settings, &domain);
        let bar_chart = BarChartData::from_store(&store);

        tracing::info!(
            "Dashboard ready: {} rows, initial selection {}/{} rest stops {}..={}",
            store.len(),
            initial_selection.region,
            initial_selection.species,
            initial_selection.rest_stop_range.low,
            initial_selection.rest_stop_range.high
        );

        Self {
            store,
            domain,
            selection: Arc::new(RwLock::new(initial_selection.clone())),
            initial_selection,
            drill: Arc::new(RwLock::new(DrillState::Unselected)),
            bar_chart,
            handling: Mutex::new(()),
            event_bus: Arc::new(EventBus::new()),
        }
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    pub fn domain(&self) -> &SelectionDomain {
        &self.domain
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Get the current selection state
    pub fn selection(&self) -> SelectionState {
        self.selection.read().clone()
    }

    /// Get the current drill state
    pub fn drill_state(&self) -> DrillState {
        self.drill.read().clone()
    }

    /// Static grouped bar chart data
    pub fn bar_chart(&self) -> &BarChartData {
        &self.bar_chart
    }

    /// Stat cards and pie for the current drill state
    pub fn drill_outputs(&self) -> DrillOutputs {
        compute_drill_outputs(&self.store, &self.drill.read())
    }

    /// Map paths for the current selection
    pub fn map_paths(&self) -> MapPathData {
        compute_map_paths(&self.store, &self.selection.read())
    }

    /// Apply a bar click and recompute the stats/pie unit.
    ///
    /// Unrecognized curves and unknown regions are dropped; the outputs for
    /// the unchanged drill state are returned in that case.
    pub fn handle_bar_click(&self, event: &BarClickEvent) -> DrillOutputs {
        let (outputs, notice) = {
            let _guard = self.handling.lock();

            match DrillState::on_click(event, &self.domain) {
                Ok(state) => {
                    let outputs = compute_drill_outputs(&self.store, &state);
                    let notice = state.drill().map(|drill| {
                        tracing::info!(
                            "Drilled into {} / {} ({} rows)",
                            drill.region,
                            drill.outcome,
                            outputs.row_count
                        );
                        events::DrillChanged {
                            drill: drill.clone(),
                            row_count: outputs.row_count,
                        }
                    });
                    *self.drill.write() = state;
                    (outputs, notice.map(Notice::Drill))
                }
                Err(err) => (
                    compute_drill_outputs(&self.store, &self.drill.read()),
                    Notice::for_error(&err),
                ),
            }
        };

        self.publish(notice);
        outputs
    }

    /// Apply a filter change and recompute the map unit.
    ///
    /// A change outside the observed domain is rejected and the map for the
    /// prior selection is returned.
    pub fn handle_filter_change(&self, event: &FilterChangeEvent) -> MapPathData {
        let (paths, notice) = {
            let _guard = self.handling.lock();

            let current = self.selection.read().clone();
            match current.apply(event, &self.domain) {
                Ok(next) => {
                    let paths = compute_map_paths(&self.store, &next);
                    let notice = events::SelectionChanged {
                        selection: next.clone(),
                        segment_count: paths.segments.len(),
                    };
                    *self.selection.write() = next;
                    (paths, Some(Notice::Selection(notice)))
                }
                Err(err) => (compute_map_paths(&self.store, &current), Notice::for_error(&err)),
            }
        };

        self.publish(notice);
        paths
    }

    /// Return selection and drill state to their startup values
    pub fn reset(&self) {
        {
            let _guard = self.handling.lock();
            *self.selection.write() = self.initial_selection.clone();
            *self.drill.write() = DrillState::Unselected;
        }

        tracing::info!("Dashboard reset to initial selection");
        self.publish(Some(Notice::Reset));
    }

    // Called once the handling lock is released so subscribers observe the
    // committed state and may feed new interactions back in.
    fn publish(&self, notice: Option<Notice>) {
        match notice {
            Some(Notice::Drill(event)) => self.event_bus.publish(event),
            Some(Notice::Selection(event)) => self.event_bus.publish(event),
            Some(Notice::Ignored(event)) => self.event_bus.publish(event),
            Some(Notice::Rejected(event)) => self.event_bus.publish(event),
            Some(Notice::Reset) => self.event_bus.publish(events::DashboardReset),
            None => {}
        }
    }
}

/// Notification produced while handling one interaction
enum Notice {
    Drill(events::DrillChanged),
    Selection(events::SelectionChanged),
    Ignored(events::EventIgnored),
    Rejected(events::SelectionRejected),
    Reset,
}

impl Notice {
    fn for_error(err: &DashboardError) -> Option<Notice> {
        match err {
            DashboardError::UnrecognizedEvent { .. } => {
                tracing::warn!("Ignoring event: {}", err);
                Some(Notice::Ignored(events::EventIgnored { reason: err.to_string() }))
            }
            DashboardError::InvalidSelection { .. } => {
                tracing::warn!("Rejected selection: {}", err);
                Some(Notice::Rejected(events::SelectionRejected { reason: err.to_string() }))
            }
            DashboardError::EmptySelection { .. } => {
                tracing::debug!("{}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::handler_from_fn;
    use crate::model::MigrationOutcome::*;
    use crate::selection::RestStopRange;
    use crate::store::test_support::record;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Weak;

    fn dashboard() -> Dashboard {
        let store = DatasetStore::new(vec![
            record("Asia", "Eagle", Successful, "Feeding", 3),
            record("Asia", "Eagle", Failed, "Breeding", 5),
            record("Europe", "Stork", Successful, "Climate Change", 2),
            record("Asia", "Eagle", Successful, "Feeding", 7),
        ]);
        Dashboard::new(Arc::new(store), &DashboardSettings::default())
    }

    #[test]
    fn test_initial_outputs() {
        let dashboard = dashboard();
        assert_eq!(dashboard.drill_state(), DrillState::Unselected);
        assert_eq!(
            dashboard.selection().rest_stop_range,
            RestStopRange { low: 3, high: 6 }
        );
        assert_eq!(dashboard.map_paths().segments.len(), 2);
        assert_eq!(dashboard.drill_outputs().row_count, 4);
        assert_eq!(dashboard.bar_chart().categories, vec!["Asia", "Europe"]);
    }

    #[test]
    fn test_unrecognized_click_keeps_state() {
        let dashboard = dashboard();
        let ignored = Arc::new(AtomicUsize::new(0));
        let counter = ignored.clone();
        dashboard
            .event_bus()
            .subscribe::<events::EventIgnored>(handler_from_fn(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        dashboard.handle_bar_click(&BarClickEvent { curve_number: 1, x_value: "Asia".to_string() });
        let drilled = dashboard.drill_state();

        let outputs = dashboard.handle_bar_click(&BarClickEvent {
            curve_number: 5,
            x_value: "Europe".to_string(),
        });
        assert_eq!(dashboard.drill_state(), drilled);
        assert_eq!(outputs.row_count, 1);
        assert_eq!(ignored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_filter_keeps_prior_selection() {
        let dashboard = dashboard();
        let before = dashboard.selection();

        let paths = dashboard.handle_filter_change(&FilterChangeEvent::Region("Oceania".to_string()));
        assert_eq!(dashboard.selection(), before);
        assert_eq!(paths, dashboard.map_paths());

        let paths = dashboard.handle_filter_change(&FilterChangeEvent::RestStopRange { low: 5, high: 7 });
        let ids: Vec<usize> = paths.segments.iter().map(|s| s.segment_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_filter_change_to_empty_view() {
        let dashboard = dashboard();
        let paths = dashboard.handle_filter_change(&FilterChangeEvent::Species("Stork".to_string()));
        assert!(paths.is_empty());
    }

    #[test]
    fn test_units_are_independent() {
        let dashboard = dashboard();
        let map_before = dashboard.map_paths();

        dashboard.handle_bar_click(&BarClickEvent { curve_number: 0, x_value: "Europe".to_string() });
        assert_eq!(dashboard.map_paths(), map_before);

        let drill_before = dashboard.drill_outputs();
        dashboard.handle_filter_change(&FilterChangeEvent::RestStopRange { low: 2, high: 7 });
        assert_eq!(dashboard.drill_outputs(), drill_before);
    }

    #[test]
    fn test_reset_restores_startup_state() {
        let dashboard = dashboard();
        dashboard.handle_bar_click(&BarClickEvent { curve_number: 0, x_value: "Asia".to_string() });
        dashboard.handle_filter_change(&FilterChangeEvent::RestStopRange { low: 7, high: 7 });

        dashboard.reset();
        assert_eq!(dashboard.drill_state(), DrillState::Unselected);
        assert_eq!(dashboard.selection().rest_stop_range, RestStopRange { low: 3, high: 6 });
    }

    #[test]
    fn test_drill_changed_handler_sees_committed_state() {
        let dashboard = Arc::new(dashboard());
        let seen = Arc::new(Mutex::new(None));

        let weak: Weak<Dashboard> = Arc::downgrade(&dashboard);
        let observed = seen.clone();
        dashboard
            .event_bus()
            .subscribe::<events::DrillChanged>(handler_from_fn(move |_| {
                if let Some(dashboard) = weak.upgrade() {
                    *observed.lock() = Some(dashboard.drill_state());
                }
            }));

        dashboard.handle_bar_click(&BarClickEvent { curve_number: 1, x_value: "Asia".to_string() });
        let expected = DrillState::Drilled(crate::selection::DrillSelection {
            region: "Asia".to_string(),
            outcome: Failed,
        });
        assert_eq!(seen.lock().clone(), Some(expected));
    }

    #[test]
    fn test_handler_may_feed_interactions_back() {
        let dashboard = Arc::new(dashboard());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak: Weak<Dashboard> = Arc::downgrade(&dashboard);
        let observed = seen.clone();
        dashboard
            .event_bus()
            .subscribe::<events::SelectionChanged>(handler_from_fn(move |event| {
                let Some(changed) = event.as_any().downcast_ref::<events::SelectionChanged>() else {
                    return;
                };
                if let Some(dashboard) = weak.upgrade() {
                    observed.lock().push(dashboard.selection() == changed.selection);
                    dashboard.reset();
                }
            }));

        dashboard.handle_filter_change(&FilterChangeEvent::RestStopRange { low: 5, high: 7 });
        assert_eq!(*seen.lock(), vec![true]);
        assert_eq!(dashboard.selection().rest_stop_range, RestStopRange { low: 3, high: 6 });
    }
}
