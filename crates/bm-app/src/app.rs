//! The dashboard window

use std::sync::Arc;

use eframe::egui::{self, CentralPanel, Context, ScrollArea};
use parking_lot::Mutex;

use bm_core::events::{events, handler_from_fn, Event};
use bm_core::reactive::DrillOutputs;
use bm_core::{Dashboard, DashboardSettings, MapPathData};
use bm_data::LoadReport;
use bm_ui::{FilterPanelConfig, HeaderConfig, Theme};
use bm_views::{BarChartConfig, MapConfig, PieChartConfig};

/// Status line text for a dashboard notification
pub fn status_message(event: &dyn Event) -> Option<String> {
    let any = event.as_any();
    if let Some(loaded) = any.downcast_ref::<events::DatasetLoaded>() {
        Some(if loaded.skipped_rows > 0 {
            format!(
                "Loaded {} rows from {} ({} malformed rows skipped)",
                loaded.row_count, loaded.source_name, loaded.skipped_rows
            )
        } else {
            format!("Loaded {} rows from {}", loaded.row_count, loaded.source_name)
        })
    } else if let Some(rejected) = any.downcast_ref::<events::SelectionRejected>() {
        Some(format!("Selection rejected: {}", rejected.reason))
    } else if let Some(ignored) = any.downcast_ref::<events::EventIgnored>() {
        Some(format!("Click ignored: {}", ignored.reason))
    } else if any.downcast_ref::<events::DashboardReset>().is_some() {
        Some("Selections reset".to_string())
    } else {
        None
    }
}

/// Main application state
pub struct MigrationDashboardApp {
    dashboard: Dashboard,

    /// Stat cards and pie for the current drill state
    drill_outputs: DrillOutputs,

    /// Map for the current filter selection
    map_paths: MapPathData,

    /// Latest notice from the event bus
    status: Arc<Mutex<Option<String>>>,

    header: HeaderConfig,
    bar_config: BarChartConfig,
    pie_config: PieChartConfig,
    map_config: MapConfig,
    filter_config: FilterPanelConfig,
}

impl MigrationDashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        dashboard: Dashboard,
        settings: &DashboardSettings,
        source_name: String,
        report: &LoadReport,
    ) -> Self {
        bm_ui::apply_theme(&cc.egui_ctx, &Theme::from_settings(settings.dark_mode));

        let status = Arc::new(Mutex::new(None));
        let bus = dashboard.event_bus();
        bus.subscribe::<events::DatasetLoaded>(status_handler(&status));
        bus.subscribe::<events::SelectionRejected>(status_handler(&status));
        bus.subscribe::<events::EventIgnored>(status_handler(&status));
        bus.subscribe::<events::DashboardReset>(status_handler(&status));

        bus.publish(events::DatasetLoaded {
            source_name,
            row_count: report.loaded_rows,
            skipped_rows: report.skipped_rows(),
        });

        Self {
            drill_outputs: dashboard.drill_outputs(),
            map_paths: dashboard.map_paths(),
            dashboard,
            status,
            header: HeaderConfig {
                title: settings.title.clone(),
                intro: settings.intro.clone(),
                ..HeaderConfig::default()
            },
            bar_config: BarChartConfig {
                title: settings.bar_chart_title.clone(),
                ..BarChartConfig::default()
            },
            pie_config: PieChartConfig::default(),
            map_config: MapConfig {
                title: settings.map_title.clone(),
                ..MapConfig::default()
            },
            filter_config: FilterPanelConfig::default(),
        }
    }

    fn refresh(&mut self) {
        self.dashboard.reset();
        self.drill_outputs = self.dashboard.drill_outputs();
        self.map_paths = self.dashboard.map_paths();
    }
}

fn status_handler(status: &Arc<Mutex<Option<String>>>) -> Box<dyn bm_core::events::EventHandler> {
    let status = status.clone();
    handler_from_fn(move |event| {
        if let Some(message) = status_message(event) {
            *status.lock() = Some(message);
        }
    })
}

impl eframe::App for MigrationDashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                let status = self.status.lock().clone();
                if bm_ui::show_header(ui, &self.header, status.as_deref()).refresh_clicked {
                    self.refresh();
                }

                let mut click = None;
                ui.columns(2, |columns| {
                    click = bm_views::show_outcome_bar_chart(
                        &mut columns[0],
                        self.dashboard.bar_chart(),
                        &self.bar_config,
                    );
                    bm_views::show_species_pie(&mut columns[1], &self.drill_outputs.pie, &self.pie_config);
                });
                if let Some(event) = click {
                    self.drill_outputs = self.dashboard.handle_bar_click(&event);
                }

                ui.add_space(8.0);
                bm_views::show_stat_cards(ui, &self.drill_outputs.stats);
                ui.add_space(8.0);
                ui.separator();

                let selection = self.dashboard.selection();
                let changes =
                    bm_ui::show_filter_panel(ui, &selection, self.dashboard.domain(), &self.filter_config);
                for change in &changes {
                    self.map_paths = self.dashboard.handle_filter_change(change);
                }

                ui.add_space(8.0);
                bm_views::show_migration_map(ui, &self.map_paths, &self.map_config);
            });
        });
    }
}
