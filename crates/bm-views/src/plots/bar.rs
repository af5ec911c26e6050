//! Grouped outcome bar chart

use egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint};

use bm_core::{BarChartData, BarClickEvent, MigrationOutcome};

use super::utils::outcome_color;

/// Bar chart configuration
#[derive(Debug, Clone)]
pub struct BarChartConfig {
    /// Chart title
    pub title: String,

    /// X-axis label
    pub x_label: String,

    /// Y-axis label
    pub y_label: String,

    /// Legend heading
    pub legend_title: String,

    /// Whether to show grid
    pub show_grid: bool,

    /// Width of a single series bar (a category spans one unit)
    pub bar_width: f64,

    /// Plot height in points
    pub height: f32,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            title: "Bird Count".to_string(),
            x_label: "Region".to_string(),
            y_label: "Count".to_string(),
            legend_title: "Migration Status".to_string(),
            show_grid: true,
            bar_width: 0.4,
            height: 320.0,
        }
    }
}

/// Center of the bar for `category` in the given series
fn bar_center(category: usize, outcome: MigrationOutcome, bar_width: f64) -> f64 {
    let offset = bar_width / 2.0;
    match outcome {
        MigrationOutcome::Successful => category as f64 - offset,
        MigrationOutcome::Failed => category as f64 + offset,
    }
}

/// Map a point in plot coordinates to the bar under it
pub fn hit_test(data: &BarChartData, point: PlotPoint, bar_width: f64) -> Option<BarClickEvent> {
    if point.y < 0.0 {
        return None;
    }

    let half = bar_width / 2.0;
    for (i, category) in data.categories.iter().enumerate() {
        for outcome in MigrationOutcome::ALL {
            let center = bar_center(i, outcome, bar_width);
            let count = data.series(outcome)[i] as f64;
            if (point.x - center).abs() <= half && point.y <= count {
                return Some(BarClickEvent {
                    curve_number: outcome.curve_number(),
                    x_value: category.clone(),
                });
            }
        }
    }

    None
}

/// Draw the grouped bar chart and report a click on a bar
pub fn show_outcome_bar_chart(ui: &mut Ui, data: &BarChartData, config: &BarChartConfig) -> Option<BarClickEvent> {
    ui.heading(config.title.as_str());

    if data.categories.is_empty() {
        ui.label("No data to display");
        return None;
    }

    let categories = data.categories.clone();
    let plot = Plot::new("outcome_bar_chart")
        .height(config.height)
        .show_grid(config.show_grid)
        .legend(Legend::default())
        .x_axis_label(config.x_label.as_str())
        .y_axis_label(config.y_label.as_str())
        .include_y(0.0)
        .include_y(data.max_count() as f64 * 1.1)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |value, _max_chars, _range| {
            let index = value.round();
            if (value - index).abs() < 1e-6 && index >= 0.0 {
                categories.get(index as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        });

    let response = plot.show(ui, |plot_ui| {
        for outcome in MigrationOutcome::ALL {
            let bars = data
                .series(outcome)
                .iter()
                .enumerate()
                .map(|(i, &count)| {
                    Bar::new(bar_center(i, outcome, config.bar_width), count as f64)
                        .width(config.bar_width)
                        .name(&data.categories[i])
                })
                .collect();

            let chart = BarChart::new(bars)
                .name(format!("{}: {}", config.legend_title, outcome))
                .color(outcome_color(outcome));
            plot_ui.bar_chart(chart);
        }

        if plot_ui.plot_clicked() {
            plot_ui.pointer_coordinate()
        } else {
            None
        }
    });

    let event = response.inner.and_then(|point| hit_test(data, point, config.bar_width));
    if let Some(event) = &event {
        tracing::debug!("Bar clicked: curve {} at {}", event.curve_number, event.x_value);
    }
    event
}
