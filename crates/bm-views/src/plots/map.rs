//! Migration path map

use egui::{Color32, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points, Polygon};

use bm_core::{GeoPoint, MapPathData};

use super::utils::categorical_color;

/// Map configuration
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Chart title
    pub title: String,

    /// Plot height in points
    pub height: f32,

    /// Path line width
    pub line_width: f32,

    /// Mark start and end of every path
    pub show_endpoints: bool,

    /// Draw the lon/lat frame and graticule
    pub show_frame: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Migration paths of the birds".to_string(),
            height: 450.0,
            line_width: 2.0,
            show_endpoints: true,
            show_frame: true,
        }
    }
}

/// Plot coordinates of a point (x = longitude, y = latitude)
pub fn plot_position(point: &GeoPoint) -> [f64; 2] {
    [point.lon, point.lat]
}

/// Meridians and parallels every 30 degrees
fn graticule() -> Vec<Vec<[f64; 2]>> {
    let mut lines = Vec::new();
    for lon in (-180..=180).step_by(30) {
        lines.push(vec![[lon as f64, -90.0], [lon as f64, 90.0]]);
    }
    for lat in (-90..=90).step_by(30) {
        lines.push(vec![[-180.0, lat as f64], [180.0, lat as f64]]);
    }
    lines
}

/// Draw one line per path segment, colored by segment id
pub fn show_migration_map(ui: &mut Ui, data: &MapPathData, config: &MapConfig) {
    ui.heading(config.title.as_str());

    let plot = Plot::new("migration_map")
        .height(config.height)
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show_grid(false)
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.2}, {:.2}", value.y, value.x)
            } else {
                format!("{}\n{:.2}, {:.2}", name, value.y, value.x)
            }
        });

    plot.show(ui, |plot_ui| {
        if config.show_frame {
            let frame = Polygon::new(PlotPoints::from(vec![
                [-180.0, -90.0],
                [180.0, -90.0],
                [180.0, 90.0],
                [-180.0, 90.0],
            ]))
            .fill_color(Color32::from_rgb(17, 17, 17))
            .stroke(Stroke::new(1.0, Color32::from_gray(90)));
            plot_ui.polygon(frame);

            for line in graticule() {
                plot_ui.line(Line::new(PlotPoints::from(line)).color(Color32::from_gray(50)).width(0.5));
            }
        }

        for segment in &data.segments {
            let color = categorical_color(segment.segment_id);
            let points: Vec<[f64; 2]> = segment.points.iter().map(plot_position).collect();

            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(color)
                    .width(config.line_width)
                    .name(format!("Path {}", segment.segment_id)),
            );

            if config.show_endpoints {
                plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(2.5));
            }
        }
    });

    if data.is_empty() {
        ui.label("No migrations match the current selection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_position_puts_longitude_on_x() {
        assert_eq!(plot_position(&GeoPoint::new(10.5, -20.0)), [-20.0, 10.5]);
    }

    #[test]
    fn test_graticule_spans_the_world() {
        let lines = graticule();
        assert_eq!(lines.len(), 13 + 7);
        assert!(lines.iter().flatten().all(|[x, y]| x.abs() <= 180.0 && y.abs() <= 90.0));
    }
}
