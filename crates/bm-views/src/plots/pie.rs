//! Species composition pie chart

use std::f64::consts::{PI, TAU};

use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use bm_core::PieChartData;

use super::utils::{categorical_color, highlight};

/// Pie chart configuration
#[derive(Debug, Clone)]
pub struct PieChartConfig {
    /// Size of the drawing area in points
    pub size: f32,

    /// Show the share of each slice inside it
    pub show_percentages: bool,

    /// Slices narrower than this (radians) get no label
    pub min_label_angle: f64,
}

impl Default for PieChartConfig {
    fn default() -> Self {
        Self {
            size: 280.0,
            show_percentages: true,
            min_label_angle: 0.25,
        }
    }
}

/// One drawn slice
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// Index into the chart labels, which also picks the color
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub fraction: f64,
}

/// Slice angles, clockwise from twelve o'clock in screen space.
///
/// Zero-valued labels get no slice.
pub fn slice_angles(values: &[usize]) -> Vec<Slice> {
    let total: usize = values.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut angle = -PI / 2.0;
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| **value > 0)
        .map(|(index, &value)| {
            let fraction = value as f64 / total as f64;
            let start_angle = angle;
            angle += fraction * TAU;
            Slice {
                index,
                start_angle,
                end_angle: angle,
                fraction,
            }
        })
        .collect()
}

/// Slice containing the given screen angle (radians, any turn)
pub fn slice_at(slices: &[Slice], angle: f64) -> Option<&Slice> {
    let start = slices.first()?.start_angle;
    let normalized = start + (angle - start).rem_euclid(TAU);
    slices
        .iter()
        .find(|s| normalized >= s.start_angle && normalized < s.end_angle)
}

fn draw_slice(painter: &egui::Painter, center: Pos2, radius: f32, slice: &Slice, color: Color32) {
    let span = slice.end_angle - slice.start_angle;
    let segments = (span * 180.0 / PI).max(8.0) as usize;

    // Thin wedges keep each polygon convex
    for i in 0..segments {
        let a0 = slice.start_angle + span * (i as f64 / segments as f64);
        let a1 = slice.start_angle + span * ((i + 1) as f64 / segments as f64);
        let points = vec![
            center,
            center + Vec2::new(radius * a0.cos() as f32, radius * a0.sin() as f32),
            center + Vec2::new(radius * a1.cos() as f32, radius * a1.sin() as f32),
        ];
        painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
    }

    let edge = center + Vec2::new(radius * slice.start_angle.cos() as f32, radius * slice.start_angle.sin() as f32);
    painter.line_segment([center, edge], Stroke::new(1.0, Color32::from_gray(30)));
}

/// Draw the pie with a legend of all labels
pub fn show_species_pie(ui: &mut Ui, data: &PieChartData, config: &PieChartConfig) {
    ui.heading(data.title.as_str());

    let slices = slice_angles(&data.values);
    if slices.is_empty() {
        ui.label("No data to display");
        return;
    }

    ui.horizontal(|ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(config.size), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) / 2.0 - 4.0;

        let hovered = response.hover_pos().and_then(|pos| {
            let offset = pos - center;
            if offset.length() > radius {
                return None;
            }
            slice_at(&slices, (offset.y as f64).atan2(offset.x as f64)).map(|s| s.index)
        });

        for slice in &slices {
            let base = categorical_color(slice.index);
            let color = if hovered == Some(slice.index) { highlight(base) } else { base };
            draw_slice(&painter, center, radius, slice, color);

            if config.show_percentages && slice.end_angle - slice.start_angle >= config.min_label_angle {
                let mid = (slice.start_angle + slice.end_angle) / 2.0;
                let pos = center + Vec2::new(0.65 * radius * mid.cos() as f32, 0.65 * radius * mid.sin() as f32);
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", slice.fraction * 100.0),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
        }

        if let Some(index) = hovered {
            response.on_hover_text(format!("{}: {}", data.labels[index], data.values[index]));
        }

        ui.vertical(|ui| {
            for (i, label) in data.labels.iter().enumerate() {
                ui.horizontal(|ui| {
                    let (swatch, painter) = ui.allocate_painter(Vec2::splat(12.0), Sense::hover());
                    painter.rect_filled(swatch.rect, 2.0, categorical_color(i));
                    ui.label(label.as_str());
                });
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_cover_full_turn() {
        let slices = slice_angles(&[1, 0, 3]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].index, 0);
        assert_eq!(slices[1].index, 2);
        assert!((slices[0].fraction - 0.25).abs() < 1e-12);
        assert!((slices[1].end_angle - slices[0].start_angle - TAU).abs() < 1e-9);
        assert!((slices[0].start_angle + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_pie_has_no_slices() {
        assert!(slice_angles(&[]).is_empty());
        assert!(slice_angles(&[0, 0]).is_empty());
    }

    #[test]
    fn test_slice_at_wraps_angles() {
        let slices = slice_angles(&[1, 1]);
        // Right side of the circle is the first half clockwise from the top
        assert_eq!(slice_at(&slices, 0.0).map(|s| s.index), Some(0));
        assert_eq!(slice_at(&slices, PI).map(|s| s.index), Some(1));
        assert_eq!(slice_at(&slices, -PI * 0.9).map(|s| s.index), Some(1));
        assert_eq!(slice_at(&slices, 0.0 + TAU).map(|s| s.index), Some(0));
    }
}
