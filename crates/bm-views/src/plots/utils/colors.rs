//! Color utilities for plots

use bm_core::MigrationOutcome;
use egui::Color32;

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> Color32 {
    const PALETTE: &[Color32] = &[
        Color32::from_rgb(99, 110, 250),   // Blue
        Color32::from_rgb(239, 85, 59),    // Red
        Color32::from_rgb(0, 204, 150),    // Green
        Color32::from_rgb(171, 99, 250),   // Purple
        Color32::from_rgb(255, 161, 90),   // Orange
        Color32::from_rgb(25, 211, 243),   // Cyan
        Color32::from_rgb(255, 102, 146),  // Pink
        Color32::from_rgb(182, 232, 128),  // Lime
        Color32::from_rgb(255, 151, 255),  // Magenta
        Color32::from_rgb(254, 203, 82),   // Yellow
    ];
    PALETTE[index % PALETTE.len()]
}

/// Series color of a migration outcome in the bar chart legend
pub fn outcome_color(outcome: MigrationOutcome) -> Color32 {
    categorical_color(outcome.curve_number() as usize)
}

/// Lighten a color for hover highlighting
pub fn highlight(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r().saturating_add(30),
        color.g().saturating_add(30),
        color.b().saturating_add(30),
        color.a(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(categorical_color(0), categorical_color(10));
        assert_ne!(categorical_color(0), categorical_color(1));
    }

    #[test]
    fn test_outcomes_have_distinct_colors() {
        assert_ne!(
            outcome_color(MigrationOutcome::Successful),
            outcome_color(MigrationOutcome::Failed)
        );
    }
}
