use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Page background of the dark dashboard
pub const PAGE_BACKGROUND: Color32 = Color32::from_rgb(16, 17, 18);

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Dashboard Dark".to_string(),
            dark_mode: true,
        }
    }
}

impl Theme {
    pub fn from_settings(dark_mode: bool) -> Self {
        Self {
            name: if dark_mode { "Dashboard Dark" } else { "Dashboard Light" }.to_string(),
            dark_mode,
        }
    }
}

fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    let panel_bg = Color32::from_rgb(17, 17, 17);
    let widget_bg = Color32::from_rgb(40, 42, 46);
    let text_color = Color32::from_rgb(230, 230, 230);
    let accent = accent_color();

    visuals.window_fill = panel_bg;
    visuals.panel_fill = PAGE_BACKGROUND;
    visuals.extreme_bg_color = panel_bg;
    visuals.faint_bg_color = widget_bg;

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.fg_stroke = Stroke::new(1.0, text_color);
        widget.rounding = Rounding::same(4.0);
    }

    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 55, 60);
    visuals.widgets.active.bg_fill = Color32::from_rgb(62, 66, 72);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    visuals.selection.bg_fill = accent.linear_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    visuals
}

/// Apply the dashboard theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let visuals = if theme.dark_mode { dark_visuals() } else { Visuals::light() };

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    tracing::debug!("Applying theme {}", theme.name);
    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(99, 110, 250)
}

/// Get the warning color for the theme
pub fn warning_color() -> Color32 {
    Color32::from_rgb(230, 180, 80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_settings() {
        assert!(Theme::from_settings(true).dark_mode);
        assert_eq!(Theme::from_settings(false).name, "Dashboard Light");
    }

    #[test]
    fn test_dark_visuals_use_page_background() {
        let visuals = dark_visuals();
        assert!(visuals.dark_mode);
        assert_eq!(visuals.panel_fill, PAGE_BACKGROUND);
    }
}
