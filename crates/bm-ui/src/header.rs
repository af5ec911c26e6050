//! Page header with title, intro blurb and the refresh control

use egui::{RichText, Ui};

use crate::theme::warning_color;

/// Header configuration
#[derive(Debug, Clone)]
pub struct HeaderConfig {
    pub title: String,
    pub intro: String,
    pub refresh_label: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            title: "Bird Migration".to_string(),
            intro: String::new(),
            refresh_label: "Refresh Data".to_string(),
        }
    }
}

/// What the user did in the header this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderResponse {
    pub refresh_clicked: bool,
}

/// Draw the header; `status` is shown under the intro when present
pub fn show_header(ui: &mut Ui, config: &HeaderConfig, status: Option<&str>) -> HeaderResponse {
    let mut response = HeaderResponse::default();

    ui.horizontal(|ui| {
        ui.label(RichText::new(config.title.as_str()).size(28.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(config.refresh_label.as_str()).clicked() {
                response.refresh_clicked = true;
            }
        });
    });

    if !config.intro.is_empty() {
        ui.label(RichText::new(config.intro.as_str()).weak());
    }

    if let Some(status) = status {
        ui.label(RichText::new(status).small().color(warning_color()));
    }

    ui.separator();
    response
}
