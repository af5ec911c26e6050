//! Summary stat cards

use egui::{Color32, Frame, RichText, Stroke, Ui};

use bm_core::StatsCardOutput;

/// Card titles, in display order
pub const CARD_TITLES: [&str; 4] = [
    "Main Reason of Migration",
    "Longest Flight Distance",
    "Mean Flock Size",
    "Minimum Altitude",
];

/// (title, value) pairs in display order
pub fn card_entries(stats: &StatsCardOutput) -> [(&'static str, &str); 4] {
    [
        (CARD_TITLES[0], stats.mode_reason.as_str()),
        (CARD_TITLES[1], stats.max_distance_label.as_str()),
        (CARD_TITLES[2], stats.mean_flock_size.as_str()),
        (CARD_TITLES[3], stats.min_altitude_label.as_str()),
    ]
}

fn card(ui: &mut Ui, title: &str, value: &str, width: f32) {
    Frame::none()
        .fill(Color32::from_rgb(34, 37, 41))
        .stroke(Stroke::new(1.0, Color32::from_gray(60)))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(width);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(title).size(13.0).weak());
                ui.label(RichText::new(value).size(20.0).strong());
            });
        });
}

/// Draw the four stat cards in one row
pub fn show_stat_cards(ui: &mut Ui, stats: &StatsCardOutput) {
    let spacing = ui.spacing().item_spacing.x;
    let width = ((ui.available_width() - 3.0 * spacing) / 4.0 - 16.0).max(80.0);

    ui.horizontal(|ui| {
        for (title, value) in card_entries(stats) {
            card(ui, title, value, width);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_follow_card_order() {
        let stats = StatsCardOutput {
            mode_reason: "Feeding".to_string(),
            max_distance_label: "2986.61 km".to_string(),
            mean_flock_size: "48.5".to_string(),
            min_altitude_label: "90.0 m".to_string(),
        };

        let entries = card_entries(&stats);
        assert_eq!(entries[0], ("Main Reason of Migration", "Feeding"));
        assert_eq!(entries[1].1, "2986.61 km");
        assert_eq!(entries[3], ("Minimum Altitude", "90.0 m"));
    }

    #[test]
    fn test_placeholder_entries() {
        let stats = StatsCardOutput::placeholder();
        assert!(card_entries(&stats).iter().all(|(_, v)| *v == bm_core::reactive::PLACEHOLDER));
    }
}
