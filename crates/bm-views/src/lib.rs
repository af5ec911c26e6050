//! Chart views for the bird migration dashboard
//!
//! Every view is a function of the data it shows and an explicit config;
//! views hold no state between frames. The bar chart reports clicks back to
//! the caller as [`bm_core::BarClickEvent`]s.

pub mod plots;
mod stats;

pub use plots::utils::{categorical_color, outcome_color};
pub use plots::{
    hit_test, show_migration_map, show_outcome_bar_chart, show_species_pie, BarChartConfig, MapConfig,
    PieChartConfig,
};
pub use stats::{card_entries, show_stat_cards, CARD_TITLES};
