//! Chart builders for the dashboard panels

pub mod bar;
pub mod map;
pub mod pie;

// Utilities
pub mod utils;

// Re-exports
pub use bar::{hit_test, show_outcome_bar_chart, BarChartConfig};
pub use map::{show_migration_map, MapConfig};
pub use pie::{show_species_pie, PieChartConfig};
