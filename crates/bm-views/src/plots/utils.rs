//! Utilities for plot views

pub mod colors;

// Re-export commonly used items
pub use colors::{categorical_color, highlight, outcome_color};
