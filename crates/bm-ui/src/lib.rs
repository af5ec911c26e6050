//! User interface components for the bird migration dashboard
//!
//! This crate provides the egui theme, the page header and the filter form.
//! Components are immediate-mode functions that return what the user did.

pub mod filter_panel;
pub mod header;
pub mod theme;

pub use filter_panel::{moved_range, show_filter_panel, FilterPanelConfig, RangeHandle};
pub use header::{show_header, HeaderConfig, HeaderResponse};
pub use theme::{apply_theme, Theme};
