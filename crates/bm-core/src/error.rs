//! Errors raised while recomputing dashboard outputs
//!
//! None of these escape the [`Dashboard`](crate::Dashboard): an empty
//! selection resolves to placeholder output, an unrecognized event or an
//! invalid selection leaves the previous state in place.

use thiserror::Error;

/// Selection field a rejected value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    Region,
    Species,
    RestStopRange,
}

impl std::fmt::Display for SelectionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SelectionField::Region => "region",
            SelectionField::Species => "species",
            SelectionField::RestStopRange => "rest stop range",
        })
    }
}

/// Errors that can occur while recomputing dashboard outputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Filtered view is empty; {aggregate} is undefined")]
    EmptySelection { aggregate: &'static str },

    #[error("Unrecognized bar chart curve {curve_number}")]
    UnrecognizedEvent { curve_number: i64 },

    #[error("Invalid {field} selection: {value}")]
    InvalidSelection { field: SelectionField, value: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
