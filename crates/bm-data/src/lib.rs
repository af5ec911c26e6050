//! Data loading for the bird migration dashboard

pub mod config;
pub mod loader;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::{ColumnMapping, NullConfig, SourceConfig};
pub use loader::{load_store, records_from_batch, LoadReport};
pub use sources::CsvSource;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Column '{0}' not found in input")]
    MissingColumn(String),

    #[error("Column '{column}' has unexpected type {found}")]
    ColumnType { column: String, found: String },

    #[error("No valid rows in {0}")]
    EmptyDataset(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}
