//! Core functionality for the bird migration dashboard
//!
//! This crate provides the record model, the read-only dataset store, the
//! aggregation functions and the reactive recomputation rules that decide
//! which outputs are refreshed for a given selection.

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod model;
pub mod reactive;
pub mod selection;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use aggregate::{GroupKey, OutcomeCounts, SummaryStats};
pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use events::{BarClickEvent, EventBus, FilterChangeEvent};
pub use model::{GeoPoint, MigrationOutcome, MigrationRecord};
pub use reactive::{BarChartData, DrillState, MapPathData, PathSegment, PieChartData, StatsCardOutput};
pub use selection::{DrillSelection, RestStopRange, SelectionDomain, SelectionState};
pub use settings::DashboardSettings;
pub use store::{DatasetStore, FilteredView};
pub use data::DataSource;

pub mod data {
    use std::sync::Arc;

    /// Trait for tabular sources the dashboard can be loaded from
    #[async_trait::async_trait]
    pub trait DataSource: Send + Sync {
        /// Get the schema of this data source
        async fn schema(&self) -> Arc<arrow::datatypes::Schema>;

        /// Query all data
        async fn query_all(&self) -> anyhow::Result<arrow::record_batch::RecordBatch>;

        /// Get total row count
        async fn row_count(&self) -> anyhow::Result<usize>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
