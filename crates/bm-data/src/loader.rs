//! Materialize validated migration records from a loaded batch

use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use bm_core::data::DataSource;
use bm_core::{DatasetStore, GeoPoint, MigrationOutcome, MigrationRecord};

use crate::schema;
use crate::DataError;

/// Individual skipped-row warnings logged before switching to a summary
const MAX_ROW_WARNINGS: usize = 20;

/// Outcome of turning a batch into records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// (input row index, reason) for each skipped row
    pub skipped: Vec<(usize, String)>,
}

impl LoadReport {
    pub fn skipped_rows(&self) -> usize {
        self.skipped.len()
    }
}

/// Typed views of the batch columns
struct Columns<'a> {
    region: &'a StringArray,
    species: &'a StringArray,
    migration_success: &'a StringArray,
    migration_reason: &'a StringArray,
    flight_distance_km: &'a Float64Array,
    flock_size: &'a Float64Array,
    min_altitude_m: &'a Float64Array,
    rest_stops: &'a Int64Array,
    start_latitude: &'a Float64Array,
    start_longitude: &'a Float64Array,
    end_latitude: &'a Float64Array,
    end_longitude: &'a Float64Array,
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T, DataError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;

    column
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| DataError::ColumnType {
            column: name.to_string(),
            found: column.data_type().to_string(),
        })
}

impl<'a> Columns<'a> {
    fn from_batch(batch: &'a RecordBatch) -> Result<Self, DataError> {
        Ok(Self {
            region: column(batch, schema::REGION)?,
            species: column(batch, schema::SPECIES)?,
            migration_success: column(batch, schema::MIGRATION_SUCCESS)?,
            migration_reason: column(batch, schema::MIGRATION_REASON)?,
            flight_distance_km: column(batch, schema::FLIGHT_DISTANCE_KM)?,
            flock_size: column(batch, schema::FLOCK_SIZE)?,
            min_altitude_m: column(batch, schema::MIN_ALTITUDE_M)?,
            rest_stops: column(batch, schema::REST_STOPS)?,
            start_latitude: column(batch, schema::START_LATITUDE)?,
            start_longitude: column(batch, schema::START_LONGITUDE)?,
            end_latitude: column(batch, schema::END_LATITUDE)?,
            end_longitude: column(batch, schema::END_LONGITUDE)?,
        })
    }

    fn record(&self, i: usize) -> Result<MigrationRecord, String> {
        let text = |array: &StringArray, name: &str| -> Result<String, String> {
            if array.is_null(i) {
                Err(format!("missing {}", name))
            } else {
                Ok(array.value(i).to_string())
            }
        };
        let number = |array: &Float64Array, name: &str| -> Result<f64, String> {
            if array.is_null(i) {
                return Err(format!("missing {}", name));
            }
            let value = array.value(i);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(format!("non-finite {}", name))
            }
        };
        let non_negative = |value: f64, name: &str| -> Result<f64, String> {
            if value < 0.0 {
                Err(format!("negative {} ({})", name, value))
            } else {
                Ok(value)
            }
        };

        let migration_success = text(self.migration_success, schema::MIGRATION_SUCCESS)?
            .parse::<MigrationOutcome>()?;

        if self.rest_stops.is_null(i) {
            return Err(format!("missing {}", schema::REST_STOPS));
        }
        let rest_stops = self.rest_stops.value(i);
        if rest_stops < 0 {
            return Err(format!("negative {} ({})", schema::REST_STOPS, rest_stops));
        }

        let start = GeoPoint::new(
            number(self.start_latitude, schema::START_LATITUDE)?,
            number(self.start_longitude, schema::START_LONGITUDE)?,
        );
        let end = GeoPoint::new(
            number(self.end_latitude, schema::END_LATITUDE)?,
            number(self.end_longitude, schema::END_LONGITUDE)?,
        );
        if !start.is_valid() || !end.is_valid() {
            return Err("coordinates out of range".to_string());
        }

        Ok(MigrationRecord {
            region: text(self.region, schema::REGION)?,
            species: text(self.species, schema::SPECIES)?,
            migration_success,
            migration_reason: text(self.migration_reason, schema::MIGRATION_REASON)?,
            flight_distance_km: non_negative(
                number(self.flight_distance_km, schema::FLIGHT_DISTANCE_KM)?,
                schema::FLIGHT_DISTANCE_KM,
            )?,
            flock_size: non_negative(number(self.flock_size, schema::FLOCK_SIZE)?, schema::FLOCK_SIZE)?,
            min_altitude_m: number(self.min_altitude_m, schema::MIN_ALTITUDE_M)?,
            rest_stops,
            start,
            end,
        })
    }
}

/// Convert a batch with the migration schema into records.
///
/// Rows with missing or out-of-range values are skipped and listed in the
/// report; the remaining rows keep their relative order.
pub fn records_from_batch(batch: &RecordBatch) -> Result<(Vec<MigrationRecord>, LoadReport), DataError> {
    let columns = Columns::from_batch(batch)?;
    let mut records = Vec::with_capacity(batch.num_rows());
    let mut report = LoadReport {
        total_rows: batch.num_rows(),
        ..LoadReport::default()
    };

    for i in 0..batch.num_rows() {
        match columns.record(i) {
            Ok(record) => records.push(record),
            Err(reason) => {
                if report.skipped.len() < MAX_ROW_WARNINGS {
                    tracing::warn!("Skipping row {}: {}", i, reason);
                }
                report.skipped.push((i, reason));
            }
        }
    }

    if report.skipped.len() > MAX_ROW_WARNINGS {
        tracing::warn!(
            "{} more rows skipped",
            report.skipped.len() - MAX_ROW_WARNINGS
        );
    }

    report.loaded_rows = records.len();
    Ok((records, report))
}

/// Load the full table from a source into a dataset store.
///
/// The first `preview_rows` rows are pretty-printed at debug level.
pub async fn load_store(
    source: &dyn DataSource,
    preview_rows: usize,
) -> anyhow::Result<(DatasetStore, LoadReport)> {
    let batch = source.query_all().await?;

    if tracing::enabled!(tracing::Level::DEBUG) && preview_rows > 0 && batch.num_rows() > 0 {
        let preview = batch.slice(0, batch.num_rows().min(preview_rows));
        match arrow::util::pretty::pretty_format_batches(&[preview]) {
            Ok(table) => tracing::debug!("First rows of {}:\n{}", source.source_name(), table),
            Err(e) => tracing::debug!("Could not format preview: {}", e),
        }
    }

    let (records, report) = records_from_batch(&batch)?;
    if records.is_empty() {
        return Err(DataError::EmptyDataset(source.source_name().to_string()).into());
    }

    tracing::info!(
        "{}: {} of {} rows loaded, {} skipped",
        source.source_name(),
        report.loaded_rows,
        report.total_rows,
        report.skipped_rows()
    );

    Ok((DatasetStore::new(records), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CsvSource, SourceConfig};
    use std::io::Write;

    const HEADER: &str = "Region,Species,Migration_Success,Migration_Reason,Flight_Distance_km,Flock_Size,Min_Altitude_m,Rest_Stops,Start_Latitude,Start_Longitude,End_Latitude,End_Longitude";

    async fn source(lines: &[&str]) -> (CsvSource, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        let source = CsvSource::open(SourceConfig::new(file.path().to_path_buf())).await.unwrap();
        (source, file)
    }

    #[tokio::test]
    async fn test_load_store_keeps_valid_rows_in_order() {
        let (source, _file) = source(&[
            "Asia,Eagle,Successful,Feeding,2986.61,48,1200,3,10.5,20.25,-5.0,100.0",
            "Europe,Stork,Failed,Breeding,800.5,12,300,2,50.0,8.0,10.0,15.0",
            "Africa,Hawk,Successful,Climate Change,450,7,90,6,-1.0,30.0,5.0,35.0",
        ])
        .await;

        let (store, report) = load_store(&source, 5).await.unwrap();
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(report.skipped_rows(), 0);
        assert_eq!(store.regions(), &["Asia", "Europe", "Africa"]);

        let first = &store.records()[0];
        assert_eq!(first.migration_success, MigrationOutcome::Successful);
        assert_eq!(first.flight_distance_km, 2986.61);
        assert_eq!(first.rest_stops, 3);
        assert_eq!(first.start, GeoPoint::new(10.5, 20.25));
        assert_eq!(first.end, GeoPoint::new(-5.0, 100.0));
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let (source, _file) = source(&[
            "Asia,Eagle,Successful,Feeding,2986.61,48,1200,3,10.5,20.25,-5.0,100.0",
            "Asia,Eagle,Successful,Feeding,100,5,10,3,,20.25,-5.0,100.0",
            "Asia,Eagle,Successful,Feeding,-100,5,10,3,10.5,20.25,-5.0,100.0",
            "Asia,Eagle,Maybe,Feeding,100,5,10,3,10.5,20.25,-5.0,100.0",
            "Asia,Eagle,Failed,Feeding,100,5,10,3,95.0,20.25,-5.0,100.0",
            "Asia,Eagle,Failed,Feeding,100,5,10,-2,10.5,20.25,-5.0,100.0",
            "Asia,Eagle,Failed,Feeding,100,5,10,4,10.5,20.25,-5.0,100.0",
        ])
        .await;

        let (store, report) = load_store(&source, 5).await.unwrap();
        assert_eq!(report.total_rows, 7);
        assert_eq!(report.loaded_rows, 2);
        let skipped: Vec<usize> = report.skipped.iter().map(|(i, _)| *i).collect();
        assert_eq!(skipped, vec![1, 2, 3, 4, 5]);
        assert!(report.skipped[0].1.contains(schema::START_LATITUDE));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_short_row_is_skipped_not_fatal() {
        let (source, _file) = source(&[
            "Asia,Eagle,Successful,Feeding,2986.61,48,1200,3,10.5,20.25,-5.0,100.0",
            "Asia,Eagle,Successful,Feeding,100,5",
            "Europe,Stork,Failed,Breeding,800.5,12,300,2,50.0,8.0,10.0,15.0",
        ])
        .await;

        let (store, report) = load_store(&source, 5).await.unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded_rows, 2);
        let skipped: Vec<usize> = report.skipped.iter().map(|(i, _)| *i).collect();
        assert_eq!(skipped, vec![1]);
        assert_eq!(store.regions(), &["Asia", "Europe"]);
    }

    #[tokio::test]
    async fn test_all_rows_invalid_is_an_error() {
        let (source, _file) = source(&["Asia,Eagle,Unknown,Feeding,100,5,10,3,10.5,20.25,-5.0,100.0"]).await;
        assert!(load_store(&source, 5).await.is_err());
    }

    #[test]
    fn test_wrong_column_type_is_reported() {
        use arrow::datatypes::{DataType, Field, Schema};
        use std::sync::Arc;

        let schema = Schema::new(vec![Field::new(schema::REGION, DataType::Int64, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Int64Array::from(vec![1]))],
        )
        .unwrap();

        assert!(matches!(
            records_from_batch(&batch),
            Err(DataError::ColumnType { .. })
        ));
    }
}
