use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use async_trait::async_trait;
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use arrow::array::*;
use csv::{ReaderBuilder, StringRecord};

use crate::config::{NullConfig, SourceConfig};
use crate::schema::{self, migration_schema};
use crate::DataError;

/// CSV data source holding the migration table as a single Arrow batch.
///
/// The file is read once when the source is opened; queries hand out the
/// cached batch.
pub struct CsvSource {
    /// Source configuration
    config: SourceConfig,
    /// File name shown in the UI
    name: String,
    /// Schema of the loaded batch
    pub schema: Arc<Schema>,
    /// Loaded rows
    batch: RecordBatch,
}

impl CsvSource {
    /// Open and read a CSV file
    pub async fn open(config: SourceConfig) -> Result<Self, DataError> {
        let schema = Arc::new(migration_schema());

        let batch = tokio::task::spawn_blocking({
            let config = config.clone();
            let schema = schema.clone();
            move || Self::read_file(&config, schema)
        })
        .await??;

        tracing::info!(
            "Loaded {} rows from {}",
            batch.num_rows(),
            config.path.display()
        );

        Ok(Self {
            name: config.file_name(),
            config,
            schema,
            batch,
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Read the file into a batch with the migration schema
    fn read_file(config: &SourceConfig, schema: Arc<Schema>) -> Result<RecordBatch, DataError> {
        let file = File::open(&config.path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(config.delimiter)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let positions = Self::resolve_columns(&headers, config)?;

        let mut rows: Vec<StringRecord> = Vec::new();
        for result in csv_reader.records() {
            rows.push(result?);
        }

        Self::build_batch(&rows, &positions, &config.null_config, schema)
    }

    /// Position of each schema field in the input, in schema order
    fn resolve_columns(headers: &StringRecord, config: &SourceConfig) -> Result<Vec<usize>, DataError> {
        schema::FIELDS
            .iter()
            .map(|(field, _)| {
                let header = config
                    .columns
                    .header_for(field)
                    .ok_or_else(|| DataError::MissingColumn(field.to_string()))?;
                headers
                    .iter()
                    .position(|h| h == header)
                    .ok_or_else(|| DataError::MissingColumn(header.to_string()))
            })
            .collect()
    }

    /// Build one Arrow array per schema field from raw rows
    fn build_batch(
        rows: &[StringRecord],
        positions: &[usize],
        null_config: &NullConfig,
        schema: Arc<Schema>,
    ) -> Result<RecordBatch, DataError> {
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(positions.len());

        for (field, &col_idx) in schema.fields().iter().zip(positions) {
            let array: ArrayRef = match field.data_type() {
                DataType::Int64 => {
                    let mut builder = Int64Builder::new();
                    for row in rows {
                        builder.append_option(cell(row, col_idx, null_config).and_then(parse_integer));
                    }
                    Arc::new(builder.finish())
                }
                DataType::Float64 => {
                    let mut builder = Float64Builder::new();
                    for row in rows {
                        builder.append_option(cell(row, col_idx, null_config).and_then(|v| v.parse::<f64>().ok()));
                    }
                    Arc::new(builder.finish())
                }
                _ => {
                    let mut builder = StringBuilder::new();
                    for row in rows {
                        builder.append_option(cell(row, col_idx, null_config));
                    }
                    Arc::new(builder.finish())
                }
            };

            columns.push(array);
        }

        RecordBatch::try_new(schema, columns).map_err(|e| e.into())
    }
}

/// Non-null cell value of a row
fn cell<'r>(row: &'r StringRecord, col_idx: usize, null_config: &NullConfig) -> Option<&'r str> {
    row.get(col_idx).and_then(|v| null_config.normalize(v))
}

/// Integers, also written as whole floats ("3.0")
fn parse_integer(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

#[async_trait]
impl bm_core::data::DataSource for CsvSource {
    async fn schema(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    async fn query_all(&self) -> anyhow::Result<RecordBatch> {
        Ok(self.batch.clone())
    }

    async fn row_count(&self) -> anyhow::Result<usize> {
        Ok(self.batch.num_rows())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use bm_core::data::DataSource;
    use std::io::Write;
    use std::path::PathBuf;

    const HEADER: &str = "Bird_ID,Species,Region,Migration_Success,Migration_Reason,Flight_Distance_km,Flock_Size,Min_Altitude_m,Rest_Stops,Start_Latitude,Start_Longitude,End_Latitude,End_Longitude";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("7"), Some(7));
        assert_eq!(parse_integer("7.0"), Some(7));
        assert_eq!(parse_integer("7.5"), None);
        assert_eq!(parse_integer("seven"), None);
    }

    #[tokio::test]
    async fn test_open_reads_mapped_columns() {
        let file = write_csv(&[
            "1,Eagle,Asia,Successful,Feeding,2986.61,48,1200,3,10.5,20.25,-5.0,100.0",
            "2,Stork,Europe,Failed,Breeding,800.5,12,300,N/A,1.0,2.0,3.0,4.0",
        ]);

        let source = CsvSource::open(SourceConfig::new(file.path().to_path_buf())).await.unwrap();
        assert_eq!(source.row_count().await.unwrap(), 2);

        let batch = source.query_all().await.unwrap();
        assert_eq!(batch.num_columns(), 12);

        let species = batch
            .column_by_name(schema::SPECIES)
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .unwrap();
        assert_eq!(species.value(0), "Eagle");

        let rest_stops = batch
            .column_by_name(schema::REST_STOPS)
            .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
            .unwrap();
        assert_eq!(rest_stops.value(0), 3);
        assert!(rest_stops.is_null(1));

        let distance = batch
            .column_by_name(schema::FLIGHT_DISTANCE_KM)
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .unwrap();
        assert_eq!(distance.value(1), 800.5);
    }

    #[tokio::test]
    async fn test_missing_column_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Species,Region").unwrap();
        writeln!(file, "Eagle,Asia").unwrap();

        let result = CsvSource::open(SourceConfig::new(file.path().to_path_buf())).await;
        assert!(matches!(result, Err(DataError::MissingColumn(ref c)) if c == "Migration_Success"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let result = CsvSource::open(SourceConfig::new(PathBuf::from("/nonexistent/birds.csv"))).await;
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[tokio::test]
    async fn test_ragged_rows_read_as_nulls() {
        let file = write_csv(&[
            "1,Eagle,Asia,Successful,Feeding,2986.61,48,1200,3,10.5,20.25,-5.0,100.0",
            "2,Stork,Europe,Failed,Breeding,800.5",
            "3,Hawk,Africa,Successful,Feeding,450,7,90,6,-1.0,30.0,5.0,35.0,extra",
        ]);

        let source = CsvSource::open(SourceConfig::new(file.path().to_path_buf())).await.unwrap();
        assert_eq!(source.row_count().await.unwrap(), 3);

        let batch = source.query_all().await.unwrap();
        let flock = batch
            .column_by_name(schema::FLOCK_SIZE)
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .unwrap();
        assert!(flock.is_null(1));
        assert_eq!(flock.value(2), 7.0);
    }
}
