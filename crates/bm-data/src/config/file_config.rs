//! Source configuration for loading a migration table

use std::path::PathBuf;
use serde::{Serialize, Deserialize};

use super::null_handling::NullConfig;
use crate::schema;

/// Input column header for each schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub region: String,
    pub species: String,
    pub migration_success: String,
    pub migration_reason: String,
    pub flight_distance_km: String,
    pub flock_size: String,
    pub min_altitude_m: String,
    pub rest_stops: String,
    pub start_latitude: String,
    pub start_longitude: String,
    pub end_latitude: String,
    pub end_longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            region: "Region".to_string(),
            species: "Species".to_string(),
            migration_success: "Migration_Success".to_string(),
            migration_reason: "Migration_Reason".to_string(),
            flight_distance_km: "Flight_Distance_km".to_string(),
            flock_size: "Flock_Size".to_string(),
            min_altitude_m: "Min_Altitude_m".to_string(),
            rest_stops: "Rest_Stops".to_string(),
            start_latitude: "Start_Latitude".to_string(),
            start_longitude: "Start_Longitude".to_string(),
            end_latitude: "End_Latitude".to_string(),
            end_longitude: "End_Longitude".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Input header for a schema field name
    pub fn header_for(&self, field: &str) -> Option<&str> {
        let header = match field {
            schema::REGION => &self.region,
            schema::SPECIES => &self.species,
            schema::MIGRATION_SUCCESS => &self.migration_success,
            schema::MIGRATION_REASON => &self.migration_reason,
            schema::FLIGHT_DISTANCE_KM => &self.flight_distance_km,
            schema::FLOCK_SIZE => &self.flock_size,
            schema::MIN_ALTITUDE_M => &self.min_altitude_m,
            schema::REST_STOPS => &self.rest_stops,
            schema::START_LATITUDE => &self.start_latitude,
            schema::START_LONGITUDE => &self.start_longitude,
            schema::END_LATITUDE => &self.end_latitude,
            schema::END_LONGITUDE => &self.end_longitude,
            _ => return None,
        };
        Some(header.as_str())
    }
}

/// Configuration for a single source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the file
    pub path: PathBuf,

    /// Field delimiter
    pub delimiter: u8,

    /// Header names of the required columns
    pub columns: ColumnMapping,

    /// Null handling configuration
    pub null_config: NullConfig,

    /// Rows shown in the debug preview after loading
    pub preview_rows: usize,
}

impl SourceConfig {
    /// Create a configuration with the standard migration headers
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            delimiter: b',',
            columns: ColumnMapping::default(),
            null_config: NullConfig::default(),
            preview_rows: 5,
        }
    }

    /// Get the file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_schema_field_has_a_header() {
        let mapping = ColumnMapping::default();
        for (field, _) in schema::FIELDS.iter() {
            assert!(mapping.header_for(field).is_some(), "no header for {}", field);
        }
        assert_eq!(mapping.header_for(schema::REST_STOPS), Some("Rest_Stops"));
        assert_eq!(mapping.header_for("bird_id"), None);
    }

    #[test]
    fn test_file_name() {
        let config = SourceConfig::new(PathBuf::from("/data/bird_migration_data.csv"));
        assert_eq!(config.file_name(), "bird_migration_data.csv");
    }
}
