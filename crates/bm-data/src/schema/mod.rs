//! Fixed Arrow schema of a loaded migration table

use arrow::datatypes::{DataType, Field, Schema};

pub const REGION: &str = "region";
pub const SPECIES: &str = "species";
pub const MIGRATION_SUCCESS: &str = "migration_success";
pub const MIGRATION_REASON: &str = "migration_reason";
pub const FLIGHT_DISTANCE_KM: &str = "flight_distance_km";
pub const FLOCK_SIZE: &str = "flock_size";
pub const MIN_ALTITUDE_M: &str = "min_altitude_m";
pub const REST_STOPS: &str = "rest_stops";
pub const START_LATITUDE: &str = "start_latitude";
pub const START_LONGITUDE: &str = "start_longitude";
pub const END_LATITUDE: &str = "end_latitude";
pub const END_LONGITUDE: &str = "end_longitude";

/// Every field of the migration schema with its type, in column order
pub const FIELDS: [(&str, DataType); 12] = [
    (REGION, DataType::Utf8),
    (SPECIES, DataType::Utf8),
    (MIGRATION_SUCCESS, DataType::Utf8),
    (MIGRATION_REASON, DataType::Utf8),
    (FLIGHT_DISTANCE_KM, DataType::Float64),
    (FLOCK_SIZE, DataType::Float64),
    (MIN_ALTITUDE_M, DataType::Float64),
    (REST_STOPS, DataType::Int64),
    (START_LATITUDE, DataType::Float64),
    (START_LONGITUDE, DataType::Float64),
    (END_LATITUDE, DataType::Float64),
    (END_LONGITUDE, DataType::Float64),
];

/// Schema every source converts its rows into.
///
/// All fields are nullable; nulls are dropped when rows are materialized.
pub fn migration_schema() -> Schema {
    Schema::new(
        FIELDS
            .iter()
            .map(|(name, data_type)| Field::new(*name, data_type.clone(), true))
            .collect::<Vec<_>>(),
    )
}
