//! Migration record model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a single migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MigrationOutcome {
    Successful,
    Failed,
}

impl MigrationOutcome {
    /// Both outcomes in bar-chart series order
    pub const ALL: [MigrationOutcome; 2] = [MigrationOutcome::Successful, MigrationOutcome::Failed];

    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationOutcome::Successful => "Successful",
            MigrationOutcome::Failed => "Failed",
        }
    }

    /// Map a grouped bar chart curve index to its outcome series.
    ///
    /// Curve 0 is the `Successful` series and curve 1 is `Failed`; any other
    /// index does not belong to the outcome chart.
    pub fn from_curve_number(curve_number: i64) -> Option<Self> {
        match curve_number {
            0 => Some(MigrationOutcome::Successful),
            1 => Some(MigrationOutcome::Failed),
            _ => None,
        }
    }

    /// Curve index of this outcome in the grouped bar chart
    pub fn curve_number(&self) -> i64 {
        match self {
            MigrationOutcome::Successful => 0,
            MigrationOutcome::Failed => 1,
        }
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Successful" => Ok(MigrationOutcome::Successful),
            "Failed" => Ok(MigrationOutcome::Failed),
            other => Err(format!("unknown migration outcome '{}'", other)),
        }
    }
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the point lies on the globe
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }
}

/// One row of the migration dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub region: String,
    pub species: String,
    pub migration_success: MigrationOutcome,
    pub migration_reason: String,
    pub flight_distance_km: f64,
    pub flock_size: f64,
    pub min_altitude_m: f64,
    pub rest_stops: i64,
    pub start: GeoPoint,
    pub end: GeoPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_number_mapping() {
        assert_eq!(MigrationOutcome::from_curve_number(0), Some(MigrationOutcome::Successful));
        assert_eq!(MigrationOutcome::from_curve_number(1), Some(MigrationOutcome::Failed));
        assert_eq!(MigrationOutcome::from_curve_number(2), None);
        assert_eq!(MigrationOutcome::from_curve_number(-1), None);

        for outcome in MigrationOutcome::ALL {
            assert_eq!(MigrationOutcome::from_curve_number(outcome.curve_number()), Some(outcome));
        }
    }

    #[test]
    fn test_outcome_parsing() {
        assert_eq!("Successful".parse::<MigrationOutcome>(), Ok(MigrationOutcome::Successful));
        assert_eq!(" Failed ".parse::<MigrationOutcome>(), Ok(MigrationOutcome::Failed));
        assert!("failed".parse::<MigrationOutcome>().is_err());
    }

    #[test]
    fn test_geo_point_bounds() {
        assert!(GeoPoint::new(45.0, -120.0).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }
}
