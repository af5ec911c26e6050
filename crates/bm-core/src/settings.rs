//! Dashboard settings

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Startup defaults and display text for the dashboard.
///
/// Every field has a default, so a settings file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Region preselected in the map filter
    pub default_region: String,

    /// Species preselected in the map filter
    pub default_species: String,

    /// Initial rest-stop range (low, high)
    pub default_rest_stops: (i64, i64),

    /// Whether to use dark mode
    pub dark_mode: bool,

    pub title: String,
    pub intro: String,
    pub bar_chart_title: String,
    pub map_title: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_region: "Asia".to_string(),
            default_species: "Eagle".to_string(),
            default_rest_stops: (3, 6),
            dark_mode: true,
            title: "Bird Migration".to_string(),
            intro: "Bird migration is one of the nature's fascinating processes. \
                    Dig through this web app to gain insights on how different bird \
                    species migrate in this dashboard."
                .to_string(),
            bar_chart_title: "Bird Count".to_string(),
            map_title: "Migration paths of the birds".to_string(),
        }
    }
}

impl DashboardSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text)?;
        tracing::info!("Loaded dashboard settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_region": "Europe", "default_rest_stops": [2, 9] }}"#).unwrap();

        let settings = DashboardSettings::load(file.path()).unwrap();
        assert_eq!(settings.default_region, "Europe");
        assert_eq!(settings.default_rest_stops, (2, 9));
        assert_eq!(settings.default_species, "Eagle");
        assert_eq!(settings.map_title, "Migration paths of the birds");
    }

    #[test]
    fn test_malformed_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardSettings::load(file.path()).is_err());
    }
}
