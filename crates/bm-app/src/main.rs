//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bm_core::{Dashboard, DashboardSettings};
use bm_data::{load_store, CsvSource, SourceConfig};

mod app;

use app::MigrationDashboardApp;

#[derive(Parser, Debug)]
#[command(name = "bird-migration")]
#[command(about = "Interactive dashboard over a bird migration table", long_about = None)]
struct Args {
    /// Path to the migration CSV file
    data_csv: PathBuf,

    /// Optional dashboard settings (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Field delimiter of the CSV file
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

impl Args {
    fn source_config(&self) -> Result<SourceConfig> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!("Delimiter must be an ASCII character, got '{}'", self.delimiter);
        }
        Ok(SourceConfig {
            delimiter: self.delimiter as u8,
            ..SourceConfig::new(self.data_csv.clone())
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => DashboardSettings::load(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => DashboardSettings::default(),
    };

    // Load the whole table before the window opens; a load failure is fatal
    let config = args.source_config()?;
    let preview_rows = config.preview_rows;
    let runtime = tokio::runtime::Runtime::new()?;
    let (source_name, store, report) = runtime
        .block_on(async {
            let source = CsvSource::open(config).await?;
            let (store, report) = load_store(&source, preview_rows).await?;
            anyhow::Ok((bm_core::DataSource::source_name(&source).to_string(), store, report))
        })
        .with_context(|| format!("Failed to load {}", args.data_csv.display()))?;

    let dashboard = Dashboard::new(Arc::new(store), &settings);
    info!("Starting dashboard for {}", source_name);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: if settings.dark_mode { eframe::Theme::Dark } else { eframe::Theme::Light },
        persist_window: false,
        ..Default::default()
    };

    let title = settings.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            Box::new(MigrationDashboardApp::new(cc, dashboard, &settings, source_name, &report))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_settings_and_delimiter() {
        let args = Args::try_parse_from([
            "bird-migration",
            "data/birds.csv",
            "--settings",
            "dashboard.json",
            "--delimiter",
            ";",
        ])
        .unwrap();

        assert_eq!(args.data_csv, PathBuf::from("data/birds.csv"));
        assert_eq!(args.settings, Some(PathBuf::from("dashboard.json")));
        assert_eq!(args.source_config().unwrap().delimiter, b';');
    }

    #[test]
    fn test_args_require_data_path() {
        assert!(Args::try_parse_from(["bird-migration"]).is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let args = Args::try_parse_from(["bird-migration", "birds.csv", "--delimiter", "é"]).unwrap();
        assert!(args.source_config().is_err());
    }
}
