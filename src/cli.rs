//! Command-line interface components.

use crate::config::{EmissionsConfig, ReportConfig};
use crate::constants::{
    DEFAULT_EVOLUTION_FROM, DEFAULT_EVOLUTION_TO, DEFAULT_INPUT_FILES, DEFAULT_MONTHLY_STATION,
    DEFAULT_REPORT_POLLUTANT, DEFAULT_REPORT_STATION, DEFAULT_REPORT_YEAR,
};
use crate::error::{EmissionsError, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "air-emissions")]
#[command(about = "Reshape daily air-quality emission files and print summary reports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Emission CSV files or glob patterns, read in order (defaults to emisiones-2016..2019.csv)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Station for the evolution and individual summary sections
    #[arg(long, default_value = DEFAULT_REPORT_STATION)]
    pub station: String,

    /// Pollutant for the evolution, summary and per-pollutant monthly sections
    #[arg(long, default_value = DEFAULT_REPORT_POLLUTANT)]
    pub pollutant: String,

    /// First day of the evolution window (YYYY/MM/DD)
    #[arg(long, default_value = DEFAULT_EVOLUTION_FROM)]
    pub from: String,

    /// Last day of the evolution window (YYYY/MM/DD)
    #[arg(long, default_value = DEFAULT_EVOLUTION_TO)]
    pub to: String,

    /// Year of the monthly cross-tabs
    #[arg(long, default_value_t = DEFAULT_REPORT_YEAR)]
    pub year: i32,

    /// Station of the per-station monthly cross-tab
    #[arg(long, default_value = DEFAULT_MONTHLY_STATION)]
    pub monthly_station: String,

    /// Field delimiter of the input files
    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Files to read, falling back to the fixed yearly file list
    pub fn input_files(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            DEFAULT_INPUT_FILES.iter().map(PathBuf::from).collect()
        } else {
            self.files.clone()
        }
    }

    /// Build the run configuration from the parsed arguments
    pub fn to_config(&self) -> Result<EmissionsConfig> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| EmissionsError::Configuration {
                message: format!("Delimiter '{}' must be a single ASCII character", self.delimiter),
            })?;

        let report = ReportConfig {
            station: self.station.clone(),
            pollutant: self.pollutant.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            year: self.year,
            monthly_station: self.monthly_station.clone(),
        };

        Ok(EmissionsConfig::default()
            .with_delimiter(delimiter)
            .with_report(report))
    }

    fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the level
pub fn init_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("air_emissions={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_fixed_report() {
        let args = Args::parse_from(["air-emissions"]);

        assert_eq!(
            args.input_files(),
            vec![
                PathBuf::from("emisiones-2016.csv"),
                PathBuf::from("emisiones-2017.csv"),
                PathBuf::from("emisiones-2018.csv"),
                PathBuf::from("emisiones-2019.csv"),
            ]
        );
        assert_eq!(args.to_config().unwrap(), EmissionsConfig::default());
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_explicit_files_and_report_parameters() {
        let args = Args::parse_from([
            "air-emissions",
            "a.csv",
            "data/*.csv",
            "--station",
            "4",
            "--year",
            "2018",
            "--delimiter",
            ",",
            "-v",
        ]);

        assert_eq!(
            args.input_files(),
            vec![PathBuf::from("a.csv"), PathBuf::from("data/*.csv")]
        );
        let config = args.to_config().unwrap();
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.report.station, "4");
        assert_eq!(config.report.year, 2018);
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let args = Args::parse_from(["air-emissions", "--delimiter", "§"]);

        assert!(matches!(
            args.to_config(),
            Err(EmissionsError::Configuration { .. })
        ));
    }
}
