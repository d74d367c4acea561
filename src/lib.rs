//! Air Emissions Library
//!
//! A Rust library for reshaping daily air-quality emission records,
//! published as one row per station, pollutant and month with a column
//! per day, into one row per measurement, and for summarising them.
//!
//! This library provides tools for:
//! - Loading and concatenating semicolon-delimited monthly files
//! - Reshaping day columns into dated measurements, dropping impossible dates
//! - Slicing a station/pollutant series over a date range
//! - Descriptive statistics per pollutant, per station and pollutant, or per series
//! - Monthly mean cross-tabs by pollutant or by station
//! - Printing all of the above as a plain-text report

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;
pub mod query;
pub mod report;
pub mod table;

// Re-export commonly used types
pub use config::{EmissionsConfig, ReportConfig, SourceSchema};
pub use error::{EmissionsError, Result};
pub use models::{CrossTab, DailyValue, DescriptiveStats, Inventory, Measurement, SummaryTable};
pub use processor::EmissionsProcessor;
pub use table::{MeasurementTable, RawRecords};

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Load, reshape and report, writing the report to `out`
pub fn execute<W: Write>(inputs: &[PathBuf], config: &EmissionsConfig, out: &mut W) -> Result<()> {
    let processor = EmissionsProcessor::new(config.clone());
    let dataset = processor.process(inputs)?;
    report::write_report(out, &dataset.table, &processor.config().report)?;
    report::write_processing_summary(out, &dataset.stats)
}

/// Program entry point: run the whole pipeline against stdout
pub fn run(inputs: &[PathBuf], config: &EmissionsConfig) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match execute(inputs, config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
