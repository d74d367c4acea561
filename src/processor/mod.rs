//! Load-and-reshape pipeline.
//!
//! Orchestrates the two stages that turn a list of wide monthly emission
//! files into a sorted measurement table: input discovery and loading,
//! then reshaping into one row per station, pollutant and day.

pub mod discovery;
pub mod loader;
pub mod reshape;

#[cfg(test)]
pub mod tests;

pub use self::discovery::resolve_input_files;
pub use self::loader::load_raw_records;
pub use self::reshape::{reshape, reshape_with_stats};

use crate::config::EmissionsConfig;
use crate::error::Result;
use crate::models::ProcessingStats;
use crate::table::MeasurementTable;

use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Result of a complete load-and-reshape run
#[derive(Debug, Clone)]
pub struct ProcessedDataset {
    pub table: MeasurementTable,
    pub stats: ProcessingStats,
}

/// Runs discovery, loading and reshaping with one configuration
#[derive(Debug, Clone, Default)]
pub struct EmissionsProcessor {
    config: EmissionsConfig,
}

impl EmissionsProcessor {
    pub fn new(config: EmissionsConfig) -> Self {
        Self { config }
    }

    /// Configure the processor
    pub fn with_config(mut self, config: EmissionsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EmissionsConfig {
        &self.config
    }

    /// Main processing entry point
    pub fn process(&self, inputs: &[PathBuf]) -> Result<ProcessedDataset> {
        let start_time = Instant::now();
        self.config.schema.validate()?;

        // Step 1: expand patterns into concrete files
        let files = resolve_input_files(inputs)?;
        info!("Reading {} emission files", files.len());

        // Step 2: load everything or fail on the first bad file
        let raw = load_raw_records(&files, &self.config)?;

        // Step 3: reshape into sorted measurements
        let (table, stats) = reshape_with_stats(&raw, &self.config.schema)?;

        let stats = ProcessingStats {
            processing_time_ms: start_time.elapsed().as_millis(),
            ..stats
        };
        info!(
            "Built {} measurements from {} raw records in {}ms",
            stats.measurements, stats.raw_records, stats.processing_time_ms
        );

        Ok(ProcessedDataset { table, stats })
    }
}
