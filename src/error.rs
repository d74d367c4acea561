//! Error handling for emission loading and querying.
//!
//! Load-time failures carry the offending path so a run can report
//! exactly which input file broke the shared schema.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmissionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read CSV file: {path} - {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("Schema mismatch in file: {path} - missing columns: {}", missing.join(", "))]
    SchemaMismatch { path: PathBuf, missing: Vec<String> },

    #[error("Measurement table is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Malformed measurement table: {message}")]
    InvalidTable { message: String },

    #[error("Invalid date '{input}': expected YYYY/MM/DD or YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, EmissionsError>;
