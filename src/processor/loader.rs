//! Loading of wide monthly emission files
//!
//! Reads every input file with the shared delimiter and concatenates the
//! rows in input order. Any unreadable file or schema mismatch aborts the
//! whole load so queries never see a partial dataset.

use crate::config::EmissionsConfig;
use crate::error::{EmissionsError, Result};
use crate::table::{RawRecords, frame_column_names};

use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load and concatenate the given files; column order follows the first file
pub fn load_raw_records(paths: &[PathBuf], config: &EmissionsConfig) -> Result<RawRecords> {
    if paths.is_empty() {
        return Err(EmissionsError::Configuration {
            message: "No input files were given".to_string(),
        });
    }

    let mut frames = Vec::with_capacity(paths.len());
    let mut column_order: Option<Vec<String>> = None;

    for path in paths {
        let frame = read_delimited_file(path, config.delimiter)?;
        let available = frame_column_names(&frame);

        let expected: Vec<String> = match &column_order {
            Some(order) => order.clone(),
            None => config
                .schema
                .identifying_columns()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        };
        let missing: Vec<String> = expected
            .into_iter()
            .filter(|name| !available.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(EmissionsError::SchemaMismatch {
                path: path.clone(),
                missing,
            });
        }

        let frame = match &column_order {
            Some(order) => frame.select(order.iter().map(String::as_str))?,
            None => frame,
        };
        if column_order.is_none() {
            column_order = Some(available);
        }

        debug!("Loaded {} rows from {}", frame.height(), path.display());
        frames.push(frame.lazy());
    }

    let combined = concat(frames, UnionArgs::default())?.collect()?;
    info!(
        "Loaded {} raw records from {} files",
        combined.height(),
        paths.len()
    );

    Ok(RawRecords::new(combined, paths.len()))
}

/// Read one file with every column kept as text
fn read_delimited_file(path: &Path, delimiter: u8) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(EmissionsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| {
            options
                .with_separator(delimiter)
                .with_encoding(CsvEncoding::LossyUtf8)
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| EmissionsError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })
}
