//! Input discovery for emission files
//!
//! Expands glob patterns in the input list into concrete file paths while
//! keeping the caller's ordering between entries.

use crate::error::{EmissionsError, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// True when the entry should be expanded rather than read literally
pub fn is_glob_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Resolve the input list into the files to load.
///
/// Plain paths pass through untouched so the loader can report missing
/// files itself. A pattern expands to its matches in sorted order and
/// must match at least one file.
pub fn resolve_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(inputs.len());

    for input in inputs {
        let entry = input.to_string_lossy();
        if !is_glob_pattern(&entry) {
            files.push(input.clone());
            continue;
        }

        let paths = glob::glob(&entry).map_err(|e| EmissionsError::Configuration {
            message: format!("Invalid input pattern '{}': {}", entry, e),
        })?;

        let mut matches: Vec<PathBuf> = paths
            .filter_map(|path| match path {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable path while expanding '{}': {}", entry, e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        if matches.is_empty() {
            return Err(EmissionsError::FileNotFound {
                path: input.clone(),
            });
        }

        matches.sort();
        debug!("Pattern '{}' matched {} files", entry, matches.len());
        files.extend(matches);
    }

    Ok(files)
}
