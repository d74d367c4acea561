//! End-to-end processor tests

use super::{MonthRow, write_emission_file};
use crate::config::{EmissionsConfig, SourceSchema};
use crate::error::EmissionsError;
use crate::processor::EmissionsProcessor;
use crate::query::{evolution, list_inventory, summary_for_series};
use tempfile::TempDir;

fn yearly_files(temp_dir: &TempDir) {
    write_emission_file(
        temp_dir,
        "emisiones-2018.csv",
        &[
            MonthRow { station: "56", pollutant: "8", year: 2018, month: 12, days: &[(31, "40")] },
            MonthRow { station: "4", pollutant: "8", year: 2018, month: 12, days: &[(31, "10")] },
        ],
    );
    write_emission_file(
        temp_dir,
        "emisiones-2019.csv",
        &[MonthRow { station: "56", pollutant: "8", year: 2019, month: 1, days: &[(1, "50"), (2, "60")] }],
    );
}

#[test]
fn test_glob_pattern_loads_matching_files() {
    let temp_dir = TempDir::new().unwrap();
    yearly_files(&temp_dir);

    let pattern = temp_dir.path().join("emisiones-*.csv");
    let dataset = EmissionsProcessor::default().process(&[pattern]).unwrap();

    assert_eq!(dataset.stats.files_loaded, 2);
    assert_eq!(dataset.stats.raw_records, 3);
    assert_eq!(dataset.stats.measurements, 31 * 3);

    let inventory = list_inventory(&dataset.table).unwrap();
    assert_eq!(inventory.stations, vec!["4", "56"]);
    assert_eq!(inventory.pollutants, vec!["8"]);
}

#[test]
fn test_evolution_spans_file_boundary() {
    let temp_dir = TempDir::new().unwrap();
    yearly_files(&temp_dir);

    let pattern = temp_dir.path().join("emisiones-*.csv");
    let dataset = EmissionsProcessor::default().process(&[pattern]).unwrap();

    let values = evolution(&dataset.table, "56", "8", "2018/12/31", "2019/01/02").unwrap();
    let present: Vec<Option<f64>> = values.iter().map(|v| v.value).collect();
    assert_eq!(present, vec![Some(40.0), Some(50.0), Some(60.0)]);

    let stats = summary_for_series(&dataset.table, "56", "8").unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.mean, 50.0);
}

#[test]
fn test_missing_file_fails_before_any_query() {
    let temp_dir = TempDir::new().unwrap();
    yearly_files(&temp_dir);
    let inputs = vec![
        temp_dir.path().join("emisiones-2018.csv"),
        temp_dir.path().join("emisiones-2017.csv"),
    ];

    let result = EmissionsProcessor::default().process(&inputs);

    assert!(matches!(result, Err(EmissionsError::FileNotFound { .. })));
}

#[test]
fn test_unmatched_pattern_is_reported() {
    let temp_dir = TempDir::new().unwrap();

    let result = EmissionsProcessor::default().process(&[temp_dir.path().join("*.csv")]);

    assert!(matches!(result, Err(EmissionsError::FileNotFound { .. })));
}

#[test]
fn test_invalid_schema_is_rejected_before_reading() {
    let config = EmissionsConfig::default().with_schema(SourceSchema {
        first_day: 20,
        last_day: 10,
        ..SourceSchema::default()
    });
    let processor = EmissionsProcessor::default().with_config(config);

    let result = processor.process(&[std::path::PathBuf::from("does-not-exist.csv")]);

    assert!(matches!(result, Err(EmissionsError::Configuration { .. })));
}

#[test]
fn test_processor_keeps_supplied_configuration() {
    let config = EmissionsConfig::default().with_delimiter(b',');

    let processor = EmissionsProcessor::default().with_config(config.clone());

    assert_eq!(processor.config(), &config);
    assert_eq!(EmissionsProcessor::new(config.clone()).config().delimiter, b',');
}
