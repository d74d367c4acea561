//! Frame wrappers for the two stages of the pipeline.
//!
//! `RawRecords` holds the concatenated wide monthly rows exactly as read;
//! `MeasurementTable` holds the reshaped one-row-per-day measurements and
//! guarantees the column layout every query relies on.

use crate::constants::measurement_columns::{
    ALL, DATE, POLLUTANT_CODE, STATION_ID, STATUS, VALUE,
};
use crate::error::{EmissionsError, Result};
use crate::models::{Measurement, ValueStatus, epoch_days_to_date};
use polars::prelude::*;

/// Concatenated wide records from every input file
#[derive(Debug, Clone)]
pub struct RawRecords {
    frame: DataFrame,
    source_files: usize,
}

impl RawRecords {
    pub fn new(frame: DataFrame, source_files: usize) -> Self {
        Self {
            frame,
            source_files,
        }
    }

    /// Wrap a frame that did not come from the loader, e.g. built in memory
    pub fn from_frame(frame: DataFrame) -> Self {
        Self::new(frame, 0)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Number of files that were concatenated into this collection
    pub fn source_files(&self) -> usize {
        self.source_files
    }

    pub fn column_names(&self) -> Vec<String> {
        frame_column_names(&self.frame)
    }
}

/// Reshaped measurements, sorted by station, pollutant and date
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    frame: DataFrame,
}

impl MeasurementTable {
    /// Wrap a frame that already has the measurement layout
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        require_columns(&frame, ALL)?;
        Ok(Self { frame })
    }

    /// A table with the measurement layout and no rows
    pub fn empty() -> Result<Self> {
        let columns: Vec<Column> = ALL
            .iter()
            .map(|name| Series::new_empty((*name).into(), &column_dtype(name)).into())
            .collect();
        Self::from_frame(DataFrame::new(columns)?)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        require_columns(&self.frame, columns)
    }

    /// Typed view of every row, in table order
    pub fn measurements(&self) -> Result<Vec<Measurement>> {
        let stations = self.frame.column(STATION_ID)?.str()?;
        let pollutants = self.frame.column(POLLUTANT_CODE)?.str()?;
        let dates = self.frame.column(DATE)?.cast(&DataType::Int32)?;
        let dates = dates.i32()?;
        let values = self.frame.column(VALUE)?.cast(&DataType::Float64)?;
        let values = values.f64()?;
        let statuses = self.frame.column(STATUS)?.str()?;

        stations
            .into_iter()
            .zip(pollutants)
            .zip(dates)
            .zip(values)
            .zip(statuses)
            .map(|((((station, pollutant), days), value), status)| {
                let date = days
                    .and_then(epoch_days_to_date)
                    .ok_or_else(|| EmissionsError::InvalidTable {
                        message: "measurement without a calendar date".to_string(),
                    })?;
                let status = status
                    .unwrap_or_default()
                    .parse::<ValueStatus>()
                    .map_err(|message| EmissionsError::InvalidTable { message })?;

                Ok(Measurement {
                    station_id: station.unwrap_or_default().to_string(),
                    pollutant_code: pollutant.unwrap_or_default().to_string(),
                    date,
                    value,
                    status,
                })
            })
            .collect()
    }
}

/// Sort keys that order identifier columns naturally: by length, then text
pub(crate) fn natural_sort_exprs(columns: &[&str]) -> Vec<Expr> {
    columns
        .iter()
        .flat_map(|name| [col(*name).str().len_chars(), col(*name)])
        .collect()
}

pub(crate) fn frame_column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

fn require_columns(frame: &DataFrame, columns: &[&str]) -> Result<()> {
    let available = frame_column_names(frame);
    match columns
        .iter()
        .find(|name| !available.iter().any(|a| a == *name))
    {
        Some(missing) => Err(EmissionsError::MissingColumn {
            column: missing.to_string(),
        }),
        None => Ok(()),
    }
}

fn column_dtype(name: &str) -> DataType {
    use crate::constants::measurement_columns::{DAY, MONTH, YEAR};
    match name {
        DATE => DataType::Date,
        YEAR | MONTH | DAY => DataType::Int32,
        VALUE => DataType::Float64,
        _ => DataType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_has_measurement_layout() {
        let table = MeasurementTable::empty().unwrap();

        assert!(table.is_empty());
        assert_eq!(frame_column_names(table.frame()), ALL);
        assert_eq!(
            table.frame().column(DATE).unwrap().dtype(),
            &DataType::Date
        );
        assert!(table.measurements().unwrap().is_empty());
    }

    #[test]
    fn test_from_frame_reports_first_missing_column() {
        let frame = df!(STATION_ID => ["56"], POLLUTANT_CODE => ["8"]).unwrap();

        match MeasurementTable::from_frame(frame) {
            Err(EmissionsError::MissingColumn { column }) => assert_eq!(column, DATE),
            other => panic!("Expected MissingColumn error, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_records_accessors() {
        let frame = df!("ESTACION" => ["4", "56"], "D01" => ["1", "2"]).unwrap();
        let raw = RawRecords::new(frame, 2);

        assert_eq!(raw.len(), 2);
        assert!(!raw.is_empty());
        assert_eq!(raw.source_files(), 2);
        assert_eq!(raw.column_names(), vec!["ESTACION", "D01"]);
    }
}
