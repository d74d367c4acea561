//! Configuration management and validation.
//!
//! Provides the source schema descriptor that tells the reshaper which
//! columns identify a record and which hold daily values, plus the
//! parameters of the printed report.

use crate::constants::{
    DEFAULT_DAY_PREFIX, DEFAULT_DELIMITER, DEFAULT_EVOLUTION_FROM, DEFAULT_EVOLUTION_TO,
    DEFAULT_MONTHLY_STATION, DEFAULT_REPORT_POLLUTANT, DEFAULT_REPORT_STATION,
    DEFAULT_REPORT_YEAR, FIRST_DAY_OF_MONTH, LAST_DAY_OF_MONTH, source_columns,
};
use crate::error::{EmissionsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Describes the wide monthly layout of the source files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSchema {
    /// Column holding the monitoring station code
    pub station_column: String,

    /// Column holding the pollutant (magnitude) code
    pub pollutant_column: String,

    /// Column holding the calendar year
    pub year_column: String,

    /// Column holding the month number
    pub month_column: String,

    /// Prefix of day-value columns; the rest of the name is a two-digit day
    pub day_prefix: String,

    /// First day-of-month column to read
    pub first_day: u32,

    /// Last day-of-month column to read
    pub last_day: u32,
}

/// A day-value column resolved against an actual frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub name: String,
    pub day: u32,
}

impl Default for SourceSchema {
    fn default() -> Self {
        Self {
            station_column: source_columns::STATION.to_string(),
            pollutant_column: source_columns::POLLUTANT.to_string(),
            year_column: source_columns::YEAR.to_string(),
            month_column: source_columns::MONTH.to_string(),
            day_prefix: DEFAULT_DAY_PREFIX.to_string(),
            first_day: FIRST_DAY_OF_MONTH,
            last_day: LAST_DAY_OF_MONTH,
        }
    }
}

impl SourceSchema {
    /// Check the descriptor can describe a real calendar month
    pub fn validate(&self) -> Result<()> {
        if self.day_prefix.is_empty() {
            return Err(EmissionsError::Configuration {
                message: "Day column prefix must not be empty".to_string(),
            });
        }

        if self.first_day < FIRST_DAY_OF_MONTH
            || self.last_day > LAST_DAY_OF_MONTH
            || self.first_day > self.last_day
        {
            return Err(EmissionsError::Configuration {
                message: format!(
                    "Day range {}..={} must lie within {}..={}",
                    self.first_day, self.last_day, FIRST_DAY_OF_MONTH, LAST_DAY_OF_MONTH
                ),
            });
        }

        Ok(())
    }

    /// Identifying columns in key order: station, pollutant, year, month
    pub fn identifying_columns(&self) -> [&str; 4] {
        [
            self.station_column.as_str(),
            self.pollutant_column.as_str(),
            self.year_column.as_str(),
            self.month_column.as_str(),
        ]
    }

    fn day_column_pattern(&self) -> Result<Regex> {
        let pattern = format!(r"^{}(\d{{2}})$", regex::escape(&self.day_prefix));
        Regex::new(&pattern).map_err(|e| EmissionsError::Configuration {
            message: format!("Invalid day column prefix '{}': {}", self.day_prefix, e),
        })
    }

    /// Resolve which of `columns` are day-value columns, in the given order
    pub fn day_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<DayColumn>> {
        self.validate()?;
        let pattern = self.day_column_pattern()?;

        let day_columns: Vec<DayColumn> = columns
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let day = pattern
                    .captures(name)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse::<u32>().ok())?;
                (self.first_day..=self.last_day)
                    .contains(&day)
                    .then(|| DayColumn {
                        name: name.to_string(),
                        day,
                    })
            })
            .collect();

        debug!(
            "Recognised {} day columns with prefix '{}'",
            day_columns.len(),
            self.day_prefix
        );

        Ok(day_columns)
    }
}

/// Parameters of the example sections in the printed report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Station used by the evolution and individual summary sections
    pub station: String,

    /// Pollutant used by the evolution, individual summary and
    /// per-pollutant monthly sections
    pub pollutant: String,

    /// Inclusive start of the evolution window
    pub from: String,

    /// Inclusive end of the evolution window
    pub to: String,

    /// Year of both monthly cross-tabs
    pub year: i32,

    /// Station of the per-station monthly cross-tab
    pub monthly_station: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            station: DEFAULT_REPORT_STATION.to_string(),
            pollutant: DEFAULT_REPORT_POLLUTANT.to_string(),
            from: DEFAULT_EVOLUTION_FROM.to_string(),
            to: DEFAULT_EVOLUTION_TO.to_string(),
            year: DEFAULT_REPORT_YEAR,
            monthly_station: DEFAULT_MONTHLY_STATION.to_string(),
        }
    }
}

/// Global configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionsConfig {
    /// Field delimiter shared by all input files
    pub delimiter: u8,

    /// Layout of the wide source records
    pub schema: SourceSchema,

    /// Example parameters of the printed report
    pub report: ReportConfig,
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            schema: SourceSchema::default(),
            report: ReportConfig::default(),
        }
    }
}

impl EmissionsConfig {
    /// Use a custom field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use a custom source schema descriptor
    pub fn with_schema(mut self, schema: SourceSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Use custom report parameters
    pub fn with_report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }
}
