//! Core data structures and types for emission processing.
//!
//! Defines the typed view of a measurement, the result types returned by
//! the query layer and the helpers that convert between chrono dates and
//! the day counts polars stores in `Date` columns.

use crate::constants::{MONTHS_PER_YEAR, UNIX_EPOCH_DAYS_FROM_CE};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How a daily cell of the source file was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueStatus {
    /// Parsed as a finite number
    Valid,
    /// Blank cell: no monitoring that day
    Missing,
    /// Non-numeric text
    Unparseable,
}

impl ValueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueStatus::Valid => "valid",
            ValueStatus::Missing => "missing",
            ValueStatus::Unparseable => "unparseable",
        }
    }

    /// Interpret a raw cell, returning the numeric value when there is one
    pub fn classify(raw: Option<&str>) -> (Option<f64>, ValueStatus) {
        let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
            return (None, ValueStatus::Missing);
        };

        match text.parse::<f64>() {
            Ok(value) if value.is_nan() => (None, ValueStatus::Missing),
            Ok(value) if value.is_finite() => (Some(value), ValueStatus::Valid),
            _ => (None, ValueStatus::Unparseable),
        }
    }
}

impl fmt::Display for ValueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(ValueStatus::Valid),
            "missing" => Ok(ValueStatus::Missing),
            "unparseable" => Ok(ValueStatus::Unparseable),
            other => Err(format!("Unknown value status: {}", other)),
        }
    }
}

/// One reading of a pollutant at a station on a calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub station_id: String,
    pub pollutant_code: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub status: ValueStatus,
}

/// A dated value returned by the evolution query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Distinct identifiers present in a measurement table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub stations: Vec<String>,
    pub pollutants: Vec<String>,
}

/// Descriptive statistics over the present values of a sample.
///
/// Undefined statistics (empty sample, or `std` of a single value) are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: u64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Statistics of an empty sample
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Statistics of one group, keyed by the grouping identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: Vec<String>,
    pub stats: DescriptiveStats,
}

/// Grouped descriptive statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Names of the grouping columns, matching each row's `key`
    pub key_columns: Vec<String>,
    pub rows: Vec<GroupSummary>,
}

impl SummaryTable {
    /// Look up the statistics of a group by its key
    pub fn get(&self, key: &[&str]) -> Option<&DescriptiveStats> {
        self.rows
            .iter()
            .find(|row| row.key.iter().map(String::as_str).eq(key.iter().copied()))
            .map(|row| &row.stats)
    }
}

/// One row of a monthly cross-tab; index 0 is January
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTabRow {
    pub key: String,
    pub months: [Option<f64>; MONTHS_PER_YEAR],
}

impl CrossTabRow {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            months: [None; MONTHS_PER_YEAR],
        }
    }

    /// Mean for a 1-based month, `None` when the cell is empty
    pub fn month(&self, month: u32) -> Option<f64> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index).copied().flatten()
    }
}

/// Monthly mean values with one identifier per row and months as columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTab {
    /// Name of the row dimension, e.g. `station_id`
    pub row_label: String,
    pub year: i32,
    pub rows: Vec<CrossTabRow>,
}

impl CrossTab {
    pub fn row(&self, key: &str) -> Option<&CrossTabRow> {
        self.rows.iter().find(|row| row.key == key)
    }
}

/// Counters gathered while loading and reshaping
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub files_loaded: usize,
    pub raw_records: usize,
    /// Rows produced by the unpivot, before date validation
    pub candidates: usize,
    pub measurements: usize,
    pub invalid_dates_dropped: usize,
    pub missing_values: usize,
    pub unparseable_values: usize,
    pub processing_time_ms: u128,
}

/// Natural ordering of opaque identifier codes: shorter codes first, then
/// lexicographic. Unpadded numeric codes sort numerically this way.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Strictly build a calendar date; out-of-range combinations are rejected
pub fn calendar_date(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    let month = u32::try_from(month).ok()?;
    let day = u32::try_from(day).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Days since the Unix epoch, the physical value of a polars `Date`
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}
