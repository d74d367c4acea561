//! Read-only queries over a measurement table.
//!
//! Every query checks the columns it reads, never mutates the table and
//! answers "no matching rows" with an empty result instead of an error.

pub mod evolution;
pub mod monthly;
pub mod summary;

pub use self::evolution::{evolution, parse_date_bound};
pub use self::monthly::{monthly_means_by_pollutant, monthly_means_by_station};
pub use self::summary::{
    summary_by_pollutant, summary_by_station_and_pollutant, summary_for_series,
};

use crate::constants::measurement_columns::{POLLUTANT_CODE, STATION_ID};
use crate::error::Result;
use crate::models::{Inventory, compare_ids};
use crate::table::MeasurementTable;

use polars::prelude::*;
use std::collections::HashSet;

/// Distinct stations and pollutants, in natural identifier order
pub fn list_inventory(table: &MeasurementTable) -> Result<Inventory> {
    table.require_columns(&[STATION_ID, POLLUTANT_CODE])?;

    Ok(Inventory {
        stations: distinct_ids(table.frame(), STATION_ID)?,
        pollutants: distinct_ids(table.frame(), POLLUTANT_CODE)?,
    })
}

fn distinct_ids(frame: &DataFrame, column: &str) -> Result<Vec<String>> {
    let ids = frame.column(column)?.str()?;
    let mut distinct: Vec<String> = ids
        .into_iter()
        .flatten()
        .collect::<HashSet<&str>>()
        .into_iter()
        .map(str::to_owned)
        .collect();
    distinct.sort_by(|a, b| compare_ids(a, b));
    Ok(distinct)
}

/// Read a numeric aggregation column as f64, whatever its physical type
pub(crate) fn float_column(frame: &DataFrame, name: &str) -> Result<Float64Chunked> {
    Ok(frame.column(name)?.cast(&DataType::Float64)?.f64()?.clone())
}
