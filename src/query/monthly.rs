//! Monthly mean cross-tabs for one year.
//!
//! Rows are identifiers (stations or pollutants), columns are the twelve
//! months. A row appears when it has any measurement in the year; months
//! without present values stay empty.

use crate::constants::MONTHS_PER_YEAR;
use crate::constants::measurement_columns::{MONTH, POLLUTANT_CODE, STATION_ID, VALUE, YEAR};
use crate::constants::stats_columns::MEAN;
use crate::error::Result;
use crate::models::{CrossTab, CrossTabRow, compare_ids};
use crate::query::float_column;
use crate::table::MeasurementTable;

use polars::prelude::*;
use std::collections::HashMap;

/// Mean per station and month for one pollutant in `year`
pub fn monthly_means_by_pollutant(
    table: &MeasurementTable,
    pollutant: &str,
    year: i32,
) -> Result<CrossTab> {
    monthly_means(
        table,
        col(POLLUTANT_CODE).eq(lit(pollutant)),
        STATION_ID,
        year,
    )
}

/// Mean per pollutant and month for one station in `year`
pub fn monthly_means_by_station(
    table: &MeasurementTable,
    station: &str,
    year: i32,
) -> Result<CrossTab> {
    monthly_means(table, col(STATION_ID).eq(lit(station)), POLLUTANT_CODE, year)
}

fn monthly_means(
    table: &MeasurementTable,
    selection: Expr,
    row_column: &str,
    year: i32,
) -> Result<CrossTab> {
    table.require_columns(&[STATION_ID, POLLUTANT_CODE, YEAR, MONTH, VALUE])?;

    let frame = table
        .lazy()
        .filter(selection.and(col(YEAR).eq(lit(year))))
        .group_by_stable([col(row_column), col(MONTH)])
        .agg([col(VALUE).mean().alias(MEAN)])
        .collect()?;

    let keys = frame.column(row_column)?.str()?;
    let months = frame.column(MONTH)?.i32()?;
    let means = float_column(&frame, MEAN)?;

    let mut rows: HashMap<String, CrossTabRow> = HashMap::new();
    for ((key, month), mean) in keys.into_iter().zip(months).zip(&means) {
        let key = key.unwrap_or_default();
        let row = rows
            .entry(key.to_string())
            .or_insert_with(|| CrossTabRow::new(key));

        let index = month
            .and_then(|m| usize::try_from(m).ok())
            .and_then(|m| m.checked_sub(1))
            .filter(|index| *index < MONTHS_PER_YEAR);
        if let Some(index) = index {
            row.months[index] = mean;
        }
    }

    let mut rows: Vec<CrossTabRow> = rows.into_values().collect();
    rows.sort_by(|a, b| compare_ids(&a.key, &b.key));

    Ok(CrossTab {
        row_label: row_column.to_string(),
        year,
        rows,
    })
}
