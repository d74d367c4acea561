//! Time-range evolution of one station/pollutant series.

use crate::constants::measurement_columns::{DATE, POLLUTANT_CODE, STATION_ID, VALUE};
use crate::error::{EmissionsError, Result};
use crate::models::{DailyValue, date_to_epoch_days, epoch_days_to_date};
use crate::table::MeasurementTable;

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::debug;

const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

/// Parse a caller-supplied date bound such as `2018/10/25` or `2018-10-25`
pub fn parse_date_bound(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| EmissionsError::InvalidDate {
            input: input.to_string(),
        })
}

/// Values of one series between `from` and `to`, both inclusive, by date
pub fn evolution(
    table: &MeasurementTable,
    station: &str,
    pollutant: &str,
    from: &str,
    to: &str,
) -> Result<Vec<DailyValue>> {
    table.require_columns(&[STATION_ID, POLLUTANT_CODE, DATE, VALUE])?;

    let from = parse_date_bound(from)?;
    let to = parse_date_bound(to)?;
    if from > to {
        debug!("Empty evolution window: {} is after {}", from, to);
        return Ok(Vec::new());
    }

    let days = || col(DATE).cast(DataType::Int32);
    let frame = table
        .lazy()
        .filter(
            col(STATION_ID)
                .eq(lit(station))
                .and(col(POLLUTANT_CODE).eq(lit(pollutant)))
                .and(days().gt_eq(lit(date_to_epoch_days(from))))
                .and(days().lt_eq(lit(date_to_epoch_days(to)))),
        )
        .select([days().alias(DATE), col(VALUE)])
        .sort_by_exprs(
            [col(DATE)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    let dates = frame.column(DATE)?.i32()?;
    let values = frame.column(VALUE)?.f64()?;

    dates
        .into_iter()
        .zip(values)
        .map(|(days, value)| {
            let date = days.and_then(epoch_days_to_date).ok_or_else(|| {
                EmissionsError::InvalidTable {
                    message: "measurement without a calendar date".to_string(),
                }
            })?;
            Ok(DailyValue { date, value })
        })
        .collect()
}
