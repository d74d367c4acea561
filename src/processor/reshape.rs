//! Wide-to-long reshaping of monthly records.
//!
//! Each raw row carries one month of readings spread over day columns.
//! The reshaper unpivots those columns into one candidate per day, builds
//! a calendar date from year, month and day, drops candidates whose date
//! does not exist and sorts the survivors by station, pollutant and date.

use crate::config::{DayColumn, SourceSchema};
use crate::constants::measurement_columns::{
    ALL, DATE, DAY, MONTH, POLLUTANT_CODE, RAW_VALUE, STATION_ID, STATUS, VALUE, YEAR,
};
use crate::error::{EmissionsError, Result};
use crate::models::{ProcessingStats, ValueStatus, calendar_date, date_to_epoch_days};
use crate::table::{MeasurementTable, RawRecords, natural_sort_exprs};

use polars::prelude::*;
use tracing::{debug, warn};

/// Reshape raw monthly rows into a sorted measurement table
pub fn reshape(raw: &RawRecords, schema: &SourceSchema) -> Result<MeasurementTable> {
    reshape_with_stats(raw, schema).map(|(table, _)| table)
}

/// Reshape and report how many candidates were kept, dropped or blank
pub fn reshape_with_stats(
    raw: &RawRecords,
    schema: &SourceSchema,
) -> Result<(MeasurementTable, ProcessingStats)> {
    let columns = raw.column_names();
    if let Some(missing) = schema
        .identifying_columns()
        .into_iter()
        .find(|name| !columns.iter().any(|c| c == name))
    {
        return Err(EmissionsError::MissingColumn {
            column: missing.to_string(),
        });
    }

    let day_columns = schema.day_columns(&columns)?;
    let mut stats = ProcessingStats {
        files_loaded: raw.source_files(),
        raw_records: raw.len(),
        ..Default::default()
    };

    if day_columns.is_empty() {
        warn!(
            "No day columns with prefix '{}' found; nothing to reshape",
            schema.day_prefix
        );
        return Ok((MeasurementTable::empty()?, stats));
    }

    // Step 1: narrow to identifying columns and day columns
    let narrowed = select_record_columns(raw, schema, &day_columns);

    // Step 2: one frame per day column, stacked in column order
    let per_day: Vec<LazyFrame> = day_columns
        .iter()
        .map(|day_column| {
            narrowed.clone().select([
                col(STATION_ID),
                col(POLLUTANT_CODE),
                col(YEAR),
                col(MONTH),
                lit(day_column.day as i32).cast(DataType::Int32).alias(DAY),
                col(day_column.name.as_str()).alias(RAW_VALUE),
            ])
        })
        .collect();
    let mut candidates = concat(per_day, UnionArgs::default())?.collect()?;
    stats.candidates = candidates.height();

    // Step 3: strict calendar dates and classified values
    let dates = synthesize_dates(&candidates)?;
    let (values, statuses) = classify_values(&candidates)?;

    for (date, status) in dates.iter().zip(&statuses) {
        if date.is_none() {
            stats.invalid_dates_dropped += 1;
        } else if *status == ValueStatus::Missing.as_str() {
            stats.missing_values += 1;
        } else if *status == ValueStatus::Unparseable.as_str() {
            stats.unparseable_values += 1;
        }
    }

    candidates.with_column(Series::new(DATE.into(), dates).cast(&DataType::Date)?)?;
    candidates.with_column(Series::new(VALUE.into(), values))?;
    candidates.with_column(Series::new(STATUS.into(), statuses))?;

    // Step 4 and 5: drop impossible dates, then a stable sort on the key
    let mut sort_keys = natural_sort_exprs(&[STATION_ID, POLLUTANT_CODE]);
    sort_keys.push(col(DATE));

    let frame = candidates
        .lazy()
        .filter(col(DATE).is_not_null())
        .select(ALL.iter().map(|name| col(*name)).collect::<Vec<_>>())
        .sort_by_exprs(
            sort_keys,
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    stats.measurements = frame.height();

    debug!(
        "Reshaped {} raw records into {} measurements ({} impossible dates dropped)",
        stats.raw_records, stats.measurements, stats.invalid_dates_dropped
    );
    if stats.unparseable_values > 0 {
        warn!(
            "{} day values could not be parsed as numbers and were treated as absent",
            stats.unparseable_values
        );
    }

    Ok((MeasurementTable::from_frame(frame)?, stats))
}

/// Rename the identifying columns and keep only what the unpivot needs.
/// Identifiers are trimmed text; year and month are trimmed and become
/// integers, with unparseable ones turning null so their dates are
/// rejected later. Values stay text.
fn select_record_columns(
    raw: &RawRecords,
    schema: &SourceSchema,
    day_columns: &[DayColumn],
) -> LazyFrame {
    let trimmed = |name: &str| col(name).cast(DataType::String).str().strip_chars(lit(NULL));

    let mut exprs = vec![
        trimmed(&schema.station_column).alias(STATION_ID),
        trimmed(&schema.pollutant_column).alias(POLLUTANT_CODE),
        trimmed(&schema.year_column)
            .cast(DataType::Int32)
            .alias(YEAR),
        trimmed(&schema.month_column)
            .cast(DataType::Int32)
            .alias(MONTH),
    ];
    exprs.extend(
        day_columns
            .iter()
            .map(|day_column| col(day_column.name.as_str()).cast(DataType::String)),
    );

    raw.frame().clone().lazy().select(exprs)
}

/// Days since the epoch for each valid (year, month, day), null otherwise
fn synthesize_dates(candidates: &DataFrame) -> Result<Vec<Option<i32>>> {
    let years = candidates.column(YEAR)?.i32()?;
    let months = candidates.column(MONTH)?.i32()?;
    let days = candidates.column(DAY)?.i32()?;

    Ok(years
        .into_iter()
        .zip(months)
        .zip(days)
        .map(|((year, month), day)| {
            calendar_date(year?, month?, day?).map(date_to_epoch_days)
        })
        .collect())
}

fn classify_values(candidates: &DataFrame) -> Result<(Vec<Option<f64>>, Vec<&'static str>)> {
    let raw_values = candidates.column(RAW_VALUE)?.str()?;

    Ok(raw_values
        .into_iter()
        .map(|raw| {
            let (value, status) = ValueStatus::classify(raw);
            (value, status.as_str())
        })
        .unzip())
}
