//! Descriptive statistics per pollutant, per station and pollutant, and for
//! a single series.
//!
//! Statistics cover present values only: blank and unparseable readings
//! count neither towards `count` nor towards any moment or quantile.

use crate::constants::measurement_columns::{POLLUTANT_CODE, STATION_ID, VALUE};
use crate::constants::stats_columns::{COUNT, MAX, MEAN, MEDIAN, MIN, Q25, Q75, STD};
use crate::error::Result;
use crate::models::{DescriptiveStats, GroupSummary, SummaryTable};
use crate::query::float_column;
use crate::table::{MeasurementTable, natural_sort_exprs};

use polars::prelude::*;

/// count, mean, sample std, min, quartiles and max of the value column
fn describe_exprs() -> Vec<Expr> {
    let value = || col(VALUE);
    vec![
        value().count().alias(COUNT),
        value().mean().alias(MEAN),
        value().std(1).alias(STD),
        value().min().alias(MIN),
        value()
            .quantile(lit(0.25), QuantileMethod::Linear)
            .alias(Q25),
        value().median().alias(MEDIAN),
        value()
            .quantile(lit(0.75), QuantileMethod::Linear)
            .alias(Q75),
        value().max().alias(MAX),
    ]
}

/// Convert every row of an aggregated frame into statistics
fn stats_rows(frame: &DataFrame) -> Result<Vec<DescriptiveStats>> {
    let count = frame.column(COUNT)?.cast(&DataType::UInt64)?;
    let count = count.u64()?;
    let mean = float_column(frame, MEAN)?;
    let std = float_column(frame, STD)?;
    let min = float_column(frame, MIN)?;
    let q25 = float_column(frame, Q25)?;
    let median = float_column(frame, MEDIAN)?;
    let q75 = float_column(frame, Q75)?;
    let max = float_column(frame, MAX)?;

    Ok((0..frame.height())
        .map(|row| {
            let count = count.get(row).unwrap_or(0);
            if count == 0 {
                return DescriptiveStats::empty();
            }
            DescriptiveStats {
                count,
                mean: mean.get(row).unwrap_or(f64::NAN),
                std: std.get(row).unwrap_or(f64::NAN),
                min: min.get(row).unwrap_or(f64::NAN),
                q25: q25.get(row).unwrap_or(f64::NAN),
                median: median.get(row).unwrap_or(f64::NAN),
                q75: q75.get(row).unwrap_or(f64::NAN),
                max: max.get(row).unwrap_or(f64::NAN),
            }
        })
        .collect())
}

fn grouped_summary(table: &MeasurementTable, keys: &[&str]) -> Result<SummaryTable> {
    let mut required = keys.to_vec();
    required.push(VALUE);
    table.require_columns(&required)?;

    let frame = table
        .lazy()
        .group_by_stable(keys.iter().map(|key| col(*key)).collect::<Vec<_>>())
        .agg(describe_exprs())
        .sort_by_exprs(
            natural_sort_exprs(keys),
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    let key_columns = keys
        .iter()
        .map(|key| -> Result<StringChunked> { Ok(frame.column(key)?.str()?.clone()) })
        .collect::<Result<Vec<_>>>()?;

    let rows = stats_rows(&frame)?
        .into_iter()
        .enumerate()
        .map(|(row, stats)| GroupSummary {
            key: key_columns
                .iter()
                .map(|column| column.get(row).unwrap_or_default().to_string())
                .collect(),
            stats,
        })
        .collect();

    Ok(SummaryTable {
        key_columns: keys.iter().map(|key| key.to_string()).collect(),
        rows,
    })
}

/// Statistics grouped by pollutant only
pub fn summary_by_pollutant(table: &MeasurementTable) -> Result<SummaryTable> {
    grouped_summary(table, &[POLLUTANT_CODE])
}

/// Statistics grouped by every (station, pollutant) pair present
pub fn summary_by_station_and_pollutant(table: &MeasurementTable) -> Result<SummaryTable> {
    grouped_summary(table, &[STATION_ID, POLLUTANT_CODE])
}

/// Statistics of a single series; an unknown series gives empty statistics
pub fn summary_for_series(
    table: &MeasurementTable,
    station: &str,
    pollutant: &str,
) -> Result<DescriptiveStats> {
    table.require_columns(&[STATION_ID, POLLUTANT_CODE, VALUE])?;

    let subset = table
        .lazy()
        .filter(
            col(STATION_ID)
                .eq(lit(station))
                .and(col(POLLUTANT_CODE).eq(lit(pollutant))),
        )
        .collect()?;
    if subset.column(VALUE)?.null_count() == subset.height() {
        return Ok(DescriptiveStats::empty());
    }

    let frame = subset.lazy().select(describe_exprs()).collect()?;
    Ok(stats_rows(&frame)?
        .into_iter()
        .next()
        .unwrap_or_else(DescriptiveStats::empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::table;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_summary_by_pollutant_counts_and_means() {
        let table = table(&[
            ("56", "8", "2019-02-01", Some(10.0)),
            ("56", "8", "2019-02-02", Some(20.0)),
            ("4", "8", "2019-02-01", Some(30.0)),
        ]);

        let summary = summary_by_pollutant(&table).unwrap();

        assert_eq!(summary.key_columns, vec![POLLUTANT_CODE]);
        assert_eq!(summary.rows.len(), 1);
        let stats = summary.get(&["8"]).unwrap();
        assert_eq!(stats.count, 3);
        assert_close(stats.mean, 20.0);
        assert_close(stats.std, 10.0);
        assert_close(stats.min, 10.0);
        assert_close(stats.q25, 15.0);
        assert_close(stats.median, 20.0);
        assert_close(stats.q75, 25.0);
        assert_close(stats.max, 30.0);
    }

    #[test]
    fn test_absent_values_are_excluded() {
        let table = table(&[
            ("56", "8", "2019-02-01", Some(10.0)),
            ("56", "8", "2019-02-02", None),
            ("56", "8", "2019-02-03", Some(30.0)),
            ("56", "12", "2019-02-01", None),
        ]);

        let summary = summary_by_pollutant(&table).unwrap();

        let no2 = summary.get(&["8"]).unwrap();
        assert_eq!(no2.count, 2);
        assert_close(no2.mean, 20.0);

        let blank = summary.get(&["12"]).unwrap();
        assert!(blank.is_empty());
        assert!(blank.mean.is_nan());
    }

    #[test]
    fn test_summary_by_station_and_pollutant_is_cross_product_of_present_pairs() {
        let table = table(&[
            ("56", "8", "2019-01-01", Some(1.0)),
            ("4", "8", "2019-01-01", Some(2.0)),
            ("4", "8", "2019-01-02", Some(4.0)),
            ("4", "1", "2019-01-01", Some(5.0)),
        ]);

        let summary = summary_by_station_and_pollutant(&table).unwrap();

        let keys: Vec<Vec<String>> = summary.rows.iter().map(|r| r.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                vec!["4".to_string(), "1".to_string()],
                vec!["4".to_string(), "8".to_string()],
                vec!["56".to_string(), "8".to_string()],
            ]
        );
        assert_close(summary.get(&["4", "8"]).unwrap().mean, 3.0);
        assert!(summary.get(&["56", "1"]).is_none());
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let table = table(&[("56", "8", "2019-01-01", Some(7.0))]);

        let stats = summary_for_series(&table, "56", "8").unwrap();

        assert_eq!(stats.count, 1);
        assert_close(stats.mean, 7.0);
        assert!(stats.std.is_nan());
        assert_close(stats.median, 7.0);
    }

    #[test]
    fn test_unknown_series_gives_empty_statistics() {
        let table = table(&[("56", "8", "2019-01-01", Some(7.0))]);

        let stats = summary_for_series(&table, "56", "1").unwrap();

        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.max.is_nan());
    }

    #[test]
    fn test_summaries_of_empty_table() {
        let table = MeasurementTable::empty().unwrap();

        assert!(summary_by_pollutant(&table).unwrap().rows.is_empty());
        assert!(summary_for_series(&table, "56", "8").unwrap().is_empty());
    }
}
