//! Human-readable report of a measurement table.
//!
//! Writes the fixed sequence of sections (inventory, one evolution, the
//! grouped summaries, one individual summary and two monthly cross-tabs)
//! to any writer, so the binary prints to stdout and tests capture it.

use crate::config::ReportConfig;
use crate::constants::MONTHS_PER_YEAR;
use crate::error::Result;
use crate::models::{CrossTab, DailyValue, DescriptiveStats, ProcessingStats, SummaryTable};
use crate::query::{
    evolution, list_inventory, monthly_means_by_pollutant, monthly_means_by_station,
    summary_by_pollutant, summary_by_station_and_pollutant, summary_for_series,
};
use crate::table::MeasurementTable;

use colored::*;
use std::fmt;
use std::io::Write;

const KEY_WIDTH: usize = 16;
const STAT_WIDTH: usize = 10;
const MONTH_WIDTH: usize = 8;
const STAT_HEADERS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn format_cell(value: Option<f64>) -> String {
    value.map(format_stat).unwrap_or_default()
}

fn stat_cells(stats: &DescriptiveStats) -> [String; 8] {
    [
        stats.count.to_string(),
        format_stat(stats.mean),
        format_stat(stats.std),
        format_stat(stats.min),
        format_stat(stats.q25),
        format_stat(stats.median),
        format_stat(stats.q75),
        format_stat(stats.max),
    ]
}

impl fmt::Display for DescriptiveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, cell) in STAT_HEADERS.iter().zip(stat_cells(self)) {
            writeln!(f, "{:<8}{:>STAT_WIDTH$}", name, cell)?;
        }
        Ok(())
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.key_columns {
            write!(f, "{:<KEY_WIDTH$}", key)?;
        }
        for header in STAT_HEADERS {
            write!(f, "{:>STAT_WIDTH$}", header)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            for key in &row.key {
                write!(f, "{:<KEY_WIDTH$}", key)?;
            }
            for cell in stat_cells(&row.stats) {
                write!(f, "{:>STAT_WIDTH$}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for CrossTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<KEY_WIDTH$}", self.row_label)?;
        for month in 1..=MONTHS_PER_YEAR {
            write!(f, "{:>MONTH_WIDTH$}", month)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<KEY_WIDTH$}", row.key)?;
            for value in row.months {
                write!(f, "{:>MONTH_WIDTH$}", format_cell(value))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out, "\n{}", title.bright_green().bold())?;
    Ok(())
}

fn write_evolution<W: Write>(out: &mut W, values: &[DailyValue]) -> Result<()> {
    if values.is_empty() {
        writeln!(out, "  (no measurements in range)")?;
    }
    for value in values {
        writeln!(out, "  {}  {:>STAT_WIDTH$}", value.date, format_cell(value.value))?;
    }
    Ok(())
}

/// Write every report section for `table` using the parameters in `report`
pub fn write_report<W: Write>(
    out: &mut W,
    table: &MeasurementTable,
    report: &ReportConfig,
) -> Result<()> {
    let inventory = list_inventory(table)?;
    section(out, "Available stations")?;
    writeln!(out, "  {}", inventory.stations.join(", "))?;
    section(out, "Available pollutants")?;
    writeln!(out, "  {}", inventory.pollutants.join(", "))?;

    section(
        out,
        &format!(
            "Evolution of pollutant {} at station {} from {} to {}",
            report.pollutant, report.station, report.from, report.to
        ),
    )?;
    let values = evolution(
        table,
        &report.station,
        &report.pollutant,
        &report.from,
        &report.to,
    )?;
    write_evolution(out, &values)?;

    section(out, "Summary by pollutant")?;
    write!(out, "{}", summary_by_pollutant(table)?)?;

    section(out, "Summary by station and pollutant")?;
    write!(out, "{}", summary_by_station_and_pollutant(table)?)?;

    section(
        out,
        &format!(
            "Summary of pollutant {} at station {}",
            report.pollutant, report.station
        ),
    )?;
    write!(
        out,
        "{}",
        summary_for_series(table, &report.station, &report.pollutant)?
    )?;

    section(
        out,
        &format!(
            "Monthly means of pollutant {} in {}",
            report.pollutant, report.year
        ),
    )?;
    write!(
        out,
        "{}",
        monthly_means_by_pollutant(table, &report.pollutant, report.year)?
    )?;

    section(
        out,
        &format!(
            "Monthly means at station {} in {}",
            report.monthly_station, report.year
        ),
    )?;
    write!(
        out,
        "{}",
        monthly_means_by_station(table, &report.monthly_station, report.year)?
    )?;

    out.flush()?;
    Ok(())
}

/// Write the load and reshape counters gathered for this run
pub fn write_processing_summary<W: Write>(out: &mut W, stats: &ProcessingStats) -> Result<()> {
    section(out, "Processing summary")?;
    writeln!(
        out,
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms
    )?;
    writeln!(out, "  {} {}", "Files loaded:".bright_cyan(), stats.files_loaded)?;
    writeln!(out, "  {} {}", "Raw records:".bright_cyan(), stats.raw_records)?;
    writeln!(out, "  {} {}", "Measurements:".bright_cyan(), stats.measurements)?;
    writeln!(
        out,
        "  {} {}",
        "Impossible dates dropped:".bright_cyan(),
        stats.invalid_dates_dropped
    )?;
    writeln!(out, "  {} {}", "Missing values:".bright_cyan(), stats.missing_values)?;
    if stats.unparseable_values > 0 {
        writeln!(
            out,
            "  {} {}",
            "Unparseable values:".bright_red(),
            stats.unparseable_values.to_string().bright_red().bold()
        )?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrossTabRow, GroupSummary};

    #[test]
    fn test_cross_tab_leaves_missing_months_blank() {
        let mut row = CrossTabRow::new("56");
        row.months[0] = Some(12.346);
        let cross_tab = CrossTab {
            row_label: "station_id".to_string(),
            year: 2019,
            rows: vec![row],
        };

        let text = cross_tab.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("station_id"));
        assert!(lines[0].trim_end().ends_with("12"));
        assert!(lines[1].starts_with("56"));
        assert!(lines[1].contains("12.35"));
        assert_eq!(lines[1].trim_end().len(), KEY_WIDTH + MONTH_WIDTH);
    }

    #[test]
    fn test_summary_table_prints_nan_for_empty_groups() {
        let summary = SummaryTable {
            key_columns: vec!["pollutant_code".to_string()],
            rows: vec![GroupSummary {
                key: vec!["8".to_string()],
                stats: DescriptiveStats::empty(),
            }],
        };

        let text = summary.to_string();

        assert!(text.lines().next().unwrap().contains("count"));
        assert!(text.contains("NaN"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_processing_summary_lists_counters() {
        let stats = ProcessingStats {
            files_loaded: 2,
            raw_records: 3,
            candidates: 93,
            measurements: 90,
            invalid_dates_dropped: 3,
            missing_values: 80,
            unparseable_values: 1,
            processing_time_ms: 5,
        };
        let mut out = Vec::new();

        write_processing_summary(&mut out, &stats).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Processing summary"));
        assert!(text.contains("Impossible dates dropped:"));
        assert!(text.contains("Unparseable values:"));
        assert!(text.contains("90"));
    }

    #[test]
    fn test_processing_summary_omits_unparseable_when_clean() {
        let mut out = Vec::new();

        write_processing_summary(&mut out, &ProcessingStats::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Missing values:"));
        assert!(!text.contains("Unparseable values:"));
    }

    #[test]
    fn test_individual_summary_lists_every_statistic() {
        let text = DescriptiveStats::empty().to_string();

        for header in STAT_HEADERS {
            assert!(text.contains(header), "missing {}", header);
        }
    }
}
