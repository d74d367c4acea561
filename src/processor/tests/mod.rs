//! Integration tests for the processor module
//!
//! Exercises loading, reshaping and the full pipeline against small
//! emission files written in the published semicolon layout.

pub mod pipeline_tests;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// One monthly source row: station, pollutant, year, month and the
/// non-blank day cells as (day, text)
pub struct MonthRow<'a> {
    pub station: &'a str,
    pub pollutant: &'a str,
    pub year: i32,
    pub month: u32,
    pub days: &'a [(u32, &'a str)],
}

/// Header of the published files: identifiers, then D/V pairs per day
pub fn emission_header() -> String {
    let mut header = vec![
        "PROVINCIA".to_string(),
        "MUNICIPIO".to_string(),
        "ESTACION".to_string(),
        "MAGNITUD".to_string(),
        "PUNTO_MUESTREO".to_string(),
        "ANO".to_string(),
        "MES".to_string(),
    ];
    for day in 1..=31 {
        header.push(format!("D{:02}", day));
        header.push(format!("V{:02}", day));
    }
    header.join(";")
}

fn emission_line(row: &MonthRow) -> String {
    let mut fields = vec![
        "28".to_string(),
        "79".to_string(),
        row.station.to_string(),
        row.pollutant.to_string(),
        format!("28079{}_{}_48", row.station, row.pollutant),
        row.year.to_string(),
        row.month.to_string(),
    ];
    for day in 1..=31 {
        let cell = row
            .days
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, text)| *text)
            .unwrap_or("");
        fields.push(cell.to_string());
        fields.push(if cell.is_empty() { "N" } else { "V" }.to_string());
    }
    fields.join(";")
}

/// Write an emission file with the standard header
pub fn write_emission_file(temp_dir: &TempDir, name: &str, rows: &[MonthRow]) -> PathBuf {
    let mut lines = vec![emission_header()];
    lines.extend(rows.iter().map(emission_line));
    write_raw_file(temp_dir, name, &lines.join("\n"))
}

/// Write arbitrary file content, for layouts the helper above cannot express
pub fn write_raw_file(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, format!("{}\n", content)).unwrap();
    path
}
