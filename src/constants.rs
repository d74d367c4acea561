//! Application constants for the emissions pipeline
//!
//! Default source column names, the column layout of the reshaped
//! measurement table and the default report parameters.

// =============================================================================
// Source File Layout
// =============================================================================

/// Input files read when none are given on the command line
pub const DEFAULT_INPUT_FILES: &[&str] = &[
    "emisiones-2016.csv",
    "emisiones-2017.csv",
    "emisiones-2018.csv",
    "emisiones-2019.csv",
];

/// Field delimiter used by the published emission files
pub const DEFAULT_DELIMITER: u8 = b';';

/// Identifying columns of a raw monthly record
pub mod source_columns {
    pub const STATION: &str = "ESTACION";
    pub const POLLUTANT: &str = "MAGNITUD";
    pub const YEAR: &str = "ANO";
    pub const MONTH: &str = "MES";
}

/// Day-value columns are named prefix + two-digit day, e.g. `D01`
pub const DEFAULT_DAY_PREFIX: &str = "D";
pub const FIRST_DAY_OF_MONTH: u32 = 1;
pub const LAST_DAY_OF_MONTH: u32 = 31;

// =============================================================================
// Measurement Table Layout
// =============================================================================

/// Column names of the reshaped, one-row-per-day table
pub mod measurement_columns {
    pub const STATION_ID: &str = "station_id";
    pub const POLLUTANT_CODE: &str = "pollutant_code";
    pub const DATE: &str = "date";
    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const DAY: &str = "day";
    pub const VALUE: &str = "value";
    pub const STATUS: &str = "status";

    /// Transient column holding the unparsed cell text during reshape
    pub const RAW_VALUE: &str = "raw_value";

    /// Final column order of a measurement table
    pub const ALL: &[&str] = &[
        STATION_ID,
        POLLUTANT_CODE,
        DATE,
        YEAR,
        MONTH,
        DAY,
        VALUE,
        STATUS,
    ];
}

/// Column names produced by the descriptive statistics aggregation
pub mod stats_columns {
    pub const COUNT: &str = "count";
    pub const MEAN: &str = "mean";
    pub const STD: &str = "std";
    pub const MIN: &str = "min";
    pub const Q25: &str = "25%";
    pub const MEDIAN: &str = "50%";
    pub const Q75: &str = "75%";
    pub const MAX: &str = "max";
}

/// Months shown as cross-tab columns
pub const MONTHS_PER_YEAR: usize = 12;

/// Days between 0001-01-01 and the Unix epoch, the origin of polars dates
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

// =============================================================================
// Report Defaults
// =============================================================================

/// Station and pollutant used by the example report sections
/// (nitrogen dioxide at Plaza Elíptica)
pub const DEFAULT_REPORT_STATION: &str = "56";
pub const DEFAULT_REPORT_POLLUTANT: &str = "8";

pub const DEFAULT_EVOLUTION_FROM: &str = "2018/10/25";
pub const DEFAULT_EVOLUTION_TO: &str = "2019/02/12";

pub const DEFAULT_REPORT_YEAR: i32 = 2019;
pub const DEFAULT_MONTHLY_STATION: &str = "4";
