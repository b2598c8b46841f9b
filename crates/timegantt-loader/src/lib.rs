//! # timegantt-loader
//!
//! Loads tracked intervals from CSV exports.
//!
//! The table needs `timew_interval_start` and `timew_interval_end` columns.
//! The optional `task_description`, `task_project`, `task_status`,
//! `task_tags` and `task_uuid` columns default to `"unknown"` when absent
//! or empty; an empty end means the interval is still running and ends
//! "now".
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use timegantt_loader::{load_reader, LoadOptions};
//!
//! let csv = "timew_interval_start,timew_interval_end,task_description\n\
//!            20240101T220000Z,20240101T230000Z,Reading\n";
//!
//! let options = LoadOptions::new(chrono_tz::UTC, Utc::now());
//! let intervals = load_reader(csv.as_bytes(), &options).unwrap();
//! assert_eq!(intervals[0].description, "Reading");
//! assert_eq!(intervals[0].project, "unknown");
//! ```

pub mod timestamp;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;
use timegantt_core::{Interval, UNKNOWN};
use tracing::debug;

pub use timestamp::parse_timestamp;

pub const START_COLUMN: &str = "timew_interval_start";
pub const END_COLUMN: &str = "timew_interval_end";

/// Loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read input {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {column}")]
    MissingColumn { column: &'static str },

    #[error("Invalid timestamp in row {row}, column {column}: {value:?}")]
    InvalidTimestamp {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// How to interpret timestamps
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Zone for naive timestamps and for the loaded intervals
    pub timezone: Tz,
    /// End of intervals that are still running
    pub now: DateTime<Utc>,
}

impl LoadOptions {
    pub fn new(timezone: Tz, now: DateTime<Utc>) -> Self {
        Self { timezone, now }
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "timew_interval_start", default)]
    start: Option<String>,
    #[serde(rename = "timew_interval_end", default)]
    end: Option<String>,
    #[serde(rename = "task_description", default)]
    description: Option<String>,
    #[serde(rename = "task_project", default)]
    project: Option<String>,
    #[serde(rename = "task_status", default)]
    status: Option<String>,
    #[serde(rename = "task_tags", default)]
    tags: Option<String>,
    #[serde(rename = "task_uuid", default)]
    uuid: Option<String>,
}

impl RawRow {
    fn into_interval(self, row: usize, options: &LoadOptions) -> Result<Interval, LoadError> {
        let tz = &options.timezone;
        let start = parse_cell(self.start, START_COLUMN, row, tz)?;
        let end = match self.end.filter(|v| !v.trim().is_empty()) {
            Some(value) => parse_cell(Some(value), END_COLUMN, row, tz)?,
            None => options.now.with_timezone(tz).trunc_subsecs(0),
        };

        Ok(Interval::new(start, end)
            .description(or_unknown(self.description))
            .project(or_unknown(self.project))
            .status(or_unknown(self.status))
            .tags(or_unknown(self.tags))
            .uuid(or_unknown(self.uuid)))
    }
}

fn parse_cell(
    value: Option<String>,
    column: &'static str,
    row: usize,
    tz: &Tz,
) -> Result<DateTime<Tz>, LoadError> {
    let value = value.unwrap_or_default();
    parse_timestamp(&value, tz).ok_or(LoadError::InvalidTimestamp { row, column, value })
}

fn or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Load intervals from any CSV source (a file, standard input, a buffer)
pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<Interval>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in [START_COLUMN, END_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn { column });
        }
    }

    let mut intervals = Vec::new();
    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        intervals.push(record?.into_interval(index + 1, options)?);
    }

    debug!(rows = intervals.len(), tz = %options.timezone, "loaded intervals");
    Ok(intervals)
}

/// Load intervals from a CSV file
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Vec<Interval>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_reader(file, options)
}
