//! # timegantt-core
//!
//! Core domain model for timegantt charts.
//!
//! This crate provides:
//! - Domain types: `Interval`, `Column`, `ChartConfig`
//! - The day splitter that cuts multi-day intervals into per-day pieces
//! - The sanitizer that drops empty and duplicate intervals
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::TimeZone;
//! use chrono_tz::UTC;
//! use timegantt_core::{DaySplitter, Interval};
//!
//! let interval = Interval::new(
//!     UTC.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap(),
//!     UTC.with_ymd_and_hms(2024, 1, 3, 5, 0, 0).unwrap(),
//! )
//! .description("Night shift");
//!
//! let pieces = DaySplitter::new(UTC).split(&interval).unwrap();
//! assert_eq!(pieces.len(), 3);
//! ```

pub mod sanitize;
pub mod split;
pub mod time;

pub use sanitize::{sanitize, Sanitized};
pub use split::DaySplitter;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Placeholder for metadata missing from the input
pub const UNKNOWN: &str = "unknown";

/// Timezone used when none is configured
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

// ============================================================================
// Interval
// ============================================================================

/// One tracked span of work with its task metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub description: String,
    pub project: String,
    pub status: String,
    pub tags: String,
    pub uuid: String,
}

impl Interval {
    /// Create an interval with every metadata field set to `"unknown"`
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            start,
            end,
            description: UNKNOWN.into(),
            project: UNKNOWN.into(),
            status: UNKNOWN.into(),
            tags: UNKNOWN.into(),
            uuid: UNKNOWN.into(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    /// Copy of this interval's metadata over new bounds
    pub fn with_bounds(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `end` strictly after `start`
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Value of a metadata column
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::Description => &self.description,
            Column::Project => &self.project,
            Column::Status => &self.status,
            Column::Tags => &self.tags,
            Column::Uuid => &self.uuid,
        }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Metadata columns of the input table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Description,
    Project,
    Status,
    Tags,
    Uuid,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Description,
        Column::Project,
        Column::Status,
        Column::Tags,
        Column::Uuid,
    ];

    /// Header of this column in a CSV export
    pub const fn header(self) -> &'static str {
        match self {
            Column::Description => "task_description",
            Column::Project => "task_project",
            Column::Status => "task_status",
            Column::Tags => "task_tags",
            Column::Uuid => "task_uuid",
        }
    }

    /// Short name, as accepted on the command line
    pub const fn name(self) -> &'static str {
        match self {
            Column::Description => "description",
            Column::Project => "project",
            Column::Status => "status",
            Column::Tags => "tags",
            Column::Uuid => "uuid",
        }
    }

    /// Parse a color key, where `none` disables coloring
    pub fn parse_color_key(s: &str) -> Result<Option<Column>, ConfigError> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Column::ALL
            .into_iter()
            .find(|c| c.name() == wanted || c.header() == wanted)
            .ok_or_else(|| ConfigError::UnknownColumn(s.to_string()))
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Chart settings, fixed at startup and passed to every stage
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    /// Image width in inches
    pub width: f64,
    /// Image height in inches
    pub height: f64,
    /// Pixels per inch
    pub dpi: u32,
    /// Column whose values pick the bar colors (None = single color)
    pub color_by: Option<Column>,
    /// Zone whose midnights delimit days
    pub timezone: Tz,
    pub show_legend: bool,
    pub show_labels: bool,
    /// Split intervals per day and lay rows out by date
    pub by_day: bool,
    /// Distance between the end of one day piece and the start of the next
    pub boundary_gap: Duration,
    pub title: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 9.0,
            dpi: 100,
            color_by: Some(Column::Project),
            timezone: DEFAULT_TIMEZONE,
            show_legend: true,
            show_labels: true,
            by_day: false,
            boundary_gap: Duration::seconds(1),
            title: None,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure image size in inches
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn color_by(mut self, column: Option<Column>) -> Self {
        self.color_by = column;
        self
    }

    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn hide_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }

    pub fn hide_labels(mut self) -> Self {
        self.show_labels = false;
        self
    }

    pub fn by_day(mut self, by_day: bool) -> Self {
        self.by_day = by_day;
        self
    }

    pub fn boundary_gap(mut self, gap: Duration) -> Self {
        self.boundary_gap = gap;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }
        if self.dpi == 0 {
            return Err(ConfigError::InvalidDimension {
                name: "dpi",
                value: 0.0,
            });
        }
        if self.boundary_gap < Duration::zero() || self.boundary_gap >= Duration::hours(1) {
            return Err(ConfigError::InvalidBoundaryGap(self.boundary_gap));
        }
        Ok(())
    }

    pub fn pixel_width(&self) -> u32 {
        (self.width * self.dpi as f64).round() as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.height * self.dpi as f64).round() as u32
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Day splitting error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: String, end: String },

    #[error("Interval ending {0} runs past the last representable date")]
    OutOfRange(String),
}

/// Configuration error
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {name}: {value} (must be a positive number)")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("Invalid boundary gap: {0} (must be at least zero and under one hour)")]
    InvalidBoundaryGap(Duration),

    #[error("Unknown column: {0} (expected one of description, project, status, tags, uuid)")]
    UnknownColumn(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

// ============================================================================
// Tests
// ============================================================================
