//! Timestamp parsing for interval exports
//!
//! Accepted forms, tried in order:
//! - RFC 3339: `2024-01-01T22:00:00+01:00`, `2024-01-01T21:00:00Z`
//! - Timewarrior compact UTC: `20240101T210000Z`
//! - Space separated with offset: `2024-01-01 22:00:00+01:00`
//! - Naive local time, read in the configured zone: `2024-01-01 22:00:00`
//!   (times skipped by a DST jump move forward past the jump)
//!
//! Results are converted to the configured zone and truncated to whole
//! seconds.

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use timegantt_core::time::resolve_local;

const TIMEW_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse one timestamp cell, `None` if no known form matches
pub fn parse_timestamp(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(tz))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, TIMEW_FORMAT)
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz))
        })
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.with_timezone(tz))
        })
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .and_then(|naive| resolve_local(naive, tz))
        })?;

    Some(parsed.trunc_subsecs(0))
}
