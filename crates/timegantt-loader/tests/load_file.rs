//! Loading interval exports from disk, end to end through sanitizing and
//! day splitting.

use std::fs;

use chrono::{TimeZone, Utc};
use chrono_tz::{Europe, UTC};
use tempfile::tempdir;
use timegantt_core::{sanitize, DaySplitter};
use timegantt_loader::{load_path, LoadOptions};

const EXPORT: &str = "\
timew_interval_start,timew_interval_end,task_description,task_project,task_status,task_tags,task_uuid
20240101T080000Z,20240101T093000Z,Email,admin,completed,,a1
20240101T100000Z,20240101T090000Z,Clock skew,admin,completed,,a2
20240101T080000Z,20240101T083000Z,Duplicate,admin,completed,,a3
20240101T220000Z,20240103T050000Z,Batch job,ops,pending,night,a4
";

fn options(tz: chrono_tz::Tz) -> LoadOptions {
    LoadOptions::new(tz, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
}

#[test]
fn load_sanitize_split_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");
    fs::write(&path, EXPORT).unwrap();

    let intervals = load_path(&path, &options(UTC)).unwrap();
    assert_eq!(intervals.len(), 4);

    let sanitized = sanitize(intervals);
    assert_eq!(sanitized.dropped_invalid, 1);
    assert_eq!(sanitized.dropped_duplicates, 1);
    assert_eq!(sanitized.intervals.len(), 2);
    assert_eq!(sanitized.intervals[0].description, "Email");
    assert_eq!(sanitized.intervals[0].tags, "unknown");

    let split = DaySplitter::new(UTC).split_all(sanitized.intervals).unwrap();
    let days: Vec<String> = split
        .iter()
        .map(|i| format!("{} {}", i.description, i.start.format("%m-%d %H:%M")))
        .collect();
    assert_eq!(
        days,
        vec![
            "Email 01-01 08:00",
            "Batch job 01-01 22:00",
            "Batch job 01-02 00:00",
            "Batch job 01-03 00:00",
        ]
    );
}

#[test]
fn loaded_intervals_use_configured_zone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");
    fs::write(&path, EXPORT).unwrap();

    let intervals = load_path(&path, &options(Europe::Paris)).unwrap();
    assert_eq!(intervals[0].start.timezone(), Europe::Paris);
    assert_eq!(intervals[0].start.format("%H:%M").to_string(), "09:00");
}

#[test]
fn header_only_file_loads_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "timew_interval_start,timew_interval_end\n").unwrap();

    let intervals = load_path(&path, &options(UTC)).unwrap();
    assert!(intervals.is_empty());
}
