//! Exit code integration tests
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Chart written |
//! | 1 | Nothing written: bad input, bad settings or unsupported output |
//! | 2 | Command-line usage error (reported by clap) |

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_timegantt"))
        .env_remove("TIMEGANTT_TIMEZONE")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to execute timegantt")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn out_path(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn exit_0_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let input = fixture("week.csv");

    let result = run(&["-i", input.to_str().unwrap(), "-o", &out]);
    assert_eq!(result.status.code(), Some(0), "stderr: {}", stderr(&result));
}

#[test]
fn exit_1_writing_to_stdout() {
    let input = fixture("week.csv");
    let result = run(&["-i", input.to_str().unwrap(), "-o", "-"]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("standard output"));
}

#[test]
fn exit_1_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.png");
    let input = fixture("week.csv");

    let result = run(&["-i", input.to_str().unwrap(), "-o", &out]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains(".svg or .html"));
    assert!(!PathBuf::from(&out).exists());
}

#[test]
fn exit_1_missing_required_column() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let input = fixture("missing_end_column.csv");

    let result = run(&["-i", input.to_str().unwrap(), "-o", &out]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("timew_interval_end"));
    assert!(!PathBuf::from(&out).exists());
}

#[test]
fn exit_1_bad_timestamp_names_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let input = fixture("bad_timestamp.csv");

    let result = run(&["-i", input.to_str().unwrap(), "-o", &out]);
    assert_eq!(result.status.code(), Some(1));
    let err = stderr(&result);
    assert!(err.contains("row 2"), "stderr: {err}");
    assert!(err.contains("tomorrow"), "stderr: {err}");
}

#[test]
fn exit_1_nonexistent_input() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let missing = out_path(&dir, "nope.csv");

    let result = run(&["-i", &missing, "-o", &out]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("nope.csv"));
}

#[test]
fn exit_1_unknown_timezone() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let input = fixture("week.csv");

    let result = run(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        &out,
        "--timezone",
        "Mars/Olympus",
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("Mars/Olympus"));
    assert!(!PathBuf::from(&out).exists());
}

#[test]
fn exit_1_unknown_color_column() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let input = fixture("week.csv");

    let result = run(&["-i", input.to_str().unwrap(), "-o", &out, "--color", "priority"]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("priority"));
}

#[test]
fn exit_1_bad_boundary_gap() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let input = fixture("week.csv");

    let result = run(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        &out,
        "--by-day",
        "--boundary-gap",
        "7200",
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("boundary gap"));
    assert!(!PathBuf::from(&out).exists());
}

#[test]
fn exit_1_when_every_row_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir, "chart.svg");
    let input = fixture("only_invalid.csv");

    let result = run(&["-i", input.to_str().unwrap(), "-o", &out]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("No intervals to render"));
    assert!(!PathBuf::from(&out).exists());
}

#[test]
fn exit_2_without_output() {
    let input = fixture("week.csv");
    let result = run(&["-i", input.to_str().unwrap()]);
    assert_eq!(result.status.code(), Some(2));
}
