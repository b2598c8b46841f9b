//! timegantt CLI - Gantt charts from time-tracking exports
//!
//! Reads a Timewarrior/Taskwarrior CSV export (from a file or standard
//! input), optionally splits intervals at midnight, and writes an SVG or
//! HTML chart.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use timegantt_core::time::parse_timezone;
use timegantt_core::{sanitize, ChartConfig, Column, DaySplitter};
use timegantt_loader::{load_path, load_reader, LoadOptions};
use timegantt_render::{render_to_file, Chart, OutputFormat, SvgRenderer};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "timegantt")]
#[command(author, version, about = "Render a Gantt chart from time-tracking intervals", long_about = None)]
struct Cli {
    /// Input CSV file (standard input if omitted or "-")
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output image (.svg or .html)
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Image width in inches
    #[arg(long, default_value_t = 16.0)]
    width: f64,

    /// Image height in inches
    #[arg(long, default_value_t = 9.0)]
    height: f64,

    /// Pixels per inch
    #[arg(long, default_value_t = 100)]
    dpi: u32,

    /// Column that picks bar colors (description, project, status, tags, uuid or none)
    #[arg(long, default_value = "project")]
    color: String,

    /// IANA timezone whose midnights delimit days
    #[arg(long, env = "TIMEGANTT_TIMEZONE", default_value = "Europe/Paris")]
    timezone: String,

    /// Do not draw the legend
    #[arg(long)]
    no_legend: bool,

    /// Do not draw bar labels
    #[arg(long)]
    no_label: bool,

    /// Split intervals at midnight and draw one row per day
    #[arg(long)]
    by_day: bool,

    /// Seconds between the end of one day piece and the start of the next
    #[arg(long, value_name = "SECONDS", default_value_t = 1)]
    boundary_gap: i64,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Validated chart configuration
    fn config(&self) -> Result<ChartConfig> {
        let mut config = ChartConfig::new()
            .size(self.width, self.height)
            .dpi(self.dpi)
            .color_by(Column::parse_color_key(&self.color)?)
            .timezone(parse_timezone(&self.timezone)?)
            .by_day(self.by_day)
            .boundary_gap(Duration::seconds(self.boundary_gap));
        if self.no_legend {
            config = config.hide_legend();
        }
        if self.no_label {
            config = config.hide_labels();
        }
        if let Some(title) = &self.title {
            config = config.title(title.as_str());
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    // Reject the output path before reading any input
    OutputFormat::from_path(&cli.output).context("Invalid --output")?;
    let config = cli.config().context("Invalid chart settings")?;
    debug!(?config, "configuration");

    let options = LoadOptions::new(config.timezone, Utc::now());
    let intervals = match cli.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => load_path(path, &options)
            .with_context(|| format!("Failed to load intervals from {}", path.display()))?,
        _ => load_reader(io::stdin().lock(), &options)
            .context("Failed to load intervals from standard input")?,
    };

    let sanitized = sanitize(intervals);
    if sanitized.dropped_invalid > 0 {
        warn!(
            count = sanitized.dropped_invalid,
            "skipped intervals that do not end after they start"
        );
    }
    if sanitized.dropped_duplicates > 0 {
        warn!(
            count = sanitized.dropped_duplicates,
            "skipped intervals with a duplicate start time"
        );
    }

    let mut intervals = sanitized.intervals;
    if config.by_day {
        intervals = DaySplitter::from_config(&config)
            .split_all(intervals)
            .context("Failed to split intervals by day")?;
    }

    let chart = Chart::assemble(&intervals, &config).context("Failed to lay out the chart")?;
    render_to_file(&chart, &cli.output, &SvgRenderer::default())
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("Wrote {}", cli.output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("timegantt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&["-o", "chart.svg", "--timezone", "Europe/Paris"]);
        let config = cli.config().unwrap();
        assert_eq!(config, ChartConfig::default());
        assert!(cli.input.is_none());
    }

    #[test]
    fn flags_reach_the_config() {
        let cli = parse(&[
            "-o",
            "chart.svg",
            "--color",
            "none",
            "--timezone",
            "UTC",
            "--no-legend",
            "--no-label",
            "--by-day",
            "--width",
            "8",
            "--height",
            "4",
            "--boundary-gap",
            "0",
            "--title",
            "Sprint",
        ]);
        let config = cli.config().unwrap();
        assert_eq!(config.color_by, None);
        assert_eq!(config.timezone, parse_timezone("UTC").unwrap());
        assert!(!config.show_legend);
        assert!(!config.show_labels);
        assert!(config.by_day);
        assert_eq!(config.pixel_width(), 800);
        assert_eq!(config.boundary_gap, Duration::zero());
        assert_eq!(config.title.as_deref(), Some("Sprint"));
    }

    #[test]
    fn bad_values_are_rejected() {
        let cli = parse(&["-o", "c.svg", "--color", "priority"]);
        assert!(cli.config().is_err());

        let cli = parse(&["-o", "c.svg", "--timezone", "Nowhere/Land"]);
        assert!(cli.config().is_err());

        let cli = parse(&["-o", "c.svg", "--width=-3"]);
        assert!(cli.config().is_err());

        let cli = parse(&["-o", "c.svg", "--height", "0"]);
        assert!(cli.config().is_err());

        let cli = parse(&["-o", "c.svg", "--boundary-gap=-1"]);
        assert!(cli.config().is_err());
    }

    #[test]
    fn output_is_required() {
        assert!(Cli::try_parse_from(["timegantt", "--by-day"]).is_err());
    }
}
