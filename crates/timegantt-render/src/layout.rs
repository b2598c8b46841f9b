//! Chart assembly
//!
//! Turns intervals into rows, bars, axis ticks and legend entries. All x
//! coordinates are seconds: offsets from the earliest start on a timeline
//! chart, or wall-clock seconds since midnight on a by-day chart.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Timelike};
use chrono_tz::Tz;
use timegantt_core::time::start_of_day;
use timegantt_core::{ChartConfig, Column, Interval};
use tracing::debug;

use crate::palette::Palette;
use crate::RenderError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// What the x axis measures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisMode {
    /// Absolute time, one row per task description
    Timeline,
    /// Time of day, one row per calendar date
    TimeOfDay,
}

/// One rectangle on the chart
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub row: usize,
    pub start: f64,
    pub end: f64,
    pub color: String,
    pub label: String,
}

/// Axis tick position and text
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub at: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Everything a renderer needs to draw
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub title: Option<String>,
    pub mode: AxisMode,
    /// Row labels, top to bottom
    pub rows: Vec<String>,
    pub bars: Vec<Bar>,
    pub x_min: f64,
    pub x_max: f64,
    pub ticks: Vec<Tick>,
    pub legend: Vec<LegendEntry>,
    pub show_labels: bool,
    /// Image size in pixels
    pub width: u32,
    pub height: u32,
}

/// Keys numbered in order of first appearance
#[derive(Default)]
struct FirstSeen {
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl FirstSeen {
    fn index_of(&mut self, key: &str) -> usize {
        if let Some(&i) = self.index.get(key) {
            return i;
        }
        let i = self.keys.len();
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), i);
        i
    }
}

impl Chart {
    /// Assemble a chart with the default palette
    pub fn assemble(intervals: &[Interval], config: &ChartConfig) -> Result<Self, RenderError> {
        Self::assemble_with(intervals, config, &Palette::default())
    }

    pub fn assemble_with(
        intervals: &[Interval],
        config: &ChartConfig,
        palette: &Palette,
    ) -> Result<Self, RenderError> {
        if intervals.is_empty() {
            return Err(RenderError::InvalidData("No intervals to render".into()));
        }

        let tz = config.timezone;
        let mut intervals: Vec<Interval> = intervals
            .iter()
            .map(|i| i.with_bounds(i.start.with_timezone(&tz), i.end.with_timezone(&tz)))
            .collect();
        intervals.sort_by_key(|i| i.start);

        let mut colors = FirstSeen::default();
        let color_of = |interval: &Interval, colors: &mut FirstSeen| match config.color_by {
            Some(column) => palette
                .color(colors.index_of(interval.field(column)))
                .to_string(),
            None => palette.single_color.clone(),
        };

        let mut chart = if config.by_day {
            by_day_layout(&intervals, |i| color_of(i, &mut colors))
        } else {
            timeline_layout(&intervals, tz, |i| color_of(i, &mut colors))
        };

        if config.show_legend && config.color_by.is_some() {
            chart.legend = colors
                .keys
                .iter()
                .enumerate()
                .map(|(i, key)| LegendEntry {
                    label: key.clone(),
                    color: palette.color(i).to_string(),
                })
                .collect();
        }
        chart.title = config.title.clone();
        chart.show_labels = config.show_labels;
        chart.width = config.pixel_width();
        chart.height = config.pixel_height();

        debug!(
            rows = chart.rows.len(),
            bars = chart.bars.len(),
            mode = ?chart.mode,
            "assembled chart"
        );
        Ok(chart)
    }

    /// Column the legend describes, for a legend heading
    pub fn legend_title(config: &ChartConfig) -> Option<&'static str> {
        config.color_by.map(Column::name)
    }
}

fn timeline_layout(
    intervals: &[Interval],
    tz: Tz,
    mut color_of: impl FnMut(&Interval) -> String,
) -> Chart {
    let origin = intervals[0].start;
    let last_end = intervals
        .iter()
        .map(|i| i.end)
        .max()
        .unwrap_or(origin);
    let offset = |t: DateTime<Tz>| (t - origin).num_seconds() as f64;

    let mut rows = FirstSeen::default();
    let bars = intervals
        .iter()
        .map(|i| Bar {
            row: rows.index_of(&i.description),
            start: offset(i.start),
            end: offset(i.end),
            color: color_of(i),
            label: format_duration(i.duration()),
        })
        .collect();

    Chart {
        title: None,
        mode: AxisMode::Timeline,
        rows: rows.keys,
        bars,
        x_min: 0.0,
        x_max: offset(last_end).max(1.0),
        ticks: timeline_ticks(origin, last_end, &tz),
        legend: Vec::new(),
        show_labels: true,
        width: 0,
        height: 0,
    }
}

fn by_day_layout(intervals: &[Interval], mut color_of: impl FnMut(&Interval) -> String) -> Chart {
    let dates: Vec<NaiveDate> = intervals
        .iter()
        .map(|i| i.start.date_naive())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let bars = intervals
        .iter()
        .map(|i| {
            let start = i.start.num_seconds_from_midnight() as f64;
            let end = if i.end.date_naive() > i.start.date_naive() {
                SECONDS_PER_DAY
            } else {
                i.end.num_seconds_from_midnight() as f64
            };
            Bar {
                row: dates.binary_search(&i.start.date_naive()).unwrap_or(0),
                start,
                // Wall clock can run backwards across a DST fold
                end: end.max(start),
                color: color_of(i),
                label: i.description.clone(),
            }
        })
        .collect();

    let ticks = (0..=12)
        .map(|n| Tick {
            at: (n * 2 * 3600) as f64,
            label: format!("{:02}:00", n * 2),
        })
        .collect();

    Chart {
        title: None,
        mode: AxisMode::TimeOfDay,
        rows: dates
            .iter()
            .map(|d| d.format("%a %Y-%m-%d").to_string())
            .collect(),
        bars,
        x_min: 0.0,
        x_max: SECONDS_PER_DAY,
        ticks,
        legend: Vec::new(),
        show_labels: true,
        width: 0,
        height: 0,
    }
}

/// Ticks at local hour or day boundaries, spaced by the chart span
fn timeline_ticks(origin: DateTime<Tz>, end: DateTime<Tz>, tz: &Tz) -> Vec<Tick> {
    let span = end - origin;
    let offset = |t: DateTime<Tz>| (t - origin).num_seconds() as f64;

    let hours = if span <= Duration::days(1) {
        Some(1)
    } else if span <= Duration::days(3) {
        Some(6)
    } else {
        None
    };

    let mut ticks = Vec::new();
    match hours {
        Some(step) => {
            let mut t = start_of_day(origin.date_naive(), tz);
            while t <= end {
                if t >= origin {
                    let label = if t.hour() == 0 && t.minute() == 0 {
                        t.format("%b %d").to_string()
                    } else {
                        t.format("%H:%M").to_string()
                    };
                    ticks.push(Tick {
                        at: offset(t),
                        label,
                    });
                }
                t += Duration::hours(step);
            }
        }
        None => {
            let step_days = if span <= Duration::days(31) {
                1
            } else if span <= Duration::days(180) {
                7
            } else {
                30
            };
            let mut date = origin.date_naive();
            loop {
                let t = start_of_day(date, tz);
                if t > end {
                    break;
                }
                if t >= origin {
                    ticks.push(Tick {
                        at: offset(t),
                        label: t.format("%b %d").to_string(),
                    });
                }
                match date.checked_add_signed(Duration::days(step_days)) {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }
    }
    ticks
}

/// Compact duration text such as `45m`, `2h05` or `3d 4h`
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h{:02}", minutes / 60, minutes % 60)
    } else {
        format!("{}d {}h", minutes / (24 * 60), (minutes % (24 * 60)) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;
    use pretty_assertions::assert_eq;

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Tz> {
        UTC.with_ymd_and_hms(2024, 1, d, h, m, 0).unwrap()
    }

    fn config() -> ChartConfig {
        ChartConfig::new().timezone(UTC)
    }

    fn sample() -> Vec<Interval> {
        vec![
            Interval::new(utc(1, 9, 0), utc(1, 10, 0))
                .description("Email")
                .project("admin"),
            Interval::new(utc(1, 10, 0), utc(1, 12, 30))
                .description("Code")
                .project("dev"),
            Interval::new(utc(1, 14, 0), utc(1, 15, 0))
                .description("Email")
                .project("admin"),
        ]
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            Chart::assemble(&[], &config()),
            Err(RenderError::InvalidData(_))
        ));
    }

    #[test]
    fn timeline_rows_follow_first_appearance() {
        let chart = Chart::assemble(&sample(), &config()).unwrap();
        assert_eq!(chart.mode, AxisMode::Timeline);
        assert_eq!(chart.rows, vec!["Email", "Code"]);
        let rows: Vec<usize> = chart.bars.iter().map(|b| b.row).collect();
        assert_eq!(rows, vec![0, 1, 0]);
    }

    #[test]
    fn timeline_offsets_are_seconds_from_first_start() {
        let chart = Chart::assemble(&sample(), &config()).unwrap();
        assert_eq!(chart.bars[0].start, 0.0);
        assert_eq!(chart.bars[1].start, 3600.0);
        assert_eq!(chart.bars[1].end, 3.5 * 3600.0);
        assert_eq!(chart.x_max, 6.0 * 3600.0);
        assert_eq!(chart.bars[1].label, "2h30");
    }

    #[test]
    fn colors_and_legend_follow_color_column() {
        let chart = Chart::assemble(&sample(), &config()).unwrap();
        let palette = Palette::default();
        assert_eq!(chart.bars[0].color, palette.color(0));
        assert_eq!(chart.bars[1].color, palette.color(1));
        assert_eq!(chart.bars[2].color, palette.color(0));
        assert_eq!(
            chart.legend,
            vec![
                LegendEntry {
                    label: "admin".into(),
                    color: palette.color(0).into()
                },
                LegendEntry {
                    label: "dev".into(),
                    color: palette.color(1).into()
                },
            ]
        );
    }

    #[test]
    fn no_color_column_means_single_color_and_no_legend() {
        let chart = Chart::assemble(&sample(), &config().color_by(None)).unwrap();
        let palette = Palette::default();
        assert!(chart.bars.iter().all(|b| b.color == palette.single_color));
        assert!(chart.legend.is_empty());
    }

    #[test]
    fn hidden_legend() {
        let chart = Chart::assemble(&sample(), &config().hide_legend()).unwrap();
        assert!(chart.legend.is_empty());
    }

    #[test]
    fn config_flows_into_chart() {
        let config = config().title("January").hide_labels().size(8.0, 4.5).dpi(50);
        let chart = Chart::assemble(&sample(), &config).unwrap();
        assert_eq!(chart.title.as_deref(), Some("January"));
        assert!(!chart.show_labels);
        assert_eq!((chart.width, chart.height), (400, 225));
        assert_eq!(Chart::legend_title(&config), Some("project"));
    }

    #[test]
    fn by_day_rows_are_dates() {
        let intervals = vec![
            Interval::new(utc(2, 8, 0), utc(2, 9, 0)).description("b"),
            Interval::new(utc(1, 22, 0), utc(1, 23, 59)).description("a"),
        ];
        let chart = Chart::assemble(&intervals, &config().by_day(true)).unwrap();
        assert_eq!(chart.mode, AxisMode::TimeOfDay);
        assert_eq!(chart.rows, vec!["Mon 2024-01-01", "Tue 2024-01-02"]);
        assert_eq!(chart.bars[0].row, 0);
        assert_eq!(chart.bars[0].start, 22.0 * 3600.0);
        assert_eq!(chart.bars[0].label, "a");
        assert_eq!(chart.bars[1].row, 1);
        assert_eq!(chart.x_max, SECONDS_PER_DAY);
        assert_eq!(chart.ticks.len(), 13);
        assert_eq!(chart.ticks[12].label, "24:00");
    }

    #[test]
    fn by_day_bar_ending_at_midnight_fills_the_day() {
        let intervals = vec![Interval::new(utc(1, 23, 0), utc(2, 0, 0))];
        let chart = Chart::assemble(&intervals, &config().by_day(true)).unwrap();
        assert_eq!(chart.rows.len(), 1);
        assert_eq!(chart.bars[0].end, SECONDS_PER_DAY);
    }

    #[test]
    fn short_span_gets_hourly_ticks() {
        let ticks = timeline_ticks(utc(1, 9, 30), utc(1, 12, 0), &UTC);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["10:00", "11:00", "12:00"]);
        assert_eq!(ticks[0].at, 1800.0);
    }

    #[test]
    fn midnight_ticks_show_the_date() {
        let ticks = timeline_ticks(utc(1, 20, 0), utc(2, 23, 0), &UTC);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 02", "06:00", "12:00", "18:00"]);
    }

    #[test]
    fn long_span_gets_daily_ticks() {
        let ticks = timeline_ticks(utc(1, 0, 0), utc(10, 0, 0), &UTC);
        assert_eq!(ticks.len(), 10);
        assert_eq!(ticks[0].label, "Jan 01");
        assert_eq!(ticks[9].label, "Jan 10");
    }

    #[test]
    fn very_long_span_gets_weekly_ticks() {
        let end = UTC.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let ticks = timeline_ticks(utc(1, 0, 0), end, &UTC);
        assert_eq!(ticks[1].at - ticks[0].at, 7.0 * SECONDS_PER_DAY);
    }

    #[test]
    fn duration_text() {
        assert_eq!(format_duration(Duration::minutes(45)), "45m");
        assert_eq!(format_duration(Duration::minutes(125)), "2h05");
        assert_eq!(format_duration(Duration::hours(76)), "3d 4h");
        assert_eq!(format_duration(Duration::seconds(-5)), "0m");
    }
}
