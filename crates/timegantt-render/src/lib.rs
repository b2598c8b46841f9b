//! # timegantt-render
//!
//! Chart layout and rendering backends for timegantt.
//!
//! This crate provides:
//! - Chart assembly from intervals (`Chart::assemble`)
//! - SVG Gantt chart rendering
//! - Standalone HTML pages embedding the SVG chart
//! - Atomic output files
//!
//! ## Example
//!
//! ```rust,ignore
//! use timegantt_core::ChartConfig;
//! use timegantt_render::{Chart, Renderer, SvgRenderer};
//!
//! let chart = Chart::assemble(&intervals, &ChartConfig::default())?;
//! let svg = SvgRenderer::default().render(&chart)?;
//! ```

pub mod html;
pub mod labels;
pub mod layout;
pub mod output;
pub mod palette;

pub use html::HtmlRenderer;
pub use layout::{AxisMode, Bar, Chart, LegendEntry, Tick};
pub use output::{render_to_file, write_atomic, OutputFormat};
pub use palette::Palette;

use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;
use thiserror::Error;

use labels::{assign_lanes, text_width, LabelBox};

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported output: {0}")]
    UnsupportedOutput(String),
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render an assembled chart to the output format
    fn render(&self, chart: &Chart) -> Result<Self::Output, RenderError>;
}

/// SVG Gantt chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Padding around the chart
    pub padding: u32,
    /// Height reserved for the title, when there is one
    pub title_height: u32,
    /// Height reserved below the plot for tick labels
    pub axis_height: u32,
    /// Width reserved on the right for the legend, when there is one
    pub legend_width: u32,
    /// Upper bound for the row label column
    pub max_label_width: u32,
    /// Vertical lanes available to bar labels in each row
    pub label_lanes: usize,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            padding: 20,
            title_height: 30,
            axis_height: 30,
            legend_width: 180,
            max_label_width: 240,
            label_lanes: 3,
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

/// Plot area in pixels and the data range it shows
#[derive(Clone, Copy, Debug)]
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    row_height: f64,
    label_width: f64,
    x_min: f64,
    x_max: f64,
}

impl Frame {
    /// Convert a data x coordinate to a pixel position
    fn x(&self, value: f64) -> f64 {
        let span = (self.x_max - self.x_min).max(1.0);
        self.left + (value - self.x_min) / span * (self.right - self.left)
    }

    fn row_top(&self, row: usize) -> f64 {
        self.top + row as f64 * self.row_height
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure font size
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Configure the number of label lanes per row
    pub fn label_lanes(mut self, lanes: usize) -> Self {
        self.label_lanes = lanes;
        self
    }

    fn frame(&self, chart: &Chart) -> Result<Frame, RenderError> {
        let longest = chart.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let label_width =
            (text_width(longest, self.font_size) + 16.0).min(self.max_label_width as f64);
        let legend_width = if chart.legend.is_empty() {
            0.0
        } else {
            self.legend_width as f64
        };
        let title_height = if chart.title.is_some() {
            self.title_height as f64
        } else {
            0.0
        };
        let padding = self.padding as f64;

        let left = padding + label_width;
        let right = chart.width as f64 - padding - legend_width;
        let top = padding + title_height;
        let bottom = chart.height as f64 - padding - self.axis_height as f64;
        if right - left < 1.0 || bottom - top < 1.0 {
            return Err(RenderError::InvalidData(format!(
                "Image of {}x{} pixels is too small for the chart",
                chart.width, chart.height
            )));
        }

        Ok(Frame {
            left,
            right,
            top,
            bottom,
            row_height: (bottom - top) / chart.rows.len().max(1) as f64,
            label_width,
            x_min: chart.x_min,
            x_max: chart.x_max,
        })
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64, size: u32) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", size)
            .set("fill", self.text_color.as_str())
    }

    /// Render row separators and tick lines
    fn render_grid(&self, chart: &Chart, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "grid");

        for i in 0..=chart.rows.len() {
            let y = frame.row_top(i);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", frame.right)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        for tick in &chart.ticks {
            let x = frame.x(tick.at);
            let line = Line::new()
                .set("x1", x)
                .set("y1", frame.top)
                .set("x2", x)
                .set("y2", frame.bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        group
    }

    /// Render tick labels under the plot
    fn render_axis(&self, chart: &Chart, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "axis");

        let baseline = Line::new()
            .set("x1", frame.left)
            .set("y1", frame.bottom)
            .set("x2", frame.right)
            .set("y2", frame.bottom)
            .set("stroke", self.text_color.as_str())
            .set("stroke-width", 1);
        group = group.add(baseline);

        for tick in &chart.ticks {
            let x = frame.x(tick.at);
            let mark = Line::new()
                .set("x1", x)
                .set("y1", frame.bottom)
                .set("x2", x)
                .set("y2", frame.bottom + 5.0)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(mark);

            let label = self
                .text(
                    tick.label.as_str(),
                    x,
                    frame.bottom + 18.0,
                    self.font_size.saturating_sub(1),
                )
                .set("text-anchor", "middle");
            group = group.add(label);
        }

        group
    }

    /// Render the row label column
    fn render_rows(&self, chart: &Chart, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "rows");
        let max_chars = ((frame.label_width - 16.0) / text_width(1, self.font_size)).max(4.0);

        for (row, name) in chart.rows.iter().enumerate() {
            let y = frame.row_top(row) + frame.row_height / 2.0 + 4.0;
            let label = self.text(
                truncate(name, max_chars as usize),
                self.padding as f64 + 8.0,
                y,
                self.font_size,
            );
            group = group.add(label);
        }

        group
    }

    /// Render one rectangle per bar
    fn render_bars(&self, chart: &Chart, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "bars");
        let bar_height = frame.row_height * 0.6;

        for bar in &chart.bars {
            let x_start = frame.x(bar.start);
            let width = (frame.x(bar.end) - x_start).max(1.0); // Minimum width for visibility
            let y = frame.row_top(bar.row) + (frame.row_height - bar_height) / 2.0;

            let rect = Rectangle::new()
                .set("x", x_start)
                .set("y", y)
                .set("width", width)
                .set("height", bar_height)
                .set("rx", 2)
                .set("ry", 2)
                .set("fill", bar.color.as_str());
            group = group.add(rect);
        }

        group
    }

    /// Render bar labels in lanes that keep them apart
    fn render_labels(&self, chart: &Chart, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "labels");
        let font_size = self.font_size.saturating_sub(2).max(6);

        let boxes: Vec<LabelBox> = chart
            .bars
            .iter()
            .map(|bar| LabelBox {
                row: bar.row,
                x: frame.x(bar.start) + 2.0,
                width: text_width(bar.label.chars().count(), font_size),
            })
            .collect();
        let lanes = assign_lanes(&boxes, self.label_lanes.max(1));
        let lane_height = frame.row_height / (self.label_lanes.max(1) + 1) as f64;

        for ((bar, label_box), lane) in chart.bars.iter().zip(&boxes).zip(lanes) {
            let Some(lane) = lane else { continue };
            let y = frame.row_top(bar.row) + lane_height * (lane + 1) as f64 + 3.0;
            group = group.add(self.text(bar.label.as_str(), label_box.x, y, font_size));
        }

        group
    }

    /// Render the legend column on the right
    fn render_legend(&self, chart: &Chart, frame: &Frame) -> Group {
        let mut group = Group::new().set("class", "legend");
        let x = frame.right + 16.0;
        let box_size = 12.0;
        let spacing = 18.0;
        let capacity = ((frame.bottom - frame.top) / spacing).floor().max(1.0) as usize;

        let shown = if chart.legend.len() > capacity {
            capacity - 1
        } else {
            chart.legend.len()
        };

        for (i, entry) in chart.legend.iter().take(shown).enumerate() {
            let y = frame.top + spacing * (i as f64 + 1.0);
            let swatch = Rectangle::new()
                .set("x", x)
                .set("y", y - box_size + 2.0)
                .set("width", box_size)
                .set("height", box_size)
                .set("rx", 2)
                .set("fill", entry.color.as_str());
            group = group.add(swatch);
            group = group.add(self.text(
                truncate(&entry.label, 20),
                x + box_size + 5.0,
                y,
                self.font_size.saturating_sub(1),
            ));
        }

        if shown < chart.legend.len() {
            let y = frame.top + spacing * (shown as f64 + 1.0);
            let more = format!("+{} more", chart.legend.len() - shown);
            group = group.add(self.text(more, x, y, self.font_size.saturating_sub(1)));
        }

        group
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, chart: &Chart) -> Result<String, RenderError> {
        if chart.bars.is_empty() {
            return Err(RenderError::InvalidData("No intervals to render".into()));
        }

        let frame = self.frame(chart)?;
        let (width, height) = (chart.width, chart.height);

        // Create document
        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        // Background
        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        if let Some(title) = &chart.title {
            let title = self
                .text(
                    title.as_str(),
                    self.padding as f64,
                    self.padding as f64 + 15.0,
                    self.font_size + 4,
                )
                .set("font-weight", "bold");
            document = document.add(title);
        }

        document = document.add(self.render_grid(chart, &frame));
        document = document.add(self.render_rows(chart, &frame));
        document = document.add(self.render_bars(chart, &frame));
        if chart.show_labels {
            document = document.add(self.render_labels(chart, &frame));
        }
        document = document.add(self.render_axis(chart, &frame));
        if !chart.legend.is_empty() {
            document = document.add(self.render_legend(chart, &frame));
        }

        // Convert to string
        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Truncate a string with ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!(
            "{}…",
            s.chars().take(max.saturating_sub(1)).collect::<String>()
        )
    }
}
