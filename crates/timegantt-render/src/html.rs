//! Standalone HTML page embedding the SVG chart

use crate::{Chart, RenderError, Renderer, SvgRenderer};

/// HTML page renderer, wrapping the SVG renderer
#[derive(Clone, Debug, Default)]
pub struct HtmlRenderer {
    pub svg: SvgRenderer,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_svg(svg: SvgRenderer) -> Self {
        Self { svg }
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(&self, chart: &Chart) -> Result<String, RenderError> {
        let svg = self.svg.render(chart)?;
        let title = chart.title.as_deref().unwrap_or("Time tracking");

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Gantt Chart</title>
    <style>
        body {{ margin: 0; padding: 16px; background: {background}; }}
        .chart {{ overflow-x: auto; }}
    </style>
</head>
<body>
    <div class="chart">
{svg}
    </div>
</body>
</html>
"#,
            title = html_escape(title),
            background = self.svg.background_color,
            svg = svg,
        ))
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
