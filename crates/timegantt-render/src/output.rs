//! Output files
//!
//! Charts are written to a temporary file next to the target and renamed
//! over it once complete, so a failed run never leaves a partial image.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::{Chart, HtmlRenderer, RenderError, Renderer, SvgRenderer};

/// File formats the chart can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    /// Standalone page embedding the SVG
    Html,
}

impl OutputFormat {
    /// Detect the format from the output path's extension
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        if path.as_os_str() == "-" {
            return Err(RenderError::UnsupportedOutput(
                "writing to standard output is not supported, pass a file path".into(),
            ));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("svg") => Ok(Self::Svg),
            Some("html" | "htm") => Ok(Self::Html),
            _ => Err(RenderError::UnsupportedOutput(format!(
                "cannot tell the image format of {} (use .svg or .html)",
                path.display()
            ))),
        }
    }

    pub fn render(self, chart: &Chart, svg: &SvgRenderer) -> Result<String, RenderError> {
        match self {
            Self::Svg => svg.render(chart),
            Self::Html => HtmlRenderer::with_svg(svg.clone()).render(chart),
        }
    }
}

/// Write `contents` to `path` through a temporary file and a rename
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| RenderError::Io(e.error))?;
    Ok(())
}

/// Render the chart in the format implied by `path` and write it
pub fn render_to_file(
    chart: &Chart,
    path: &Path,
    svg: &SvgRenderer,
) -> Result<OutputFormat, RenderError> {
    let format = OutputFormat::from_path(path)?;
    let rendered = format.render(chart, svg)?;
    write_atomic(path, rendered.as_bytes())?;
    info!(path = %path.display(), ?format, bytes = rendered.len(), "wrote chart");
    Ok(format)
}
