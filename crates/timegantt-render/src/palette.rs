//! Bar colors

/// Colors handed out to the values of the color column, in order of first
/// appearance. The list cycles when there are more values than colors.
#[derive(Clone, Debug)]
pub struct Palette {
    pub colors: Vec<String>,
    /// Color for every bar when no color column is set
    pub single_color: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::light()
    }
}

impl Palette {
    pub fn light() -> Self {
        Self {
            colors: [
                "#3498db", "#e67e22", "#2ecc71", "#e74c3c", "#9b59b6", "#8d6e63", "#f06292",
                "#95a5a6", "#c0ca33", "#1abc9c",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            single_color: "#3498db".into(),
        }
    }

    /// Color for the `index`-th distinct value
    pub fn color(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return &self.single_color;
        }
        &self.colors[index % self.colors.len()]
    }
}
