use super::{OutputFormatter, ScanOutput};
use anyhow::Result;
use colored::*;
use gallery_scan_core::GalleryLayout;

/// Longest label shown in a grid cell before truncation
const MAX_LABEL_WIDTH: usize = 32;

/// Plain list, one path per line
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn format(&self, output: &ScanOutput) -> Result<String> {
        let mut text = String::new();
        for file in &output.files {
            text.push_str(file);
            text.push('\n');
        }
        Ok(text)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, output: &ScanOutput) -> Result<String> {
        let mut json = if self.pretty {
            serde_json::to_string_pretty(output)?
        } else {
            serde_json::to_string(output)?
        };
        json.push('\n');
        Ok(json)
    }
}

/// File names arranged in the gallery's fixed-column grid
pub struct GridFormatter {
    layout: GalleryLayout,
    use_color: bool,
}

impl GridFormatter {
    pub fn new(columns: usize, use_color: bool) -> gallery_scan_core::Result<Self> {
        Ok(Self {
            layout: GalleryLayout::new(columns)?,
            use_color,
        })
    }

    fn colorize(&self, text: &str) -> String {
        if self.use_color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for GridFormatter {
    fn format(&self, output: &ScanOutput) -> Result<String> {
        let tiles = self.layout.tiles(&output.files);
        let labels: Vec<String> = tiles.iter().map(|tile| truncate(&tile.label)).collect();
        let width = labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(0);

        let mut text = String::new();
        for (index, (tile, label)) in tiles.iter().zip(&labels).enumerate() {
            if tile.column > 0 {
                text.push_str("  ");
            }
            text.push_str(&self.colorize(label));

            let row_ends =
                tile.column + 1 == self.layout.columns() || index + 1 == tiles.len();
            if row_ends {
                text.push('\n');
            } else {
                // Pad outside the color codes so columns line up
                let padding = width - label.chars().count();
                text.push_str(&" ".repeat(padding));
            }
        }
        Ok(text)
    }
}

fn truncate(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_WIDTH {
        return label.to_string();
    }
    let mut short: String = label.chars().take(MAX_LABEL_WIDTH - 1).collect();
    short.push('…');
    short
}
