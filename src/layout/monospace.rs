//! Fixed-cell text layout
//!
//! A [`LineGeometryProvider`] for monospace output where every character
//! occupies one cell and lines break only at `\n`. Used by
//! [`crate::render`] when marker placement is enabled, and as a reference
//! layout in tests.

use super::types::{BoundingBox, LineGeometryProvider, MarkerConfig, MarkerMetrics, MarkerSize};

pub struct MonospaceLayout<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
    cell_width: f32,
    line_height: f32,
}

impl<'a> MonospaceLayout<'a> {
    pub fn new(text: &'a str, cell_width: f32, line_height: f32) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            text,
            line_starts,
            cell_width,
            line_height,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Column of `offset` within its line, counted in characters.
    pub fn column_for_offset(&self, offset: usize) -> usize {
        let start = self.line_starts[self.line_for_offset(offset)];
        self.text[start..]
            .char_indices()
            .take_while(|(i, _)| start + i < offset)
            .count()
    }
}

impl LineGeometryProvider for MonospaceLayout<'_> {
    fn line_for_offset(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    fn bounding_box_for_offset(&self, offset: usize) -> BoundingBox {
        let line = self.line_for_offset(offset) as f32;
        let column = self.column_for_offset(offset) as f32;
        BoundingBox {
            left: column * self.cell_width,
            top: line * self.line_height,
            right: (column + 1.0) * self.cell_width,
            bottom: (line + 1.0) * self.line_height,
        }
    }
}

/// Markers as wide as their label in fixed-width cells, plus padding.
#[derive(Debug, Clone, Copy)]
pub struct FixedMarkerMetrics {
    pub char_width: f32,
    pub height: f32,
    pub padding: f32,
}

impl FixedMarkerMetrics {
    /// Metrics for labels set in `char_width` cells, sized by `config`.
    pub fn from_config(config: &MarkerConfig, char_width: f32) -> Self {
        Self {
            char_width,
            height: config.height,
            padding: config.padding,
        }
    }
}

impl MarkerMetrics for FixedMarkerMetrics {
    fn marker_size(&self, label: &str) -> MarkerSize {
        MarkerSize {
            width: label.chars().count() as f32 * self.char_width + 2.0 * self.padding,
            height: self.height,
        }
    }
}
