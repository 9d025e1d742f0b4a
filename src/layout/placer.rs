//! Chord marker placement
//!
//! Places one marker per chord annotation on top of an existing text layout.
//! Markers on the same visual line are pushed right so they never overlap.

use super::types::{LineGeometryProvider, MarkerConfig, MarkerMetrics, Placement};
use crate::model::ChordAnnotation;

pub struct LayoutPlacer {
    config: MarkerConfig,
}

impl LayoutPlacer {
    pub fn new(config: MarkerConfig) -> Self {
        Self { config }
    }

    /// Compute a placement for every annotation, in document order.
    ///
    /// - `x` is the anchor's left edge, or the previous marker's right edge
    ///   plus the gap when that is further right on the same line.
    /// - Inline markers sit on the text: `y = bottom - marker height`.
    /// - Raised markers hang from the line top:
    ///   `y = top + raise_factor * marker height`.
    pub fn place(
        &self,
        annotations: &[ChordAnnotation],
        layout: &dyn LineGeometryProvider,
        metrics: &dyn MarkerMetrics,
    ) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(annotations.len());
        let mut current_line: Option<usize> = None;
        let mut line_edge = 0.0f32;

        for (index, annotation) in annotations.iter().enumerate() {
            let line = layout.line_for_offset(annotation.start);
            if current_line != Some(line) {
                current_line = Some(line);
                line_edge = 0.0;
            }

            let bbox = layout.bounding_box_for_offset(annotation.start);
            let size = metrics.marker_size(annotation.kind.chord_name());

            let x = bbox.left.max(line_edge);
            let y = if annotation.kind.is_inline() {
                bbox.bottom - size.height
            } else {
                bbox.top + self.config.raise_factor * size.height
            };

            line_edge = x + size.width + self.config.gap;
            placements.push(Placement {
                annotation_index: index,
                x,
                y,
                width: size.width,
                height: size.height,
            });
        }

        placements
    }
}

impl Default for LayoutPlacer {
    fn default() -> Self {
        Self::new(MarkerConfig::default())
    }
}

/// Place chord markers with the given marker settings.
pub fn place(
    annotations: &[ChordAnnotation],
    layout: &dyn LineGeometryProvider,
    metrics: &dyn MarkerMetrics,
    config: &MarkerConfig,
) -> Vec<Placement> {
    LayoutPlacer::new(*config).place(annotations, layout, metrics)
}
