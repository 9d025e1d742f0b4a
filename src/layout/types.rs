//! Layout type definitions
//!
//! Geometry exchanged between the chord placer and the rendering surface that
//! performs text layout.

use serde::{Deserialize, Serialize};

/// Pixel box of one laid-out character.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Pixel size of a chord marker.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MarkerSize {
    pub width: f32,
    pub height: f32,
}

/// Position of one chord marker.
///
/// # Fields
/// - `annotation_index`: index into the annotation slice given to the placer
/// - `x`, `y`: top-left corner of the marker
/// - `width`, `height`: the measured marker size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub annotation_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Marker geometry settings.
///
/// # Fields
/// - `height`: marker height used by [`super::FixedMarkerMetrics::from_config`]
/// - `padding`: horizontal space on each side of the label
/// - `gap`: minimum horizontal space between markers on one line
/// - `raise_factor`: fraction of the marker height added to the anchor's top
///   edge for raised chords
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub height: f32,
    pub padding: f32,
    pub gap: f32,
    pub raise_factor: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            height: 24.0,
            padding: 2.0,
            gap: 4.0,
            raise_factor: 0.25,
        }
    }
}

/// Cell size of the fixed-width grid used when the engine places markers
/// itself (see [`super::MonospaceLayout`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GridConfig {
    pub cell_width: f32,
    pub line_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            line_height: 48.0,
        }
    }
}

/// Text layout queries the placer needs from the rendering surface.
pub trait LineGeometryProvider {
    /// Visual line holding the character at `offset`.
    fn line_for_offset(&self, offset: usize) -> usize;

    /// Box of the character at `offset`.
    fn bounding_box_for_offset(&self, offset: usize) -> BoundingBox;
}

/// Measures the marker drawn for a chord label.
pub trait MarkerMetrics {
    fn marker_size(&self, label: &str) -> MarkerSize;
}
