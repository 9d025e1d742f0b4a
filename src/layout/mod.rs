//! # Chord Layout Module
//!
//! Positions chord markers over text that a rendering surface has already
//! laid out.
//!
//! ## Purpose
//! The annotation pass attaches each chord to one character of the output
//! text. Once the renderer has shaped that text, this module turns those
//! character offsets into pixel positions for the chord buttons:
//! 1. **Raised chords** hang over the lyric character they are anchored to
//! 2. **Inline chords** sit on the text baseline as floating buttons
//! 3. **Collisions** on the same visual line are resolved by shifting right
//!
//! ## Sub-modules
//! - `types` - BoundingBox, Placement, MarkerConfig and the provider traits
//! - `placer` - The placement pass
//! - `monospace` - Fixed-cell layout provider and marker metrics
//!
//! ## Example
//! ```rust
//! use tabtext::annotate;
//! use tabtext::layout::{place, FixedMarkerMetrics, MarkerConfig, MonospaceLayout};
//!
//! let result = annotate("[tab][ch]C[/ch][ch]G[/ch]x[/tab]");
//! let content = &result.blocks[0].content;
//! let layout = MonospaceLayout::new(&content.text, 10.0, 40.0);
//! let metrics = FixedMarkerMetrics { char_width: 10.0, height: 20.0, padding: 2.0 };
//!
//! let placements = place(&content.chords, &layout, &metrics, &MarkerConfig::default());
//! assert_eq!(placements.len(), 2);
//! assert!(placements[1].x >= placements[0].right());
//! ```

mod monospace;
mod placer;
mod types;


pub use monospace::{FixedMarkerMetrics, MonospaceLayout};
pub use placer::{place, LayoutPlacer};
pub use types::{
    BoundingBox, GridConfig, LineGeometryProvider, MarkerConfig, MarkerMetrics, MarkerSize,
    Placement,
};
