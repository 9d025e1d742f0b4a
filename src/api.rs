//! # Public API
//!
//! Top-level entry points that run the whole engine on a document.
//!
//! ## Functions
//!
//! - [`render()`] - Annotate with transposition, optional wrapping and marker
//!   placement
//! - [`render_text()`] - Monospace chord-over-lyric view of a rendered document
//! - [`crate::annotate()`] - Annotation only, with default options
//!
//! ## Typical Usage
//!
//! ```rust
//! use tabtext::{render, render_text, EngineConfig};
//!
//! let markup = "[tab][ch]C[/ch]   [ch]Am[/ch]\nThat David played[/tab]";
//! let config = EngineConfig { transpose: 2, ..EngineConfig::default() };
//!
//! let rendered = render(markup, &config);
//! assert_eq!(rendered.chords.sorted(), vec!["Bm", "D"]);
//! assert_eq!(render_text(&rendered), "D  Bm\nThat David played");
//! ```

use crate::annotate::Annotator;
use crate::config::EngineConfig;
use crate::error::TabWarning;
use crate::layout::{FixedMarkerMetrics, LayoutPlacer, MonospaceLayout, Placement};
use crate::model::{AnnotatedText, AnnotationKind, ChordSet, ContentBlock};
use crate::scanner::{chord_tags, scan_tab_blocks};
use crate::transpose::rewrite_chord_names;
use crate::wrap::LineWrapEngine;
use serde::Serialize;

/// Fixed-width lines produced for one tab block in legacy mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedBlock {
    /// Index of the tab block in [`RenderedTab::blocks`].
    pub block_index: usize,
    /// Alternating chord/lyric rows, chord markup still in place.
    pub lines: Vec<String>,
}

/// Chord marker positions for one block, on the configured grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPlacements {
    pub block_index: usize,
    /// One entry per chord annotation of the block, in the same order.
    pub placements: Vec<Placement>,
}

/// A fully processed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedTab {
    pub blocks: Vec<ContentBlock>,
    pub chords: ChordSet,
    pub warnings: Vec<TabWarning>,
    /// Present only when legacy wrapping is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<Vec<WrappedBlock>>,
    /// Present only when marker placement is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placements: Option<Vec<BlockPlacements>>,
}

impl RenderedTab {
    pub fn wrapped_lines(&self, block_index: usize) -> Option<&[String]> {
        self.wrapped
            .as_ref()?
            .iter()
            .find(|w| w.block_index == block_index)
            .map(|w| w.lines.as_slice())
    }
}

/// Run the full pipeline on a document.
///
/// # Pipeline
/// 1. Annotate, transposing every chord by `config.transpose` half steps
/// 2. With `config.legacy_wrap`, wrap each transposed tab block at
///    `config.wrap_width`
/// 3. With `config.place_markers`, place chord markers over every block on
///    the `config.grid` cell grid
///
/// Malformed input never fails; problems are collected in
/// [`RenderedTab::warnings`]. Warning offsets refer to `markup` as given.
pub fn render(markup: &str, config: &EngineConfig) -> RenderedTab {
    let annotated = Annotator::new()
        .detect_links(config.detect_links)
        .transpose(config.transpose)
        .annotate(markup);
    let mut warnings = annotated.warnings;

    let wrapped = if config.legacy_wrap {
        let (wrapped, wrap_warnings) = wrap_tab_blocks(markup, &annotated.blocks, config);
        warnings.extend(wrap_warnings);
        Some(wrapped)
    } else {
        None
    };

    let placements = config
        .place_markers
        .then(|| place_blocks(&annotated.blocks, config));

    RenderedTab {
        blocks: annotated.blocks,
        chords: annotated.chords,
        warnings,
        wrapped,
        placements,
    }
}

fn wrap_tab_blocks(
    markup: &str,
    blocks: &[ContentBlock],
    config: &EngineConfig,
) -> (Vec<WrappedBlock>, Vec<TabWarning>) {
    // Unknown roots were already reported by the annotation pass.
    let (markup, _) = rewrite_chord_names(markup, config.transpose);
    let mut engine = LineWrapEngine::new(config.wrap_width);
    let (regions, _) = scan_tab_blocks(&markup);
    let tab_indices = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_tab_block)
        .map(|(i, _)| i);

    // Annotation skips empty bodies, so skip them here too to stay in step.
    let bodies = regions
        .iter()
        .filter(|r| r.body_end > r.body_start)
        .map(|r| &markup[r.body_start..r.body_end]);

    let wrapped = tab_indices
        .zip(bodies)
        .map(|(block_index, body)| WrappedBlock {
            block_index,
            lines: engine.wrap_block(body),
        })
        .collect();
    (wrapped, engine.into_warnings())
}

fn place_blocks(blocks: &[ContentBlock], config: &EngineConfig) -> Vec<BlockPlacements> {
    let placer = LayoutPlacer::new(config.marker);
    let metrics = FixedMarkerMetrics::from_config(&config.marker, config.grid.cell_width);

    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.content.chords.is_empty())
        .map(|(block_index, block)| {
            let layout = MonospaceLayout::new(
                &block.content.text,
                config.grid.cell_width,
                config.grid.line_height,
            );
            BlockPlacements {
                block_index,
                placements: placer.place(&block.content.chords, &layout, &metrics),
            }
        })
        .collect()
}

/// Monospace text view of a rendered document.
///
/// Plain blocks are printed as written with inline chords shown as `[Name]`.
/// In tab blocks raised chords go on their own line above the text they
/// belong to. When legacy wrapping was requested the wrapped rows are printed
/// instead, with chord markup reduced to the chord names.
pub fn render_text(rendered: &RenderedTab) -> String {
    let mut out = String::new();

    for (index, block) in rendered.blocks.iter().enumerate() {
        if !block.is_tab_block {
            out.push_str(&inline_text(&block.content));
            continue;
        }
        match rendered.wrapped_lines(index) {
            Some(lines) => {
                let rows: Vec<String> = lines.iter().map(|l| chord_names_only(l)).collect();
                out.push_str(&rows.join("\n"));
            }
            None => out.push_str(&tab_text(&block.content)),
        }
    }

    out
}

fn inline_text(content: &AnnotatedText) -> String {
    let text = &content.text;
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for chord in &content.chords {
        out.push_str(&text[pos..chord.start]);
        out.push('[');
        out.push_str(chord.kind.chord_name());
        out.push(']');
        pos = chord.end;
    }
    out.push_str(&text[pos..]);
    out
}

fn tab_text(content: &AnnotatedText) -> String {
    let text = &content.text;
    let mut rows = Vec::new();
    let mut line_start = 0;

    loop {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);

        let mut chord_row = String::new();
        let mut lyric_row = String::new();
        let mut pos = line_start;

        // A raised chord anchored to the line break belongs to this line.
        for chord in content.chords_in(line_start, line_end + 1) {
            lyric_row.push_str(&text[pos..chord.start.min(line_end)]);
            match &chord.kind {
                AnnotationKind::Inline(name) => {
                    lyric_row.push('[');
                    lyric_row.push_str(name);
                    lyric_row.push(']');
                    pos = chord.end;
                }
                AnnotationKind::Raised(name) => {
                    let column = lyric_row.chars().count();
                    place_name(&mut chord_row, column, name);
                    pos = chord.start.min(line_end);
                }
            }
        }
        if pos < line_end {
            lyric_row.push_str(&text[pos..line_end]);
        }

        if !chord_row.is_empty() {
            rows.push(chord_row);
            if !lyric_row.trim().is_empty() {
                rows.push(lyric_row);
            }
        } else {
            rows.push(lyric_row);
        }

        if line_end >= text.len() {
            break;
        }
        line_start = line_end + 1;
    }

    rows.join("\n")
}

fn place_name(row: &mut String, column: usize, name: &str) {
    let len = row.chars().count();
    if len < column {
        row.extend(std::iter::repeat(' ').take(column - len));
    } else if len > 0 {
        row.push(' ');
    }
    row.push_str(name);
}

fn chord_names_only(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut consumed = 0;
    for tag in chord_tags(line) {
        out.push_str(&line[consumed..tag.start]);
        out.push_str(&tag.chord_name);
        consumed = tag.end;
    }
    out.push_str(&line[consumed..]);
    out
}
