//! # Content Annotation
//!
//! Turns raw tab markup into a sequence of [`ContentBlock`]s with chord and
//! link annotations.
//!
//! ## Pipeline
//! 1. Split the document on `[tab]` regions. Text between regions becomes
//!    plain blocks; region bodies become tab blocks. Empty pieces are dropped.
//! 2. In each block, every chord tag is removed and its chord attached to a
//!    single anchor character:
//!    - tab block, followed by a real character: that character, `Raised`
//!    - plain block, end of block, or another chord tag right after: an
//!      inserted space, `Inline`
//! 3. Links are detected on the resulting block text.
//!
//! Malformed tags stay in the text literally (see [`crate::scanner`]).
//!
//! ## Transposition
//! With [`Annotator::transpose`] set, chord names are transposed as they are
//! collected. The output text does not contain chord names, so its offsets
//! and every warning offset refer to the markup as given. Names with no known
//! root are kept and reported once each as [`TabWarning::UnknownChordRoot`].
//!
//! ## Example
//! ```rust
//! use tabtext::annotate;
//!
//! let result = annotate("[tab][ch]C[/ch]   [ch]Am[/ch]\nThat David played[/tab]");
//! assert_eq!(result.blocks.len(), 1);
//! assert!(result.chords.contains("C") && result.chords.contains("Am"));
//! ```

use crate::error::TabWarning;
use crate::links::find_links;
use crate::model::{AnnotatedText, Annotated, AnnotationKind, ChordAnnotation, ChordSet, ContentBlock};
use crate::scanner::{scan_tab_blocks, starts_chord_tag, TagScanner};
use crate::transpose::try_transpose;

/// Annotation pass with its options.
#[derive(Debug, Clone)]
pub struct Annotator {
    pub detect_links: bool,
    /// Half steps applied to every chord name.
    pub transpose: i32,
}

impl Default for Annotator {
    fn default() -> Self {
        Self {
            detect_links: true,
            transpose: 0,
        }
    }
}

impl Annotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect_links(mut self, detect: bool) -> Self {
        self.detect_links = detect;
        self
    }

    pub fn transpose(mut self, half_steps: i32) -> Self {
        self.transpose = half_steps;
        self
    }

    pub fn annotate(&self, markup: &str) -> Annotated {
        let (regions, mut warnings) = scan_tab_blocks(markup);
        let mut chords = ChordSet::new();
        let mut blocks = Vec::with_capacity(regions.len() * 2 + 1);
        let mut pos = 0;

        for region in &regions {
            if region.start > pos {
                blocks.push(self.annotate_block(
                    &markup[pos..region.start],
                    pos,
                    false,
                    &mut chords,
                    &mut warnings,
                ));
            }
            if region.body_end > region.body_start {
                blocks.push(self.annotate_block(
                    &markup[region.body_start..region.body_end],
                    region.body_start,
                    true,
                    &mut chords,
                    &mut warnings,
                ));
            }
            pos = region.end;
        }
        if pos < markup.len() {
            blocks.push(self.annotate_block(
                &markup[pos..],
                pos,
                false,
                &mut chords,
                &mut warnings,
            ));
        }

        log::debug!(
            "annotated {} blocks, {} distinct chords, {} warnings",
            blocks.len(),
            chords.len(),
            warnings.len()
        );

        Annotated {
            blocks,
            chords,
            warnings,
        }
    }

    fn annotate_block(
        &self,
        source: &str,
        base_offset: usize,
        is_tab_block: bool,
        chords: &mut ChordSet,
        warnings: &mut Vec<TabWarning>,
    ) -> ContentBlock {
        let inline = !is_tab_block;
        let mut scanner = TagScanner::with_base_offset(source, base_offset);
        let mut text = String::with_capacity(source.len());
        let mut annotations = Vec::new();
        let mut consumed = 0;

        while let Some(tag) = scanner.next_chord_tag(consumed) {
            text.push_str(&source[consumed..tag.start]);
            consumed = tag.end;

            // `[ch][/ch]` carries nothing to show; drop the markup.
            if tag.chord_name.trim().is_empty() {
                continue;
            }
            let chord_name = self.chord_name(tag.chord_name, warnings);
            chords.insert(&chord_name);

            let start = text.len();
            let anchor = source[tag.end..]
                .chars()
                .next()
                .filter(|_| !inline && !starts_chord_tag(source, tag.end));

            let kind = match anchor {
                Some(c) => {
                    text.push(c);
                    consumed += c.len_utf8();
                    AnnotationKind::Raised(chord_name)
                }
                None => {
                    text.push(' ');
                    AnnotationKind::Inline(chord_name)
                }
            };

            annotations.push(ChordAnnotation {
                kind,
                start,
                end: text.len(),
            });
        }
        text.push_str(&source[consumed..]);
        warnings.extend(scanner.into_warnings());

        let links = if self.detect_links {
            find_links(&text)
        } else {
            Vec::new()
        };

        ContentBlock {
            content: AnnotatedText {
                text,
                chords: annotations,
                links,
            },
            is_tab_block,
        }
    }

    fn chord_name(&self, name: String, warnings: &mut Vec<TabWarning>) -> String {
        if self.transpose == 0 {
            return name;
        }
        match try_transpose(&name, self.transpose) {
            Ok(transposed) => transposed,
            Err(err) => {
                let warning = TabWarning::from(err);
                if !warnings.contains(&warning) {
                    log::warn!("{}", warning);
                    warnings.push(warning);
                }
                name
            }
        }
    }
}

/// Annotate a document with default options.
pub fn annotate(markup: &str) -> Annotated {
    Annotator::default().annotate(markup)
}

/// Annotate with every chord transposed by `half_steps`.
pub fn annotate_transposed(markup: &str, half_steps: i32) -> Annotated {
    Annotator::new().transpose(half_steps).annotate(markup)
}
