//! # Tag Scanner
//!
//! Locates chord tags and tab blocks in raw tab markup.
//!
//! ## Markup
//! ```text
//! [tab] ... [/tab]      tab block, case-sensitive, not nestable
//! [ch]NAME[/ch]         chord tag, bracket syntax
//! {ch:NAME}             chord tag, brace syntax
//! ```
//!
//! ## Malformed Input
//! Nothing here fails. An opening chord tag with no closing tag after it is
//! not a match, and the opener stays in the text as literal characters. When a
//! second opener of the same syntax appears before the close, the innermost
//! opener wins and the outer one becomes literal text. An unterminated `[tab]`
//! runs to the end of the document. Each case is logged and recorded as a
//! [`TabWarning`].
//!
//! All offsets are byte offsets into the scanned `str`.

use crate::error::TabWarning;
use serde::Serialize;

pub const TAB_OPEN: &str = "[tab]";
pub const TAB_CLOSE: &str = "[/tab]";

/// Which of the two chord tag syntaxes a match was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSyntax {
    /// `[ch]NAME[/ch]`
    Bracket,
    /// `{ch:NAME}`
    Brace,
}

impl TagSyntax {
    pub const ALL: [TagSyntax; 2] = [TagSyntax::Bracket, TagSyntax::Brace];

    pub fn open(self) -> &'static str {
        match self {
            TagSyntax::Bracket => "[ch]",
            TagSyntax::Brace => "{ch:",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            TagSyntax::Bracket => "[/ch]",
            TagSyntax::Brace => "}",
        }
    }

    fn slot(self) -> usize {
        match self {
            TagSyntax::Bracket => 0,
            TagSyntax::Brace => 1,
        }
    }
}

/// A well-formed chord tag.
///
/// `start..end` covers the whole tag including its markup;
/// `name_start..name_end` is the chord name inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordMatch {
    pub start: usize,
    pub end: usize,
    pub name_start: usize,
    pub name_end: usize,
    pub chord_name: String,
    pub syntax: TagSyntax,
}

/// A `[tab]` region. `start..end` includes the tags, `body_start..body_end`
/// is the text between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRegion {
    pub start: usize,
    pub end: usize,
    pub body_start: usize,
    pub body_end: usize,
}

impl TabRegion {
    pub fn is_terminated(&self) -> bool {
        self.end > self.body_end
    }
}

/// True when a chord tag opener (either syntax) begins exactly at `at`.
pub fn starts_chord_tag(text: &str, at: usize) -> bool {
    text.get(at..)
        .map(|rest| TagSyntax::ALL.iter().any(|s| rest.starts_with(s.open())))
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
enum Lookahead {
    Unknown,
    Found(ChordMatch),
    Exhausted,
}

/// Incremental chord tag scanner over one piece of text.
///
/// Successive calls to [`TagScanner::next_chord_tag`] must use non-decreasing
/// `from` offsets. Each syntax keeps its next match cached so a long document
/// is scanned once per syntax and every warning is recorded once.
pub struct TagScanner<'a> {
    text: &'a str,
    base_offset: usize,
    lookahead: [Lookahead; 2],
    warnings: Vec<TabWarning>,
}

impl<'a> TagScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_base_offset(text, 0)
    }

    /// Scanner over a slice of a larger document; `base_offset` is added to
    /// the offsets reported in warnings.
    pub fn with_base_offset(text: &'a str, base_offset: usize) -> Self {
        Self {
            text,
            base_offset,
            lookahead: [Lookahead::Unknown, Lookahead::Unknown],
            warnings: Vec::new(),
        }
    }

    /// The earliest well-formed chord tag starting at or after `from`.
    pub fn next_chord_tag(&mut self, from: usize) -> Option<ChordMatch> {
        for syntax in TagSyntax::ALL {
            let slot = syntax.slot();
            let stale = match &self.lookahead[slot] {
                Lookahead::Unknown => true,
                Lookahead::Found(m) => m.start < from,
                Lookahead::Exhausted => false,
            };
            if stale {
                self.lookahead[slot] = match self.find_with_syntax(from, syntax) {
                    Some(m) => Lookahead::Found(m),
                    None => Lookahead::Exhausted,
                };
            }
        }

        let first = match (&self.lookahead[0], &self.lookahead[1]) {
            (Lookahead::Found(a), Lookahead::Found(b)) => {
                if a.start <= b.start {
                    0
                } else {
                    1
                }
            }
            (Lookahead::Found(_), _) => 0,
            (_, Lookahead::Found(_)) => 1,
            _ => return None,
        };

        match std::mem::replace(&mut self.lookahead[first], Lookahead::Unknown) {
            Lookahead::Found(m) => Some(m),
            _ => None,
        }
    }

    pub fn warnings(&self) -> &[TabWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<TabWarning> {
        self.warnings
    }

    fn warn(&mut self, warning: TabWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn find_with_syntax(&mut self, from: usize, syntax: TagSyntax) -> Option<ChordMatch> {
        let (open, close) = (syntax.open(), syntax.close());
        let rest = self.text.get(from..)?;
        let mut open_at = from + rest.find(open)?;
        let mut name_start = open_at + open.len();

        let Some(close_rel) = self.text[name_start..].find(close) else {
            // No closer after this opener means none after any later one either.
            self.warn(TabWarning::UnclosedChordTag {
                offset: self.base_offset + open_at,
            });
            return None;
        };
        let name_end = name_start + close_rel;

        if let Some(inner) = self.text[name_start..name_end].rfind(open) {
            self.warn(TabWarning::NestedChordTag {
                offset: self.base_offset + open_at,
            });
            open_at = name_start + inner;
            name_start = open_at + open.len();
        }

        Some(ChordMatch {
            start: open_at,
            end: name_end + close.len(),
            name_start,
            name_end,
            chord_name: self.text[name_start..name_end].to_string(),
            syntax,
        })
    }
}

/// Find the next chord tag in `text` at or after `from`.
///
/// # Example
/// ```rust
/// use tabtext::scanner::find_next_chord_tag;
///
/// let m = find_next_chord_tag("{ch:Em} hello", 0).unwrap();
/// assert_eq!((m.start, m.end, m.chord_name.as_str()), (0, 7, "Em"));
/// ```
pub fn find_next_chord_tag(text: &str, from: usize) -> Option<ChordMatch> {
    TagScanner::new(text).next_chord_tag(from)
}

/// Iterator over every well-formed chord tag, in document order.
pub struct ChordTags<'a> {
    scanner: TagScanner<'a>,
    pos: usize,
}

impl<'a> ChordTags<'a> {
    pub fn into_warnings(self) -> Vec<TabWarning> {
        self.scanner.into_warnings()
    }
}

impl Iterator for ChordTags<'_> {
    type Item = ChordMatch;

    fn next(&mut self) -> Option<ChordMatch> {
        let m = self.scanner.next_chord_tag(self.pos)?;
        self.pos = m.end;
        Some(m)
    }
}

pub fn chord_tags(text: &str) -> ChordTags<'_> {
    ChordTags {
        scanner: TagScanner::new(text),
        pos: 0,
    }
}

/// Locate the `[tab]` regions of a document, with warnings for unterminated
/// blocks.
pub fn scan_tab_blocks(text: &str) -> (Vec<TabRegion>, Vec<TabWarning>) {
    let mut regions = Vec::new();
    let mut warnings = Vec::new();
    let mut pos = 0;

    while let Some(rel) = text[pos..].find(TAB_OPEN) {
        let start = pos + rel;
        let body_start = start + TAB_OPEN.len();

        let region = match text[body_start..].find(TAB_CLOSE) {
            Some(close_rel) => {
                let body_end = body_start + close_rel;
                TabRegion {
                    start,
                    end: body_end + TAB_CLOSE.len(),
                    body_start,
                    body_end,
                }
            }
            None => {
                let warning = TabWarning::UnclosedTabBlock { offset: start };
                log::warn!("{}", warning);
                warnings.push(warning);
                TabRegion {
                    start,
                    end: text.len(),
                    body_start,
                    body_end: text.len(),
                }
            }
        };

        regions.push(region);
        pos = region.end;
    }

    (regions, warnings)
}

pub fn find_tab_blocks(text: &str) -> Vec<TabRegion> {
    scan_tab_blocks(text).0
}
