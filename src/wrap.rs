//! # Fixed-Width Line Wrapping
//!
//! Legacy monospace mode: wraps a chord line and the lyric line under it
//! together, so every chord stays above the same lyric column after wrapping.
//!
//! ## Visible Columns
//! Chord tag markup (`[ch]`, `[/ch]`, `{ch:`, `}`) takes no columns. The chord
//! name inside a tag does, and no break may fall inside a tag, including
//! between the letters of its name.
//!
//! ## Break Search
//! For each output line pair the engine looks for the largest column
//! `c <= width` such that, on both lines, column `c` is the end of the line or
//! holds a break character, and the cut does not split a chord tag. Failing
//! that, any column outside chord tags on both lines is accepted. If even that
//! fails (a chord name wider than the budget), both lines are cut at `width`
//! raw characters; tag fragments may then show up in the output.
//!
//! When both lines break on whitespace, that whitespace is dropped so the
//! continuation lines start on the next word. Either both lines drop a column
//! or neither does, which keeps them aligned.
//!
//! ## Example
//! ```rust
//! use tabtext::wrap::wrap_pair;
//!
//! let lines = wrap_pair("[ch]C[/ch]     [ch]G[/ch]", Some("Hello there friend"), 8);
//! assert_eq!(
//!     lines,
//!     vec!["[ch]C[/ch]    ", "Hello", "[ch]G[/ch]", "there", "", "friend"]
//! );
//! ```

use crate::error::TabWarning;
use crate::scanner::chord_tags;
use serde::Serialize;

/// Characters a line may be broken before.
pub const BREAK_CHARS: [char; 12] = [
    ' ', '\t', '\r', '\n', '\u{2010}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}',
    '\u{2053}', '\u{223C}', '\u{2248}',
];

pub fn is_break_char(c: char) -> bool {
    BREAK_CHARS.contains(&c)
}

/// How a break point was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakKind {
    /// Both lines at a break character or line end.
    Joint,
    /// Both lines outside chord tags, ignoring break characters.
    OutsideChord,
    /// Raw cut at the width budget.
    HardCut,
}

/// Byte offsets at which the two lines are cut for one output line pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineWrapBreakPoint {
    pub index1: usize,
    pub index2: usize,
    pub kind: BreakKind,
    /// The whitespace at the break is dropped from both continuations.
    pub skip_whitespace: bool,
}

/// Visible-column view of one raw line.
struct LineMap<'a> {
    raw: &'a str,
    /// Raw byte offset of each visible character.
    visible: Vec<(usize, char)>,
    /// `(start, name_end, end)` of each chord tag.
    tags: Vec<(usize, usize, usize)>,
}

impl<'a> LineMap<'a> {
    fn new(raw: &'a str) -> Self {
        let tags: Vec<(usize, usize, usize)> = chord_tags(raw)
            .map(|m| (m.start, m.name_end, m.end))
            .collect();
        let markup: Vec<(usize, usize)> = chord_tags(raw)
            .flat_map(|m| [(m.start, m.name_start), (m.name_end, m.end)])
            .collect();

        let visible = raw
            .char_indices()
            .filter(|(i, _)| !markup.iter().any(|&(s, e)| *i >= s && *i < e))
            .collect();

        Self { raw, visible, tags }
    }

    fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Raw offset just after `col` visible characters, past any closing
    /// markup but before any opening markup.
    fn cut_offset(&self, col: usize) -> usize {
        if col == 0 {
            return 0;
        }
        if col >= self.visible.len() {
            return self.raw.len();
        }
        let (i, c) = self.visible[col - 1];
        let offset = i + c.len_utf8();
        self.tags
            .iter()
            .find(|&&(_, name_end, _)| name_end == offset)
            .map(|&(_, _, end)| end)
            .unwrap_or(offset)
    }

    fn inside_tag(&self, offset: usize) -> bool {
        self.tags
            .iter()
            .any(|&(start, _, end)| offset > start && offset < end)
    }

    fn at_end(&self, col: usize) -> bool {
        col >= self.visible.len()
    }

    /// Whitespace at `col` that sits right at the cut, so dropping it
    /// removes nothing else.
    fn whitespace_at(&self, col: usize) -> Option<usize> {
        let (i, c) = *self.visible.get(col)?;
        (c.is_whitespace() && i == self.cut_offset(col)).then_some(c.len_utf8())
    }

    fn breaks_at(&self, col: usize) -> bool {
        self.at_end(col) || self.visible.get(col).is_some_and(|&(_, c)| is_break_char(c))
    }

    /// Raw offset of the `n`th character, ignoring markup.
    fn raw_char_offset(&self, n: usize) -> usize {
        self.raw
            .char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(self.raw.len())
    }
}

fn find_break_in(first: &LineMap, second: &LineMap, width: usize) -> LineWrapBreakPoint {
    let outside = |col: usize| {
        !first.inside_tag(first.cut_offset(col)) && !second.inside_tag(second.cut_offset(col))
    };

    let joint = (1..=width)
        .rev()
        .find(|&col| first.breaks_at(col) && second.breaks_at(col) && outside(col));
    if let Some(col) = joint {
        let drops = |line: &LineMap| line.at_end(col) || line.whitespace_at(col).is_some();
        return LineWrapBreakPoint {
            index1: first.cut_offset(col),
            index2: second.cut_offset(col),
            kind: BreakKind::Joint,
            skip_whitespace: drops(first) && drops(second),
        };
    }

    if let Some(col) = (1..=width).rev().find(|&col| outside(col)) {
        return LineWrapBreakPoint {
            index1: first.cut_offset(col),
            index2: second.cut_offset(col),
            kind: BreakKind::OutsideChord,
            skip_whitespace: false,
        };
    }

    LineWrapBreakPoint {
        index1: first.raw_char_offset(width),
        index2: second.raw_char_offset(width),
        kind: BreakKind::HardCut,
        skip_whitespace: false,
    }
}

/// Break point for the next output line pair of `first` and `second`.
///
/// `width` is clamped to at least one column.
pub fn find_break(first: &str, second: &str, width: usize) -> LineWrapBreakPoint {
    find_break_in(&LineMap::new(first), &LineMap::new(second), width.max(1))
}

/// A chord line with the lyric line it sits over, or a line on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePair<'a> {
    pub chord_line: &'a str,
    pub lyric_line: Option<&'a str>,
}

/// True for a line holding chord tags and nothing but whitespace besides.
pub fn is_chord_line(line: &str) -> bool {
    let mut consumed = 0;
    let mut any = false;
    for tag in chord_tags(line) {
        if !line[consumed..tag.start].trim().is_empty() {
            return false;
        }
        consumed = tag.end;
        any = true;
    }
    any && line[consumed..].trim().is_empty()
}

/// Group the lines of a tab block into chord/lyric pairs.
pub fn pair_lines(block: &str) -> Vec<LinePair<'_>> {
    let lines: Vec<&str> = block
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let mut pairs = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let next = lines.get(i + 1).copied();
        match next {
            Some(lyric) if is_chord_line(line) && chord_tags(lyric).next().is_none() => {
                pairs.push(LinePair {
                    chord_line: line,
                    lyric_line: Some(lyric),
                });
                i += 2;
            }
            _ => {
                pairs.push(LinePair {
                    chord_line: line,
                    lyric_line: None,
                });
                i += 1;
            }
        }
    }

    pairs
}

/// Wrapping engine with a fixed column budget.
#[derive(Debug, Clone)]
pub struct LineWrapEngine {
    width: usize,
    warnings: Vec<TabWarning>,
}

impl LineWrapEngine {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            warnings: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Wrap a chord line together with its lyric line.
    ///
    /// Output alternates chord line, lyric line for each wrapped row. A
    /// missing lyric line means no custom wrapping: the line comes back as is.
    pub fn wrap_pair(&mut self, chord_line: &str, lyric_line: Option<&str>) -> Vec<String> {
        self.wrap_pair_at(chord_line, lyric_line, 0)
    }

    /// `first_line` is the index of the pair's first row in the enclosing
    /// output, used to number `HardWrap` warnings.
    fn wrap_pair_at(
        &mut self,
        chord_line: &str,
        lyric_line: Option<&str>,
        first_line: usize,
    ) -> Vec<String> {
        let Some(lyric_line) = lyric_line else {
            return vec![chord_line.to_string()];
        };

        let mut out = Vec::new();
        let (mut first, mut second) = (chord_line, lyric_line);

        loop {
            let (a, b) = (LineMap::new(first), LineMap::new(second));
            if a.visible_len() <= self.width && b.visible_len() <= self.width {
                out.push(first.to_string());
                out.push(second.to_string());
                break;
            }

            let bp = find_break_in(&a, &b, self.width);
            if bp.kind != BreakKind::Joint {
                log::debug!(
                    "no joint break within {} columns, using {:?} at ({}, {})",
                    self.width,
                    bp.kind,
                    bp.index1,
                    bp.index2
                );
            }
            if bp.kind == BreakKind::HardCut {
                let warning = TabWarning::HardWrap {
                    line: first_line + out.len(),
                };
                log::warn!("{}", warning);
                self.warnings.push(warning);
            }

            out.push(first[..bp.index1].to_string());
            out.push(second[..bp.index2].to_string());

            let skip = |line: &str, at: usize| {
                if bp.skip_whitespace && at < line.len() {
                    at + 1
                } else {
                    at
                }
            };
            first = &first[skip(first, bp.index1)..];
            second = &second[skip(second, bp.index2)..];

            if first.is_empty() && second.is_empty() {
                break;
            }
        }

        out
    }

    /// Wrap every chord/lyric pair of a tab block; other lines pass through.
    pub fn wrap_block(&mut self, block: &str) -> Vec<String> {
        let mut out = Vec::new();
        for pair in pair_lines(block) {
            let rows = self.wrap_pair_at(pair.chord_line, pair.lyric_line, out.len());
            out.extend(rows);
        }
        out
    }

    pub fn warnings(&self) -> &[TabWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<TabWarning> {
        self.warnings
    }
}

/// Wrap one chord/lyric pair at `width` columns.
pub fn wrap_pair(chord_line: &str, lyric_line: Option<&str>, width: usize) -> Vec<String> {
    LineWrapEngine::new(width).wrap_pair(chord_line, lyric_line)
}

/// Wrap a whole tab block at `width` columns.
pub fn wrap_block(block: &str, width: usize) -> Vec<String> {
    LineWrapEngine::new(width).wrap_block(block)
}

/// Number of columns a raw line occupies once chord markup is hidden.
pub fn visible_width(line: &str) -> usize {
    LineMap::new(line).visible_len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_short_pair_untouched() {
        let lines = wrap_pair("[ch]C[/ch]  [ch]G[/ch]", Some("la la"), 20);
        assert_eq!(lines, vec!["[ch]C[/ch]  [ch]G[/ch]", "la la"]);
    }

    #[test]
    fn test_single_line_is_not_wrapped() {
        let long = "a very long line without any lyric partner at all";
        assert_eq!(wrap_pair(long, None, 10), vec![long]);
    }

    #[test]
    fn test_markup_takes_no_columns() {
        assert_eq!(visible_width("[ch]Am[/ch] x {ch:G7}"), 7);
        assert_eq!(visible_width("plain"), 5);
    }

    #[test]
    fn test_joint_break_keeps_chords_aligned() {
        let chord = "[ch]C[/ch]      [ch]G[/ch]";
        let lyric = "Hello my friend";
        let lines = wrap_pair(chord, Some(lyric), 6);
        // G sits over the 'y' of "my" before and after wrapping.
        assert_eq!(
            lines,
            vec!["[ch]C[/ch]    ", "Hello", " [ch]G[/ch]", "my", "", "friend"]
        );
        for line in &lines {
            assert!(visible_width(line) <= 6, "{:?} too wide", line);
        }
    }

    #[test]
    fn test_break_never_splits_chord_name() {
        let chord = "    [ch]Cmaj7[/ch]";
        let lyric = "abc defghijk";
        let bp = find_break(chord, lyric, 6);
        // Column 3 is whitespace on both lines and outside the tag.
        assert_eq!(bp.kind, BreakKind::Joint);
        assert_eq!((bp.index1, bp.index2), (3, 3));
        assert!(bp.skip_whitespace);
    }

    #[test]
    fn test_outside_chord_fallback() {
        let chord = "[ch]A[/ch]bcdefgh";
        let lyric = "abcdefgh";
        let bp = find_break(chord, lyric, 4);
        assert_eq!(bp.kind, BreakKind::OutsideChord);
        assert_eq!(&chord[..bp.index1], "[ch]A[/ch]bcd");
        assert_eq!(&lyric[..bp.index2], "abcd");
    }

    #[test]
    fn test_break_right_after_chord_tag() {
        let chord = "[ch]Am[/ch] x";
        let lyric = "lo ve";
        let bp = find_break(chord, lyric, 2);
        assert_eq!(bp.kind, BreakKind::Joint);
        assert_eq!(&chord[..bp.index1], "[ch]Am[/ch]");
        assert_eq!(&lyric[..bp.index2], "lo");
    }

    #[test]
    fn test_hard_cut_when_chord_wider_than_budget() {
        let mut engine = LineWrapEngine::new(3);
        let lines = engine.wrap_pair("[ch]Cmaj7[/ch]", Some("la"));
        assert_eq!(lines[0], "[ch");
        assert_eq!(lines[1], "la");
        assert_eq!(engine.warnings(), &[TabWarning::HardWrap { line: 0 }]);
        // Terminates with both lines fully emitted.
        let chord_rows: String = lines.iter().step_by(2).map(String::as_str).collect();
        let lyric_rows: String = lines.iter().skip(1).step_by(2).map(String::as_str).collect();
        assert_eq!(chord_rows, "[ch]Cmaj7[/ch]");
        assert_eq!(lyric_rows, "la");
    }

    #[test]
    fn test_pair_lines() {
        let block = "[ch]C[/ch]  [ch]G[/ch]\nla la\nno chords here\n[ch]D[/ch]\n[ch]E[/ch]\r\nend";
        let pairs = pair_lines(block);
        assert_eq!(
            pairs,
            vec![
                LinePair { chord_line: "[ch]C[/ch]  [ch]G[/ch]", lyric_line: Some("la la") },
                LinePair { chord_line: "no chords here", lyric_line: None },
                LinePair { chord_line: "[ch]D[/ch]", lyric_line: None },
                LinePair { chord_line: "[ch]E[/ch]", lyric_line: Some("end") },
            ]
        );
    }

    #[test]
    fn test_is_chord_line() {
        assert!(is_chord_line("  [ch]C[/ch] {ch:G}  "));
        assert!(!is_chord_line("[ch]C[/ch] words"));
        assert!(!is_chord_line("   "));
    }

    #[test]
    fn test_wrap_block() {
        let lines = wrap_block("[ch]C[/ch]     [ch]G[/ch]\nHello there friend\nx", 8);
        assert_eq!(
            lines,
            vec!["[ch]C[/ch]    ", "Hello", "[ch]G[/ch]", "there", "", "friend", "x"]
        );
    }

    #[test]
    fn test_hard_wrap_line_counts_across_block() {
        let mut engine = LineWrapEngine::new(3);
        let lines = engine.wrap_block("[ch]C[/ch] [ch]G[/ch]
ab
intro
[ch]Cmaj7[/ch]
la");
        // "C G"/"ab" fit, "intro" stands alone, so the hard cut is row 3.
        assert_eq!(&lines[..4], &["[ch]C[/ch] [ch]G[/ch]", "ab", "intro", "[ch"]);
        assert_eq!(engine.warnings(), &[TabWarning::HardWrap { line: 3 }]);
    }
}
