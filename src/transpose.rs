//! # Chord Transposition
//!
//! Moves chord names and key names by half steps around the chromatic cycle.
//!
//! ## Root Recognition
//! A chord name is split into a root and a suffix. The root is the first of
//! these that matches the start of the name (letter case-insensitive, the
//! accidental exact):
//!
//! ```text
//! A# Ab A Bb B C# C D# Db D Eb E F# F G# Gb G
//! ```
//!
//! The suffix (`m7`, `sus4`, `/G`, ...) is carried over verbatim.
//!
//! ## Spelling
//! Output always uses the sharp-preferring spelling of the cycle
//! `A A# B C C# D D# E F F# G G#`. Flat roots are accepted as input and land
//! on their canonical neighbour after the first step: `Ab` up one is `A`,
//! `Ab` down one is `G`. A zero-step transposition returns the name untouched.
//!
//! ## Example
//! ```rust
//! use tabtext::transpose::transpose;
//!
//! assert_eq!(transpose("G#", 1), "A");
//! assert_eq!(transpose("A", -1), "G#");
//! assert_eq!(transpose("Bbm7", 2), "Cm7");
//! ```

use crate::error::ChordParseWarning;
use crate::scanner::{chord_tags, TagSyntax};

/// Recognised roots, longest spelling first within each letter.
const ROOTS: [&str; 17] = [
    "A#", "Ab", "A", "Bb", "B", "C#", "C", "D#", "Db", "D", "Eb", "E", "F#", "F", "G#", "Gb", "G",
];

/// One half step up from a recognised root.
fn step_up(root: &str) -> &'static str {
    match root {
        "A" => "A#",
        "A#" => "B",
        "Ab" => "A",
        "B" => "C",
        "Bb" => "B",
        "C" => "C#",
        "C#" => "D",
        "D" => "D#",
        "D#" => "E",
        "Db" => "D",
        "E" => "F",
        "Eb" => "E",
        "F" => "F#",
        "F#" => "G",
        "G" => "G#",
        "G#" => "A",
        "Gb" => "G",
        _ => unreachable!("step_up called with unrecognised root {root}"),
    }
}

/// One half step down from a recognised root.
fn step_down(root: &str) -> &'static str {
    match root {
        "A" => "G#",
        "A#" => "A",
        "Ab" => "G",
        "B" => "A#",
        "Bb" => "A",
        "C" => "B",
        "C#" => "C",
        "D" => "C#",
        "D#" => "D",
        "Db" => "C",
        "E" => "D#",
        "Eb" => "D",
        "F" => "E",
        "F#" => "F",
        "G" => "F#",
        "G#" => "G",
        "Gb" => "F",
        _ => unreachable!("step_down called with unrecognised root {root}"),
    }
}

/// Split a chord name into its canonical root and the untouched suffix.
///
/// Returns `None` when the name does not start with a recognised root.
pub fn split_root(chord: &str) -> Option<(&'static str, &str)> {
    let mut chars = chord.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let accidental = chars.next();

    ROOTS.iter().copied().find_map(|root| {
        let mut root_chars = root.chars();
        if root_chars.next() != Some(letter) {
            return None;
        }
        match root_chars.next() {
            None => Some((root, &chord[1..])),
            Some(acc) if accidental == Some(acc) => Some((root, &chord[2..])),
            Some(_) => None,
        }
    })
}

/// Transpose a chord name, reporting names with no recognisable root.
///
/// Steps are applied one at a time in the direction of `half_steps`, so any
/// magnitude is accepted.
pub fn try_transpose(chord: &str, half_steps: i32) -> Result<String, ChordParseWarning> {
    let (mut root, suffix) = split_root(chord).ok_or_else(|| ChordParseWarning {
        chord: chord.to_string(),
    })?;

    if half_steps == 0 {
        return Ok(chord.to_string());
    }

    for _ in 0..half_steps.unsigned_abs() {
        root = if half_steps > 0 {
            step_up(root)
        } else {
            step_down(root)
        };
    }

    Ok(format!("{}{}", root, suffix))
}

/// Transpose a chord name; unrecognised names come back unchanged.
pub fn transpose(chord: &str, half_steps: i32) -> String {
    try_transpose(chord, half_steps).unwrap_or_else(|warning| {
        log::warn!("{}", warning);
        chord.to_string()
    })
}

/// Transpose a key or tonality name such as `"Am"` or `"Eb"`.
///
/// Surrounding whitespace is ignored and an empty name stays empty without a
/// warning, since songs often carry no key at all.
pub fn transpose_key_name(key: &str, half_steps: i32) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    transpose(trimmed, half_steps)
}

/// Rewrite the name inside every chord tag of `markup`.
///
/// Tag syntax, block tags and all other text are preserved byte for byte;
/// malformed tags pass through as literal text.
pub fn transpose_markup(markup: &str, half_steps: i32) -> String {
    let (out, unknown) = rewrite_chord_names(markup, half_steps);
    for warning in unknown {
        log::warn!("{}", warning);
    }
    out
}

/// [`transpose_markup`] without logging; names with no known root are kept
/// and returned alongside the rewritten markup.
pub(crate) fn rewrite_chord_names(
    markup: &str,
    half_steps: i32,
) -> (String, Vec<ChordParseWarning>) {
    if half_steps == 0 {
        return (markup.to_string(), Vec::new());
    }

    let mut out = String::with_capacity(markup.len() + 16);
    let mut unknown = Vec::new();
    let mut consumed = 0;
    let mut rewritten = 0usize;

    for tag in chord_tags(markup) {
        out.push_str(&markup[consumed..tag.start]);
        let name = try_transpose(&tag.chord_name, half_steps).unwrap_or_else(|warning| {
            unknown.push(warning);
            tag.chord_name.clone()
        });
        match tag.syntax {
            TagSyntax::Bracket => {
                out.push_str("[ch]");
                out.push_str(&name);
                out.push_str("[/ch]");
            }
            TagSyntax::Brace => {
                out.push_str("{ch:");
                out.push_str(&name);
                out.push('}');
            }
        }
        consumed = tag.end;
        rewritten += 1;
    }
    out.push_str(&markup[consumed..]);

    log::debug!("transposed {} chord tags by {} half steps", rewritten, half_steps);
    (out, unknown)
}
