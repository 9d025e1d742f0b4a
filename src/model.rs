//! # Annotated Content Types
//!
//! The output of the annotation pass, consumed by a rendering surface.
//!
//! ## Type Hierarchy
//! ```text
//! Annotated
//!   ├── Vec<ContentBlock>          document order
//!   │     ├── is_tab_block: bool
//!   │     └── AnnotatedText
//!   │           ├── text: String   chord markup removed
//!   │           ├── Vec<ChordAnnotation>
//!   │           │     ├── kind: AnnotationKind (Raised | Inline)
//!   │           │     └── start..end (one anchor character)
//!   │           └── Vec<Link>
//!   ├── ChordSet                   distinct chord names
//!   └── Vec<TabWarning>
//! ```
//!
//! ## Raised vs Inline
//! A raised chord sits above the real character it is anchored to, the way a
//! chord line sits above a lyric line. An inline chord has no natural anchor
//! (plain prose, end of block, or directly followed by another chord) and is
//! attached to an inserted space; renderers draw it as a floating button.

use crate::error::TabWarning;
use crate::links::Link;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Prefix that marks an inline chord in the string form of an annotation.
pub const INLINE_MARKER: &str = "{il}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    Raised(String),
    Inline(String),
}

impl AnnotationKind {
    pub fn chord_name(&self) -> &str {
        match self {
            AnnotationKind::Raised(name) | AnnotationKind::Inline(name) => name,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, AnnotationKind::Inline(_))
    }

    /// String form used by existing renderers: the bare name for a raised
    /// chord, `{il}` + name for an inline one.
    pub fn wire_value(&self) -> String {
        match self {
            AnnotationKind::Raised(name) => name.clone(),
            AnnotationKind::Inline(name) => format!("{}{}", INLINE_MARKER, name),
        }
    }

    /// Inverse of [`AnnotationKind::wire_value`].
    pub fn from_wire_value(value: &str) -> Self {
        match value.strip_prefix(INLINE_MARKER) {
            Some(name) => AnnotationKind::Inline(name.to_string()),
            None => AnnotationKind::Raised(value.to_string()),
        }
    }
}

impl Serialize for AnnotationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.wire_value())
    }
}

/// A chord attached to exactly one character of the output text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordAnnotation {
    #[serde(rename = "value")]
    pub kind: AnnotationKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotatedText {
    pub text: String,
    pub chords: Vec<ChordAnnotation>,
    pub links: Vec<Link>,
}

impl AnnotatedText {
    pub fn chord_annotations(&self) -> &[ChordAnnotation] {
        &self.chords
    }

    /// The text with chord anchors and links left in place.
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    /// Chord annotations whose anchor lies in `start..end`.
    pub fn chords_in(&self, start: usize, end: usize) -> impl Iterator<Item = &ChordAnnotation> {
        self.chords
            .iter()
            .filter(move |c| c.start >= start && c.start < end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub content: AnnotatedText,
    pub is_tab_block: bool,
}

/// Distinct chord names of a document, case-sensitive as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChordSet(BTreeSet<String>);

impl ChordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the name was not present yet.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.0.contains(name) {
            return false;
        }
        self.0.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Names in lexical order, for the chord diagram strip.
    pub fn sorted(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<'a> FromIterator<&'a str> for ChordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = ChordSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Result of annotating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Annotated {
    pub blocks: Vec<ContentBlock>,
    pub chords: ChordSet,
    pub warnings: Vec<TabWarning>,
}

impl Annotated {
    /// Text of all blocks joined in document order.
    pub fn joined_text(&self) -> String {
        self.blocks.iter().map(|b| b.content.text.as_str()).collect()
    }

    pub fn tab_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks.iter().filter(|b| b.is_tab_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_value() {
        assert_eq!(AnnotationKind::Raised("Am".into()).wire_value(), "Am");
        assert_eq!(AnnotationKind::Inline("Am".into()).wire_value(), "{il}Am");
        assert_eq!(
            AnnotationKind::from_wire_value("{il}G7"),
            AnnotationKind::Inline("G7".into())
        );
        assert_eq!(
            AnnotationKind::from_wire_value("G7"),
            AnnotationKind::Raised("G7".into())
        );
    }

    #[test]
    fn test_chord_set_is_distinct_and_case_sensitive() {
        let set: ChordSet = ["C", "Am", "C", "am"].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains("am"));
        assert_eq!(set.sorted(), vec!["Am", "C", "am"]);
    }

    #[test]
    fn test_annotation_serializes_wire_value() {
        let annotation = ChordAnnotation {
            kind: AnnotationKind::Inline("D".into()),
            start: 3,
            end: 4,
        };
        let json = serde_json::to_string(&annotation).unwrap();
        assert_eq!(json, r#"{"value":"{il}D","start":3,"end":4}"#);
    }
}
