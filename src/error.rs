//! # Error Types
//!
//! This module defines the error and warning types for the tab engine.
//!
//! The text engine itself never fails: every malformed input has a degraded
//! output. Recoverable problems are reported as [`TabWarning`] values, which
//! are logged through the `log` facade and collected alongside the result.
//! [`TabError`] is reserved for the surfaces that genuinely can fail, which
//! are configuration parsing and file I/O in the CLI.
//!
//! ## Usage
//! ```rust
//! use tabtext::{annotate, TabWarning};
//!
//! let result = annotate("[tab][ch]C unterminated[/tab]");
//! for warning in &result.warnings {
//!     if let TabWarning::UnclosedChordTag { offset } = warning {
//!         eprintln!("chord tag at byte {} was never closed", offset);
//!     }
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// Invalid engine configuration.
    ///
    /// # Example
    /// ```
    /// # use tabtext::TabError;
    /// let err = TabError::ConfigError("unknown field `widht`".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: unknown field `widht`");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {message}")]
    IoError { path: String, message: String },
}

/// A recovered, non-fatal problem found while processing markup.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TabWarning {
    /// `[ch]` or `{ch:` with no closing tag anywhere after it.
    #[error("Unclosed chord tag at offset {offset}")]
    UnclosedChordTag { offset: usize },

    /// An opening chord tag followed by another opening tag of the same
    /// syntax before its close; the outer opener is kept as literal text.
    #[error("Chord tag at offset {offset} opens again before closing")]
    NestedChordTag { offset: usize },

    /// `[tab]` without `[/tab]`; the block runs to the end of the document.
    #[error("Unclosed tab block at offset {offset}")]
    UnclosedTabBlock { offset: usize },

    /// A chord name that does not start with a known root.
    #[error("Cannot transpose '{chord}': unknown chord root")]
    UnknownChordRoot { chord: String },

    /// No usable break point inside the width budget; the line was hard-cut.
    /// `line` is the index of the cut chord row in the wrapped block output.
    #[error("Line {line} hard-cut at the wrap width")]
    HardWrap { line: usize },
}

/// Failure to recognise the root of a chord name.
///
/// Returned by [`crate::transpose::try_transpose`]; the infallible
/// [`crate::transpose::transpose`] logs it and hands the text back unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognised chord root in '{chord}'")]
pub struct ChordParseWarning {
    pub chord: String,
}

impl From<ChordParseWarning> for TabWarning {
    fn from(w: ChordParseWarning) -> Self {
        TabWarning::UnknownChordRoot { chord: w.chord }
    }
}
