//! Hyperlink detection in plain text.
//!
//! A single case-insensitive regex pass recognises `http://`, `https://`,
//! `ftp://`, `ftps://` and bare `www.` links. Punctuation such as `.`, `,`,
//! `;`, `:` and `!` may appear inside a link but never ends one, so a URL at
//! the end of a sentence does not swallow the full stop.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)\b(?:(?:https?|ftps?)://|www\.)[-a-z0-9+&@#/%?=~_|$!:,.;]*[-a-z0-9+&@#/%=~_|$]",
    )
    .expect("invalid link regex")
});

/// A detected link; `start..end` is a byte range of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub start: usize,
    pub end: usize,
}

impl Link {
    /// The link as something a browser can open: bare `www.` links get an
    /// `http://` scheme.
    pub fn href(&self) -> String {
        if self.url.len() >= 4 && self.url[..4].eq_ignore_ascii_case("www.") {
            format!("http://{}", self.url)
        } else {
            self.url.clone()
        }
    }
}

/// Find every link in `text`, in order.
pub fn find_links(text: &str) -> Vec<Link> {
    LINK_RE
        .find_iter(text)
        .map(|m| Link {
            url: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}
