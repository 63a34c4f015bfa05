//! Declared-encoding marker.
//!
//! Source files opt into transcoding with a coding comment on one of their
//! first two lines:
//!
//! ```lua
//! -- coding: gql
//! local q = `query { viewer { login } }`
//! ```
//!
//! The recognized names form a small closed set and are matched
//! case-sensitively; anything else is left to plain UTF-8 reading.

use once_cell::sync::Lazy;
use regex::Regex;

/// Synthetic header asserting a standard encoding downstream.
///
/// Prepended exactly once per full-buffer transform, so the transformed
/// output opens with a declaration the loader treats as plain UTF-8 and a
/// re-read is never transcoded a second time.
pub const UTF8_CODING_LINE: &str = "-- coding: utf-8\n";

/// Recognized coding names (case-sensitive)
pub const CODING_ALIASES: [&str; 3] = ["gql", "graphql", "graftql"];

static CODING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*--[ \t]*coding:[ \t]*([A-Za-z0-9_.\-]+)").expect("coding regex"));

/// Scan the first two lines of `source` for a coding comment.
///
/// Returns the declared name whether or not it is recognized; deciding what
/// is handled belongs to the registry lookup.
pub fn declared_coding(source: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(source);
    text.lines()
        .take(2)
        .find_map(|line| CODING_LINE.captures(line).map(|caps| caps[1].to_string()))
}
