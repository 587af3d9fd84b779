//! Vibe tags and the tag-usage index.
//!
//! Tags are free text. Books keep them exactly as entered (order preserved,
//! duplicates allowed); only the usage index normalizes them.
//!
//! ## Usage Index
//!
//! Every time a book is saved, each of its tags gets its usage count bumped.
//! Counts are never decremented and entries are never removed, so the index
//! is a retained-forever record of what has been used. It only ranks
//! autocomplete suggestions (see [`suggest`]) and can be rebuilt from the
//! books at any time, which is why failures to maintain it are logged and
//! swallowed instead of failing the save.
//!
//! ## Normalization
//!
//! Surrounding whitespace is trimmed and empty tags are dropped. Case is
//! preserved: `"Romance"` and `"romance"` are distinct tags.

pub mod suggest;

use serde::{Deserialize, Serialize};

pub use suggest::{suggest_tags, SuggestRequest};

/// One entry of the tag-usage index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub tag: String,
    pub count: u32,
}

impl TagUsage {
    pub fn new(tag: impl Into<String>, count: u32) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

/// Normalizes a single tag for the usage index.
///
/// Returns `None` when nothing is left after trimming.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalizes a list of tags, keeping order and duplicates.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|t| normalize_tag(t.as_ref()))
        .collect()
}
