//! Autocomplete ranking for vibe tags.
//!
//! Candidates come from two places: the usage index (tags someone actually
//! used) and the predefined vibes from the configuration. Ranking:
//! 1. Usage count, highest first
//! 2. Position in the predefined list
//! 3. Alphabetical
//!
//! Prefix matching is case-insensitive; the returned text keeps its case.

use super::TagUsage;
use std::collections::HashMap;

/// Input for [`suggest_tags`].
#[derive(Debug, Clone, Default)]
pub struct SuggestRequest<'a> {
    /// What the user has typed so far. Empty matches everything.
    pub prefix: &'a str,
    /// Tags already on the book; never suggested again.
    pub exclude: &'a [String],
    pub limit: usize,
}

struct Candidate<'a> {
    tag: &'a str,
    count: u32,
    predefined_rank: usize,
}

pub fn suggest_tags(usage: &[TagUsage], predefined: &[String], req: &SuggestRequest) -> Vec<String> {
    let prefix = req.prefix.trim().to_lowercase();
    let mut candidates: HashMap<&str, Candidate> = HashMap::new();

    for entry in usage {
        candidates.insert(
            entry.tag.as_str(),
            Candidate {
                tag: entry.tag.as_str(),
                count: entry.count,
                predefined_rank: usize::MAX,
            },
        );
    }

    for (rank, tag) in predefined.iter().enumerate() {
        // Trimmed like normalize_tag.
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        candidates
            .entry(tag)
            .and_modify(|c| c.predefined_rank = c.predefined_rank.min(rank))
            .or_insert(Candidate {
                tag,
                count: 0,
                predefined_rank: rank,
            });
    }

    let mut matching: Vec<Candidate> = candidates
        .into_values()
        .filter(|c| c.tag.to_lowercase().starts_with(&prefix))
        .filter(|c| !req.exclude.iter().any(|e| e.trim() == c.tag))
        .collect();

    matching.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.predefined_rank.cmp(&b.predefined_rank))
            .then(a.tag.cmp(b.tag))
    });

    matching
        .into_iter()
        .take(req.limit)
        .map(|c| c.tag.to_string())
        .collect()
}
