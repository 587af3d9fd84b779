use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::LocalStore;
use crate::tags::{suggest_tags, SuggestRequest};

/// Every known tag with its usage count, most used first.
pub fn usage<S: LocalStore>(store: &S) -> Result<CmdResult> {
    let mut usage = store.tag_usage()?;
    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));

    let mut result = CmdResult::default();
    if usage.is_empty() {
        result.add_message(CmdMessage::info("No tags used yet."));
    }
    Ok(result.with_tag_usage(usage))
}

/// Ranked completions for a partially typed tag.
pub fn suggest<S: LocalStore>(
    store: &S,
    predefined: &[String],
    prefix: &str,
    exclude: &[String],
    limit: usize,
) -> Result<CmdResult> {
    let usage = store.tag_usage()?;
    let suggestions = suggest_tags(
        &usage,
        predefined,
        &SuggestRequest {
            prefix,
            exclude,
            limit,
        },
    );

    let mut result = CmdResult::default();
    if suggestions.is_empty() {
        result.add_message(CmdMessage::info(format!("No tags match \"{}\".", prefix)));
    }
    Ok(result.with_suggestions(suggestions))
}
