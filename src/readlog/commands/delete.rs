use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::BookSelector;
use crate::store::LocalStore;

use super::helpers::book_by_selector;

/// Deletes one book. Its vibes stay in the usage index.
pub fn run<S: LocalStore>(store: &S, selector: &BookSelector) -> Result<CmdResult> {
    let target = book_by_selector(store, selector)?;
    store.delete(&target.book.id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book deleted ({}): {}",
        target.index, target.book.title
    )));
    Ok(result.with_affected_books(vec![target.book]))
}
