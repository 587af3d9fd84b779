use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::BookSelector;
use crate::model::BookChanges;
use crate::store::LocalStore;

use super::helpers::book_by_selector;

pub fn run<S: LocalStore>(
    store: &S,
    selector: &BookSelector,
    changes: BookChanges,
) -> Result<CmdResult> {
    let target = book_by_selector(store, selector)?;
    let unchanged = changes.is_empty();
    let book = store.update(&target.book.id, changes)?;

    let mut result = CmdResult::default();
    if unchanged {
        result.add_message(CmdMessage::info(format!(
            "Nothing to change for {}, touched it",
            book.title
        )));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Book updated ({}): {}",
            target.index, book.title
        )));
    }
    if book.pages_read.is_some() && !book.did_not_finish {
        result.add_message(CmdMessage::warning(
            "Pages read is only shown for books marked as not finished",
        ));
    }
    Ok(result.with_affected_books(vec![book]))
}
