use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ReadlogError, Result};
use crate::model::NewBook;
use crate::store::LocalStore;

pub fn run<S: LocalStore>(store: &S, new: NewBook) -> Result<CmdResult> {
    if new.title.trim().is_empty() {
        return Err(ReadlogError::Api("A book needs a title".to_string()));
    }

    let book = store.create(new)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Book added: {}", book.title)));
    Ok(result.with_affected_books(vec![book]))
}
