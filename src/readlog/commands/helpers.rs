use crate::error::Result;
use crate::index::{index_books, resolve, BookSelector, DisplayBook};
use crate::store::LocalStore;

pub fn indexed_books<S: LocalStore>(store: &S) -> Result<Vec<DisplayBook>> {
    let books = store.list()?;
    Ok(index_books(books))
}

/// Resolves a selector against the current listing.
pub fn book_by_selector<S: LocalStore>(store: &S, selector: &BookSelector) -> Result<DisplayBook> {
    let indexed = indexed_books(store)?;
    resolve(&indexed, selector).cloned()
}
