use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::BookSelector;
use crate::store::LocalStore;

use super::helpers::book_by_selector;

pub fn run<S: LocalStore>(store: &S, selector: &BookSelector) -> Result<CmdResult> {
    let book = book_by_selector(store, selector)?;
    Ok(CmdResult::default().with_listed_books(vec![book]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewBook;
    use crate::store::book_store::BookStore;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn shows_selected_book() {
        let store = BookStore::with_backend(MemBackend::new());
        store
            .create(NewBook {
                title: "Dune".into(),
                notes: "Spice".into(),
                ..Default::default()
            })
            .unwrap();

        let result = run(&store, &BookSelector::Index(1)).unwrap();
        assert_eq!(result.listed_books.len(), 1);
        assert_eq!(result.listed_books[0].book.notes, "Spice");
    }
}
