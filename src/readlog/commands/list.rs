use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::index_books;
use crate::model::BookId;
use crate::store::{IndexKey, LocalStore};
use std::collections::HashSet;

/// Lists books, narrowed to those matching every key.
///
/// Each key is answered by the store's indexed lookup and the results are
/// intersected. Display indexes always refer to the unfiltered listing, so
/// `show 3` means the same book whether or not a filter was used.
pub fn run<S: LocalStore>(store: &S, filters: &[IndexKey]) -> Result<CmdResult> {
    let listed = index_books(store.list()?);

    if filters.is_empty() {
        return Ok(CmdResult::default().with_listed_books(listed));
    }

    let mut keep: Option<HashSet<BookId>> = None;
    for key in filters {
        let ids: HashSet<BookId> = store.find(key)?.into_iter().map(|b| b.id).collect();
        keep = Some(match keep {
            Some(prev) => prev.intersection(&ids).cloned().collect(),
            None => ids,
        });
    }
    let keep = keep.unwrap_or_default();

    let filtered = listed
        .into_iter()
        .filter(|db| keep.contains(&db.book.id))
        .collect();
    Ok(CmdResult::default().with_listed_books(filtered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Format, NewBook};
    use crate::store::book_store::BookStore;
    use crate::store::mem_backend::MemBackend;

    fn seeded() -> BookStore<MemBackend> {
        let store = BookStore::with_backend(MemBackend::new());
        for (title, author, format) in [
            ("Dune", "Frank Herbert", Format::Physical),
            ("Children of Dune", "Frank Herbert", Format::Audio),
            ("Piranesi", "Susanna Clarke", Format::Audio),
        ] {
            store
                .create(NewBook {
                    title: title.into(),
                    author: author.into(),
                    format,
                    ..Default::default()
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn lists_everything_with_indexes() {
        let store = seeded();
        let result = run(&store, &[]).unwrap();
        assert_eq!(result.listed_books.len(), 3);
        let indexes: Vec<usize> = result.listed_books.iter().map(|db| db.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn filters_by_single_key() {
        let store = seeded();
        let result = run(&store, &[IndexKey::Author("Frank Herbert".into())]).unwrap();
        assert_eq!(result.listed_books.len(), 2);
    }

    #[test]
    fn multiple_keys_intersect() {
        let store = seeded();
        let result = run(
            &store,
            &[
                IndexKey::Author("Frank Herbert".into()),
                IndexKey::Format(Format::Audio),
            ],
        )
        .unwrap();
        assert_eq!(result.listed_books.len(), 1);
        assert_eq!(result.listed_books[0].book.title, "Children of Dune");
    }

    #[test]
    fn filtered_books_keep_their_listing_index() {
        let store = seeded();
        let all = run(&store, &[]).unwrap();
        let piranesi = all
            .listed_books
            .iter()
            .find(|db| db.book.title == "Piranesi")
            .unwrap()
            .index;

        let filtered = run(&store, &[IndexKey::Author("Susanna Clarke".into())]).unwrap();
        assert_eq!(filtered.listed_books[0].index, piranesi);
    }
}
