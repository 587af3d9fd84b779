use super::backend::{IndexKey, StorageBackend};
use super::record::StoredBook;
use super::LocalStore;
use crate::error::{ReadlogError, Result};
use crate::model::{Book, BookChanges, BookId, NewBook};
use crate::tags::{normalize_tags, TagUsage};
use chrono::Utc;

pub struct BookStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> BookStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    fn normalize_all(stored: Vec<StoredBook>) -> Result<Vec<Book>> {
        stored.iter().map(StoredBook::normalize).collect()
    }

    /// Bumps the usage index after a save. Never fails the save.
    fn note_tags_used(&self, book: &Book) {
        if book.vibes.is_empty() {
            return;
        }
        if let Err(e) = self.record_tag_usage(&book.vibes) {
            log::warn!("Could not update tag usage for book {}: {}", book.id, e);
        }
    }
}

impl<B: StorageBackend> LocalStore for BookStore<B> {
    fn create(&self, new: NewBook) -> Result<Book> {
        let book = Book::from_new(new);
        self.backend.add_book(&StoredBook::from(&book))?;
        self.note_tags_used(&book);
        Ok(book)
    }

    fn list(&self) -> Result<Vec<Book>> {
        Self::normalize_all(self.backend.load_books()?)
    }

    fn get(&self, id: &BookId) -> Result<Option<Book>> {
        self.backend
            .load_book(id)?
            .map(|stored| stored.normalize())
            .transpose()
    }

    fn find(&self, key: &IndexKey) -> Result<Vec<Book>> {
        Self::normalize_all(self.backend.load_books_by(key)?)
    }

    fn update(&self, id: &BookId, changes: BookChanges) -> Result<Book> {
        let stored = self
            .backend
            .load_book(id)?
            .ok_or_else(|| ReadlogError::BookNotFound(id.clone()))?;

        let mut book = stored.normalize()?;
        book.apply(changes);
        book.updated_at = Utc::now().max(book.created_at);

        self.backend.put_book(&StoredBook::from(&book))?;
        self.note_tags_used(&book);
        Ok(book)
    }

    fn delete(&self, id: &BookId) -> Result<()> {
        self.backend.delete_book(id)
    }

    fn known_tags(&self) -> Result<Vec<String>> {
        Ok(self
            .backend
            .load_tag_usage()?
            .into_iter()
            .map(|usage| usage.tag)
            .collect())
    }

    fn tag_usage(&self) -> Result<Vec<TagUsage>> {
        self.backend.load_tag_usage()
    }

    fn record_tag_usage(&self, tags: &[String]) -> Result<()> {
        let tags = normalize_tags(tags);
        if tags.is_empty() {
            return Ok(());
        }
        if !self.backend.has_tag_index()? {
            return Err(ReadlogError::Write(
                "tag usage index does not exist".to_string(),
            ));
        }

        // One tag at a time, so repeated tags in the same call each count.
        for tag in &tags {
            let outcome = match self.backend.increment_tag(tag) {
                Ok(true) => Ok(()),
                Ok(false) => self.backend.insert_tag(tag, 1),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => {}
                Err(ReadlogError::Constraint(msg)) => {
                    log::debug!("Tag {:?} appeared concurrently, ignoring: {}", tag, msg);
                }
                Err(e) => log::warn!("Could not record usage of tag {:?}: {}", tag, e),
            }
        }
        Ok(())
    }
}
