use super::book_store::BookStore;
use super::sqlite_backend::SqliteBackend;
use super::{IndexKey, LocalStore};
use crate::error::Result;
use crate::model::{Book, BookChanges, BookId, NewBook};
use crate::tags::TagUsage;
use once_cell::unsync::OnceCell;
use std::path::{Path, PathBuf};

/// Lazily opened store, shared for the life of the process.
///
/// The database is opened (and upgraded) on the first call to
/// [`StoreHandle::open`] or any store operation; later calls reuse the same
/// connection. A failed open is not cached, so a later call tries again.
pub struct StoreHandle {
    path: PathBuf,
    store: OnceCell<BookStore<SqliteBackend>>,
}

impl StoreHandle {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            store: OnceCell::new(),
        }
    }

    pub fn open(&self) -> Result<&BookStore<SqliteBackend>> {
        self.store.get_or_try_init(|| {
            log::debug!("Opening store at {}", self.path.display());
            SqliteBackend::open(&self.path).map(BookStore::with_backend)
        })
    }

    pub fn is_open(&self) -> bool {
        self.store.get().is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalStore for StoreHandle {
    fn initialize(&self) -> Result<()> {
        self.open().map(|_| ())
    }

    fn create(&self, new: NewBook) -> Result<Book> {
        self.open()?.create(new)
    }

    fn list(&self) -> Result<Vec<Book>> {
        self.open()?.list()
    }

    fn get(&self, id: &BookId) -> Result<Option<Book>> {
        self.open()?.get(id)
    }

    fn find(&self, key: &IndexKey) -> Result<Vec<Book>> {
        self.open()?.find(key)
    }

    fn update(&self, id: &BookId, changes: BookChanges) -> Result<Book> {
        self.open()?.update(id, changes)
    }

    fn delete(&self, id: &BookId) -> Result<()> {
        self.open()?.delete(id)
    }

    fn known_tags(&self) -> Result<Vec<String>> {
        self.open()?.known_tags()
    }

    fn tag_usage(&self) -> Result<Vec<TagUsage>> {
        self.open()?.tag_usage()
    }

    fn record_tag_usage(&self, tags: &[String]) -> Result<()> {
        self.open()?.record_tag_usage(tags)
    }
}
