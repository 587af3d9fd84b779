use super::backend::{IndexKey, StorageBackend};
use super::record::StoredBook;
use crate::error::{ReadlogError, Result};
use crate::model::BookId;
use crate::tags::TagUsage;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since readlog is single-threaded.
/// The tag index starts out present; [`MemBackend::without_tag_index`] models
/// a store opened at a schema that predates it.
pub struct MemBackend {
    books: RefCell<BTreeMap<BookId, StoredBook>>,
    tag_usage: RefCell<Option<BTreeMap<String, u32>>>,
    simulate_write_error: RefCell<bool>,
    simulate_tag_write_error: RefCell<bool>,
    simulate_tag_race: RefCell<bool>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self {
            books: RefCell::new(BTreeMap::new()),
            tag_usage: RefCell::new(Some(BTreeMap::new())),
            simulate_write_error: RefCell::new(false),
            simulate_tag_write_error: RefCell::new(false),
            simulate_tag_race: RefCell::new(false),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_tag_index() -> Self {
        let backend = Self::default();
        *backend.tag_usage.borrow_mut() = None;
        backend
    }

    /// Enable write error simulation on the books collection.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Enable write error simulation on the tag-usage index only.
    pub fn set_simulate_tag_write_error(&self, simulate: bool) {
        *self.simulate_tag_write_error.borrow_mut() = simulate;
    }

    /// Make `increment_tag` miss existing tags, as if another writer
    /// created them between the existence check and the insert.
    pub fn set_simulate_tag_race(&self, simulate: bool) {
        *self.simulate_tag_race.borrow_mut() = simulate;
    }

    /// Test helper to read a single usage count.
    pub fn tag_count(&self, tag: &str) -> Option<u32> {
        self.tag_usage
            .borrow()
            .as_ref()
            .and_then(|index| index.get(tag).copied())
    }

    fn check_write(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(ReadlogError::Write("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn check_tag_write(&self) -> Result<()> {
        if *self.simulate_tag_write_error.borrow() {
            return Err(ReadlogError::Write("Simulated tag write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_book(&self, id: &BookId) -> Result<Option<StoredBook>> {
        Ok(self.books.borrow().get(id).cloned())
    }

    fn load_books(&self) -> Result<Vec<StoredBook>> {
        Ok(self.books.borrow().values().cloned().collect())
    }

    fn load_books_by(&self, key: &IndexKey) -> Result<Vec<StoredBook>> {
        Ok(self
            .books
            .borrow()
            .values()
            .filter(|b| key.matches(b))
            .cloned()
            .collect())
    }

    fn add_book(&self, book: &StoredBook) -> Result<()> {
        self.check_write()?;
        let mut books = self.books.borrow_mut();
        if books.contains_key(&book.id) {
            return Err(ReadlogError::Constraint(format!(
                "book {} already exists",
                book.id
            )));
        }
        books.insert(book.id.clone(), book.clone());
        Ok(())
    }

    fn put_book(&self, book: &StoredBook) -> Result<()> {
        self.check_write()?;
        self.books.borrow_mut().insert(book.id.clone(), book.clone());
        Ok(())
    }

    fn delete_book(&self, id: &BookId) -> Result<()> {
        self.check_write()?;
        self.books.borrow_mut().remove(id);
        Ok(())
    }

    fn has_tag_index(&self) -> Result<bool> {
        Ok(self.tag_usage.borrow().is_some())
    }

    fn load_tag_usage(&self) -> Result<Vec<TagUsage>> {
        Ok(self
            .tag_usage
            .borrow()
            .as_ref()
            .map(|index| {
                index
                    .iter()
                    .map(|(tag, count)| TagUsage::new(tag.clone(), *count))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn increment_tag(&self, tag: &str) -> Result<bool> {
        self.check_tag_write()?;
        if *self.simulate_tag_race.borrow() {
            return Ok(false);
        }
        let mut usage = self.tag_usage.borrow_mut();
        let index = usage
            .as_mut()
            .ok_or_else(|| ReadlogError::Write("tag index does not exist".to_string()))?;
        match index.get_mut(tag) {
            Some(count) => {
                *count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn insert_tag(&self, tag: &str, count: u32) -> Result<()> {
        self.check_tag_write()?;
        let mut usage = self.tag_usage.borrow_mut();
        let index = usage
            .as_mut()
            .ok_or_else(|| ReadlogError::Write("tag index does not exist".to_string()))?;
        if index.contains_key(tag) {
            return Err(ReadlogError::Constraint(format!("tag {} already exists", tag)));
        }
        index.insert(tag.to_string(), count);
        Ok(())
    }
}
