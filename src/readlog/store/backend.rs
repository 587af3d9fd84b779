use super::record::StoredBook;
use crate::error::Result;
use crate::model::{BookId, Format, Language};
use crate::tags::TagUsage;

/// A lookup through one of the secondary indexes on the books collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    Title(String),
    Author(String),
    Genre(String),
    Language(Language),
    Format(Format),
    Rating(u8),
}

impl IndexKey {
    /// Checks a stored record against this key without an index.
    pub fn matches(&self, book: &StoredBook) -> bool {
        match self {
            IndexKey::Title(t) => &book.title == t,
            IndexKey::Author(a) => &book.author == a,
            IndexKey::Genre(g) => &book.genre == g,
            IndexKey::Language(l) => &book.language == l,
            IndexKey::Format(f) => &book.format == f,
            IndexKey::Rating(r) => &book.rating == r,
        }
    }
}

/// Abstract interface for raw record I/O.
///
/// This trait handles the "how" of storage (SQLite vs memory), while
/// `BookStore` handles the "what" (identity, timestamps, normalization,
/// tag bookkeeping). All methods take `&self`; backends own their
/// interior mutability.
pub trait StorageBackend {
    // --- Books ---

    /// Read one raw record. `Ok(None)` when the id is unknown.
    fn load_book(&self, id: &BookId) -> Result<Option<StoredBook>>;

    /// Read every raw record, in no particular order.
    fn load_books(&self) -> Result<Vec<StoredBook>>;

    /// Read the raw records matching a secondary index key.
    fn load_books_by(&self, key: &IndexKey) -> Result<Vec<StoredBook>>;

    /// Insert a new record. An existing id is a constraint violation.
    fn add_book(&self, book: &StoredBook) -> Result<()>;

    /// Insert or replace a record.
    fn put_book(&self, book: &StoredBook) -> Result<()>;

    /// Remove a record. Unknown ids are not an error.
    fn delete_book(&self, id: &BookId) -> Result<()>;

    // --- Tag Usage Index ---

    /// Whether the tag-usage collection exists at the current schema.
    fn has_tag_index(&self) -> Result<bool>;

    /// All usage entries. Empty when the collection does not exist.
    fn load_tag_usage(&self) -> Result<Vec<TagUsage>>;

    /// Bump the count of an existing tag by one.
    /// Returns `false` when the tag is not in the index yet.
    fn increment_tag(&self, tag: &str) -> Result<bool>;

    /// Add a tag to the index. An existing tag is a constraint violation.
    fn insert_tag(&self, tag: &str, count: u32) -> Result<()>;
}
