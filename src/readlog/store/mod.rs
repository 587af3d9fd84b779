//! # Storage Layer
//!
//! This module defines the local store: durable persistence of book records
//! and the tag-usage index, with schema evolution across versions.
//!
//! ## Layering
//!
//! - [`LocalStore`]: the contract the rest of the app talks to.
//! - [`book_store::BookStore`]: the one implementation of that contract.
//!   Assigns identity and timestamps, merges partial updates, normalizes
//!   records on the way out, and keeps the tag index up to date.
//! - [`backend::StorageBackend`]: raw record I/O that `BookStore` runs on.
//!
//! ## Backends
//!
//! - [`sqlite_backend::SqliteBackend`]: production. A single SQLite file,
//!   versioned by [`schema`]. Books are JSON documents plus indexed columns.
//! - [`mem_backend::MemBackend`]: for testing logic without a database, with
//!   hooks to simulate write failures, a missing tag index, and insert races.
//!
//! ## Failure Policy
//!
//! Reads and writes of books surface their errors. Maintaining the tag
//! index is best effort: create and update log a warning and succeed even if
//! the index could not be touched, because the index is advisory.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── config.json     # Settings
//! └── readlog.db      # books + tag_usage, schema version in user_version
//! ```

use crate::error::Result;
use crate::model::{Book, BookChanges, BookId, NewBook};
use crate::tags::TagUsage;

pub mod backend;
pub mod book_store;
pub mod handle;
pub mod mem_backend;
pub mod record;
pub mod schema;
pub mod sqlite_backend;

pub use backend::IndexKey;

/// Abstract interface for book persistence.
pub trait LocalStore {
    /// Make the store ready for use. Calling it again is a no-op.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Store a new book, assigning its id and timestamps.
    fn create(&self, new: NewBook) -> Result<Book>;

    /// Every book, in no particular order.
    fn list(&self) -> Result<Vec<Book>>;

    /// One book, or `None` if the id is unknown.
    fn get(&self, id: &BookId) -> Result<Option<Book>>;

    /// Books whose indexed field equals the key.
    fn find(&self, key: &IndexKey) -> Result<Vec<Book>>;

    /// Merge changes onto an existing book. Unknown ids are `BookNotFound`.
    fn update(&self, id: &BookId, changes: BookChanges) -> Result<Book>;

    /// Remove a book. Unknown ids are not an error.
    fn delete(&self, id: &BookId) -> Result<()>;

    /// Every tag in the usage index.
    fn known_tags(&self) -> Result<Vec<String>>;

    /// Every usage entry with its count.
    fn tag_usage(&self) -> Result<Vec<TagUsage>>;

    /// Count one use of each tag. Per-tag failures are logged, not returned.
    fn record_tag_usage(&self, tags: &[String]) -> Result<()>;
}
