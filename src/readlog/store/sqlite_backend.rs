use super::backend::{IndexKey, StorageBackend};
use super::record::StoredBook;
use super::schema;
use crate::error::{ReadlogError, Result};
use crate::model::BookId;
use crate::tags::TagUsage;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;

/// Production backend: one SQLite file holding both collections.
///
/// Books are stored as JSON documents next to the columns the secondary
/// indexes are built on. Every write is a single autocommit statement.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens (creating if needed) the database at `path` and upgrades it to
    /// the current schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_at(path, schema::CURRENT_VERSION)
    }

    /// Opens the database and upgrades it no further than `version`.
    pub fn open_at<P: AsRef<Path>>(path: P, version: u32) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ReadlogError::StoreOpen(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path).map_err(ReadlogError::open)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(ReadlogError::open)?;

        Self::with_connection(conn, version)
    }

    /// A private, throwaway database. Nothing survives the handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(ReadlogError::open)?;
        Self::with_connection(conn, schema::CURRENT_VERSION)
    }

    fn with_connection(mut conn: Connection, version: u32) -> Result<Self> {
        let reached = schema::migrate_to(&mut conn, version)?;
        log::debug!("Store ready at schema v{}", reached);
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> Result<u32> {
        schema::schema_version(&self.conn).map_err(ReadlogError::read)
    }

    fn write_book(&self, sql: &str, book: &StoredBook) -> Result<()> {
        let doc = book.to_json()?;
        let created_at = book
            .created_at
            .as_ref()
            .and_then(|t| t.to_datetime())
            .map(|dt| dt.to_rfc3339());
        self.conn
            .execute(
                sql,
                params![
                    book.id.as_str(),
                    doc,
                    book.title,
                    book.author,
                    book.genre,
                    book.language.as_str(),
                    book.format.as_str(),
                    book.rating,
                    created_at,
                ],
            )
            .map_err(ReadlogError::write)?;
        Ok(())
    }

    fn query_docs(&self, sql: &str, args: &[Value]) -> Result<Vec<StoredBook>> {
        let mut stmt = self.conn.prepare(sql).map_err(ReadlogError::read)?;
        let docs = stmt
            .query_map(rusqlite::params_from_iter(args), |row| row.get::<_, String>(0))
            .map_err(ReadlogError::read)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(ReadlogError::read)?;
        docs.iter().map(|doc| StoredBook::from_json(doc)).collect()
    }
}

const INSERT_BOOK: &str = "INSERT INTO books
    (id, doc, title, author, genre, language, format, rating, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const UPSERT_BOOK: &str = "INSERT OR REPLACE INTO books
    (id, doc, title, author, genre, language, format, rating, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

impl StorageBackend for SqliteBackend {
    fn load_book(&self, id: &BookId) -> Result<Option<StoredBook>> {
        let doc: Option<String> = self
            .conn
            .query_row(
                "SELECT doc FROM books WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(ReadlogError::read)?;
        doc.map(|d| StoredBook::from_json(&d)).transpose()
    }

    fn load_books(&self) -> Result<Vec<StoredBook>> {
        self.query_docs("SELECT doc FROM books", &[])
    }

    fn load_books_by(&self, key: &IndexKey) -> Result<Vec<StoredBook>> {
        let (column, value) = match key {
            IndexKey::Title(t) => ("title", Value::Text(t.clone())),
            IndexKey::Author(a) => ("author", Value::Text(a.clone())),
            IndexKey::Genre(g) => ("genre", Value::Text(g.clone())),
            IndexKey::Language(l) => ("language", Value::Text(l.as_str().to_string())),
            IndexKey::Format(f) => ("format", Value::Text(f.as_str().to_string())),
            IndexKey::Rating(r) => ("rating", Value::Integer(i64::from(*r))),
        };
        let sql = format!("SELECT doc FROM books WHERE {} = ?1", column);
        self.query_docs(&sql, &[value])
    }

    fn add_book(&self, book: &StoredBook) -> Result<()> {
        self.write_book(INSERT_BOOK, book)
    }

    fn put_book(&self, book: &StoredBook) -> Result<()> {
        self.write_book(UPSERT_BOOK, book)
    }

    fn delete_book(&self, id: &BookId) -> Result<()> {
        self.conn
            .execute("DELETE FROM books WHERE id = ?1", params![id.as_str()])
            .map_err(ReadlogError::write)?;
        Ok(())
    }

    fn has_tag_index(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tag_usage'",
                [],
                |row| row.get(0),
            )
            .map_err(ReadlogError::read)?;
        Ok(count > 0)
    }

    fn load_tag_usage(&self) -> Result<Vec<TagUsage>> {
        if !self.has_tag_index()? {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare("SELECT tag, count FROM tag_usage ORDER BY tag")
            .map_err(ReadlogError::read)?;
        let usage = stmt
            .query_map([], |row| Ok(TagUsage::new(row.get::<_, String>(0)?, row.get(1)?)))
            .map_err(ReadlogError::read)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(ReadlogError::read)?;
        Ok(usage)
    }

    fn increment_tag(&self, tag: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE tag_usage SET count = count + 1 WHERE tag = ?1",
                params![tag],
            )
            .map_err(ReadlogError::write)?;
        Ok(changed > 0)
    }

    fn insert_tag(&self, tag: &str, count: u32) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO tag_usage (tag, count) VALUES (?1, ?2)",
                params![tag, count],
            )
            .map_err(ReadlogError::write)?;
        Ok(())
    }
}
