//! Schema versioning for the SQLite store.
//!
//! The schema version lives in `PRAGMA user_version` and only ever goes up.
//! Opening a database runs every migration newer than the stored version, in
//! order, each inside its own transaction together with its version bump, so
//! an interrupted upgrade resumes from the last completed step. Migrations
//! are additive: they add collections and indexes, drop obsolete indexes, and
//! back-fill derived data. They never discard records.
//!
//! | Version | Change                                                      |
//! |---------|-------------------------------------------------------------|
//! | 1       | `books` with JSON documents and title/author/genre/tag/created_at indexes |
//! | 2       | language/format/rating index columns, back-filled           |
//! | 3       | `tag_usage` collection, seeded from every book's tags       |
//! | 4       | drop the index on the legacy single-tag column              |

use super::record::StoredBook;
use crate::error::{ReadlogError, Result};
use crate::tags::normalize_tags;
use rusqlite::{params, Connection, Transaction};
use std::collections::BTreeMap;

pub const CURRENT_VERSION: u32 = 4;

struct Migration {
    version: u32,
    description: &'static str,
    apply: fn(&Transaction) -> rusqlite::Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create books collection",
        apply: create_books,
    },
    Migration {
        version: 2,
        description: "index language, format and rating",
        apply: add_catalog_indexes,
    },
    Migration {
        version: 3,
        description: "create tag usage index",
        apply: create_tag_usage,
    },
    Migration {
        version: 4,
        description: "drop legacy single-tag index",
        apply: drop_legacy_tag_index,
    },
];

pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Upgrades the database to [`CURRENT_VERSION`].
pub fn migrate(conn: &mut Connection) -> Result<u32> {
    migrate_to(conn, CURRENT_VERSION)
}

/// Upgrades the database to `target`, which may be older than the current
/// version. Used to build databases in an earlier shape.
pub fn migrate_to(conn: &mut Connection, target: u32) -> Result<u32> {
    let found = schema_version(conn).map_err(ReadlogError::open)?;

    if found > CURRENT_VERSION {
        return Err(ReadlogError::StoreOpen(format!(
            "database schema v{} is newer than this version of readlog supports (v{})",
            found, CURRENT_VERSION
        )));
    }
    if target > CURRENT_VERSION {
        return Err(ReadlogError::StoreOpen(format!(
            "unknown schema version v{}",
            target
        )));
    }

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > found && m.version <= target)
    {
        let tx = conn.transaction().map_err(ReadlogError::open)?;
        (migration.apply)(&tx).map_err(|e| {
            ReadlogError::StoreOpen(format!(
                "upgrade to schema v{} ({}) failed: {}",
                migration.version, migration.description, e
            ))
        })?;
        tx.pragma_update(None, "user_version", migration.version)
            .map_err(ReadlogError::open)?;
        tx.commit().map_err(ReadlogError::open)?;
        log::info!(
            "Upgraded store schema to v{}: {}",
            migration.version,
            migration.description
        );
    }

    Ok(found.max(target))
}

fn create_books(tx: &Transaction) -> rusqlite::Result<()> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY NOT NULL,
            doc TEXT NOT NULL,
            title TEXT,
            author TEXT,
            genre TEXT,
            tag TEXT,
            created_at TEXT
        );
        CREATE INDEX IF NOT EXISTS books_by_title ON books(title);
        CREATE INDEX IF NOT EXISTS books_by_author ON books(author);
        CREATE INDEX IF NOT EXISTS books_by_genre ON books(genre);
        CREATE INDEX IF NOT EXISTS books_by_tag ON books(tag);
        CREATE INDEX IF NOT EXISTS books_by_created_at ON books(created_at);",
    )
}

fn add_catalog_indexes(tx: &Transaction) -> rusqlite::Result<()> {
    tx.execute_batch(
        "ALTER TABLE books ADD COLUMN language TEXT;
        ALTER TABLE books ADD COLUMN format TEXT;
        ALTER TABLE books ADD COLUMN rating INTEGER;
        CREATE INDEX IF NOT EXISTS books_by_language ON books(language);
        CREATE INDEX IF NOT EXISTS books_by_format ON books(format);
        CREATE INDEX IF NOT EXISTS books_by_rating ON books(rating);",
    )?;

    for (id, book) in readable_books(tx)? {
        tx.execute(
            "UPDATE books SET language = ?1, format = ?2, rating = ?3 WHERE id = ?4",
            params![book.language.as_str(), book.format.as_str(), book.rating, id],
        )?;
    }
    Ok(())
}

fn create_tag_usage(tx: &Transaction) -> rusqlite::Result<()> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS tag_usage (
            tag TEXT PRIMARY KEY NOT NULL,
            count INTEGER NOT NULL CHECK (count > 0)
        );
        CREATE UNIQUE INDEX IF NOT EXISTS tag_usage_by_tag ON tag_usage(tag);",
    )?;

    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for (_, book) in readable_books(tx)? {
        for tag in normalize_tags(book.tag_list()) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    let mut insert = tx.prepare("INSERT INTO tag_usage (tag, count) VALUES (?1, ?2)")?;
    for (tag, count) in &counts {
        insert.execute(params![tag, count])?;
    }
    log::debug!("Seeded tag usage index with {} tags", counts.len());
    Ok(())
}

fn drop_legacy_tag_index(tx: &Transaction) -> rusqlite::Result<()> {
    tx.execute_batch("DROP INDEX IF EXISTS books_by_tag;")
}

/// Every record whose document still parses. Unreadable documents are kept
/// in place and skipped with a warning.
fn readable_books(tx: &Transaction) -> rusqlite::Result<Vec<(String, StoredBook)>> {
    let mut stmt = tx.prepare("SELECT id, doc FROM books")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, doc)| match StoredBook::from_json(&doc) {
            Ok(book) => Some((id, book)),
            Err(e) => {
                log::warn!("Skipping unreadable record {} during upgrade: {}", id, e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |r| r.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    fn tag_counts(conn: &Connection) -> Vec<(String, u32)> {
        let mut stmt = conn
            .prepare("SELECT tag, count FROM tag_usage ORDER BY tag")
            .unwrap();
        stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap()
    }

    fn insert_current(conn: &Connection, id: &str, doc: &str) {
        conn.execute(
            "INSERT INTO books (id, doc, title, language, format, rating)
             VALUES (?1, ?2, 'T', 'English', 'Physical', 5)",
            params![id, doc],
        )
        .unwrap();
    }

    fn insert_v1(conn: &Connection, id: &str, doc: &str) {
        conn.execute(
            "INSERT INTO books (id, doc) VALUES (?1, ?2)",
            params![id, doc],
        )
        .unwrap();
    }

    #[test]
    fn fresh_database_reaches_current_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(migrate(&mut conn).unwrap(), CURRENT_VERSION);
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);

        let indexes = index_names(&conn);
        for expected in [
            "books_by_author",
            "books_by_created_at",
            "books_by_format",
            "books_by_genre",
            "books_by_language",
            "books_by_rating",
            "books_by_title",
            "tag_usage_by_tag",
        ] {
            assert!(indexes.contains(&expected.to_string()), "missing {}", expected);
        }
        assert!(!indexes.contains(&"books_by_tag".to_string()));
    }

    #[test]
    fn migrating_twice_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(migrate(&mut conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn upgrade_from_v1_backfills_columns_and_tag_counts() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_to(&mut conn, 1).unwrap();
        insert_v1(
            &conn,
            "a",
            r#"{"id":"a","title":"Emma","tag":"Romance","rating":7,"createdAt":"2020-01-01T00:00:00Z"}"#,
        );
        insert_v1(
            &conn,
            "b",
            r#"{"id":"b","title":"Dracula","tag":"none","format":"Audio","createdAt":"2020-01-02T00:00:00Z"}"#,
        );
        insert_v1(
            &conn,
            "c",
            r#"{"id":"c","title":"Persuasion","tags":["Romance"," Cozy "],"createdAt":"2020-01-03T00:00:00Z"}"#,
        );

        migrate(&mut conn).unwrap();

        let rating: u8 = conn
            .query_row("SELECT rating FROM books WHERE id = 'a'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rating, 7);
        let format: String = conn
            .query_row("SELECT format FROM books WHERE id = 'b'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(format, "Audio");

        assert_eq!(
            tag_counts(&conn),
            vec![("Cozy".to_string(), 1), ("Romance".to_string(), 2)]
        );
    }

    #[test]
    fn upgrade_from_v2_seeds_counts_from_tag_lists() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_to(&mut conn, 2).unwrap();
        insert_current(
            &conn,
            "a",
            r#"{"id":"a","title":"Dune","tags":["Epic","Desert"],"createdAt":"2020-01-01T00:00:00Z"}"#,
        );
        insert_current(
            &conn,
            "b",
            r#"{"id":"b","title":"Hyperion","tags":["Epic"],"createdAt":"2020-01-02T00:00:00Z"}"#,
        );

        assert_eq!(migrate(&mut conn).unwrap(), CURRENT_VERSION);
        assert_eq!(
            tag_counts(&conn),
            vec![("Desert".to_string(), 1), ("Epic".to_string(), 2)]
        );
        let indexes = index_names(&conn);
        assert!(indexes.contains(&"tag_usage_by_tag".to_string()));
        assert!(!indexes.contains(&"books_by_tag".to_string()));
    }

    #[test]
    fn upgrade_from_v3_keeps_counts_and_drops_legacy_index() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_to(&mut conn, 3).unwrap();
        assert!(index_names(&conn).contains(&"books_by_tag".to_string()));

        insert_current(
            &conn,
            "a",
            r#"{"id":"a","title":"Dune","tags":["Epic"],"createdAt":"2020-01-01T00:00:00Z"}"#,
        );
        conn.execute("INSERT INTO tag_usage (tag, count) VALUES ('Epic', 3)", [])
            .unwrap();

        assert_eq!(migrate(&mut conn).unwrap(), CURRENT_VERSION);
        assert_eq!(tag_counts(&conn), vec![("Epic".to_string(), 3)]);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert!(!index_names(&conn).contains(&"books_by_tag".to_string()));
    }

    #[test]
    fn unreadable_documents_do_not_block_upgrade() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_to(&mut conn, 1).unwrap();
        insert_v1(&conn, "broken", "{not json");

        assert_eq!(migrate(&mut conn).unwrap(), CURRENT_VERSION);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn newer_schema_is_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", CURRENT_VERSION + 1)
            .unwrap();
        assert!(matches!(
            migrate(&mut conn),
            Err(ReadlogError::StoreOpen(_))
        ));
    }
}
