//! On-disk shape of a book record and its read-time normalization.
//!
//! Records written by older versions of the app can lack fields that were
//! added later. [`StoredBook`] accepts all of them, and [`StoredBook::normalize`]
//! back-fills defaults so nothing above the store ever sees a partial record:
//!
//! | Field            | Missing means                                   |
//! |------------------|-------------------------------------------------|
//! | `tags`           | converted from the legacy single `tag`, or `[]` |
//! | `did_not_finish` | `false`                                         |
//! | `pages_read`     | absent                                          |
//! | `updated_at`     | same as `created_at`                            |
//!
//! Nothing is rewritten on read. A record only takes the new shape the next
//! time it is saved.

use crate::error::{ReadlogError, Result};
use crate::model::{Book, BookId, Format, Language};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Legacy single-tag value that meant "no tag".
const LEGACY_NO_TAG: &str = "none";

/// A timestamp as stored: RFC 3339 text, or epoch milliseconds from the
/// oldest records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    Rfc3339(DateTime<Utc>),
    Millis(i64),
}

impl StoredTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::Rfc3339(dt) => Some(*dt),
            StoredTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        }
    }
}

impl From<DateTime<Utc>> for StoredTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        StoredTimestamp::Rfc3339(dt)
    }
}

/// Reads an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBook {
    pub id: BookId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: Language,
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: Format,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Deprecated single-tag field from the first schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_not_finish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages_read: Option<u32>,
    pub created_at: Option<StoredTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<StoredTimestamp>,
}

impl StoredBook {
    pub fn from_json(doc: &str) -> Result<Self> {
        serde_json::from_str(doc).map_err(|e| ReadlogError::Read(format!("corrupt record: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The tag list this record carries once legacy data is accounted for.
    ///
    /// A present `tags` list always wins. Otherwise the legacy `tag` becomes
    /// a singleton, unless it is blank or the "none" marker. This is the only
    /// place legacy tags are interpreted; the schema backfill uses it too.
    pub fn tag_list(&self) -> Vec<String> {
        if let Some(tags) = &self.tags {
            return tags.clone();
        }
        match self.tag.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() && !t.eq_ignore_ascii_case(LEGACY_NO_TAG) => {
                vec![t.to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Back-fills defaults and converts stored timestamps.
    pub fn normalize(&self) -> Result<Book> {
        let created_at = self
            .created_at
            .as_ref()
            .and_then(StoredTimestamp::to_datetime)
            .ok_or_else(|| {
                ReadlogError::Read(format!("record {} has no valid creation time", self.id))
            })?;
        let updated_at = self
            .updated_at
            .as_ref()
            .and_then(StoredTimestamp::to_datetime)
            .unwrap_or(created_at);

        Ok(Book {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            pages: self.pages,
            language: self.language,
            format: self.format,
            vibes: self.tag_list(),
            rating: self.rating,
            notes: self.notes.clone(),
            did_not_finish: self.did_not_finish.unwrap_or(false),
            pages_read: self.pages_read,
            created_at,
            updated_at,
        })
    }
}

impl From<&Book> for StoredBook {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            pages: book.pages,
            language: book.language,
            format: book.format,
            tags: Some(book.vibes.clone()),
            tag: None,
            rating: book.rating,
            notes: book.notes.clone(),
            did_not_finish: Some(book.did_not_finish),
            pages_read: book.pages_read,
            created_at: Some(book.created_at.into()),
            updated_at: Some(book.updated_at.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewBook;

    #[test]
    fn current_records_survive_a_round_trip() {
        let book = Book::from_new(NewBook {
            title: "Dune".into(),
            vibes: Some(vec!["Sci-Fi".into()]),
            did_not_finish: true,
            pages_read: Some(40),
            ..Default::default()
        });
        let doc = StoredBook::from(&book).to_json().unwrap();
        let back = StoredBook::from_json(&doc).unwrap().normalize().unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn legacy_single_tag_becomes_singleton() {
        let doc = r#"{"id":"old-1","title":"Emma","tag":"Romance","createdAt":"2021-03-01T10:00:00Z"}"#;
        let book = StoredBook::from_json(doc).unwrap().normalize().unwrap();
        assert_eq!(book.vibes, vec!["Romance"]);
        assert!(!book.did_not_finish);
        assert_eq!(book.pages_read, None);
        assert_eq!(book.updated_at, book.created_at);
    }

    #[test]
    fn legacy_no_tag_marker_is_ignored() {
        for marker in ["none", "None", " ", ""] {
            let stored = StoredBook {
                id: BookId::from("x"),
                tag: Some(marker.to_string()),
                ..Default::default()
            };
            assert!(stored.tag_list().is_empty(), "marker {:?}", marker);
        }
    }

    #[test]
    fn tags_list_wins_over_legacy_tag() {
        let stored = StoredBook {
            id: BookId::from("x"),
            tags: Some(vec![]),
            tag: Some("Romance".into()),
            ..Default::default()
        };
        assert!(stored.tag_list().is_empty());
    }

    #[test]
    fn epoch_millis_timestamps_are_accepted() {
        let doc = r#"{"id":"old-2","createdAt":1609459200000,"updatedAt":1609545600000}"#;
        let book = StoredBook::from_json(doc).unwrap().normalize().unwrap();
        assert_eq!(book.created_at.to_rfc3339(), "2021-01-01T00:00:00+00:00");
        assert_eq!(book.updated_at.to_rfc3339(), "2021-01-02T00:00:00+00:00");
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let doc = r#"{"id":"n1","title":"X","author":null,"genre":null,"pages":null,
            "language":null,"format":null,"tags":null,"rating":null,"notes":null,
            "didNotFinish":null,"pagesRead":null,"createdAt":"2020-01-01T00:00:00Z",
            "updatedAt":null}"#;
        let book = StoredBook::from_json(doc).unwrap().normalize().unwrap();
        assert_eq!(book.title, "X");
        assert_eq!(book.author, "");
        assert_eq!(book.pages, 0);
        assert_eq!(book.rating, 0);
        assert_eq!(book.language, Language::English);
        assert_eq!(book.format, Format::Physical);
        assert!(book.vibes.is_empty());
        assert!(!book.did_not_finish);
        assert_eq!(book.pages_read, None);
        assert_eq!(book.updated_at, book.created_at);
    }

    #[test]
    fn missing_creation_time_is_a_read_error() {
        let stored = StoredBook {
            id: BookId::from("x"),
            ..Default::default()
        };
        assert!(matches!(stored.normalize(), Err(ReadlogError::Read(_))));
    }
}
