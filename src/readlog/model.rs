use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque book identifier.
///
/// New books get a UUID v4 string, but records written by older versions may
/// carry any string, so the id is never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Swedish,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Swedish => "Swedish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "swedish" | "sv" => Ok(Language::Swedish),
            _ => Err(format!("Unknown language: {} (expected English or Swedish)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "E-book")]
    EBook,
    #[default]
    Physical,
    Audio,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::EBook => "E-book",
            Format::Physical => "Physical",
            Format::Audio => "Audio",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "e-book" | "ebook" => Ok(Format::EBook),
            "physical" => Ok(Format::Physical),
            "audio" | "audiobook" => Ok(Format::Audio),
            _ => Err(format!(
                "Unknown format: {} (expected E-book, Physical or Audio)",
                s
            )),
        }
    }
}

/// A book as every consumer sees it: complete, with defaults back-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub pages: u32,
    pub language: Language,
    pub format: Format,
    pub vibes: Vec<String>,
    pub rating: u8,
    pub notes: String,
    pub did_not_finish: bool,
    /// Only meaningful when `did_not_finish` is set.
    pub pages_read: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Builds a fresh record from a payload, assigning id and timestamps.
    pub fn from_new(new: NewBook) -> Self {
        let now = Utc::now();
        Self {
            id: BookId::generate(),
            title: new.title,
            author: new.author,
            genre: new.genre,
            pages: new.pages,
            language: new.language,
            format: new.format,
            vibes: new.vibes.unwrap_or_default(),
            rating: new.rating,
            notes: new.notes,
            did_not_finish: new.did_not_finish,
            pages_read: new.pages_read,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a change set onto this record.
    ///
    /// Identity and creation time are untouched; the caller refreshes
    /// `updated_at`.
    pub fn apply(&mut self, changes: BookChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        if let Some(genre) = changes.genre {
            self.genre = genre;
        }
        if let Some(pages) = changes.pages {
            self.pages = pages;
        }
        if let Some(language) = changes.language {
            self.language = language;
        }
        if let Some(format) = changes.format {
            self.format = format;
        }
        if let Some(vibes) = changes.vibes {
            self.vibes = vibes;
        }
        if let Some(rating) = changes.rating {
            self.rating = rating;
        }
        if let Some(notes) = changes.notes {
            self.notes = notes;
        }
        if let Some(did_not_finish) = changes.did_not_finish {
            self.did_not_finish = did_not_finish;
        }
        if let Some(pages_read) = changes.pages_read {
            self.pages_read = pages_read;
        }
    }
}

/// Payload for creating a book: everything but identity and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub pages: u32,
    pub language: Language,
    pub format: Format,
    /// `None` is stored as an empty list.
    pub vibes: Option<Vec<String>>,
    pub rating: u8,
    pub notes: String,
    pub did_not_finish: bool,
    pub pages_read: Option<u32>,
}

/// A partial update. `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub pages: Option<u32>,
    pub language: Option<Language>,
    pub format: Option<Format>,
    /// `Some(vec![])` clears the list.
    pub vibes: Option<Vec<String>>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub did_not_finish: Option<bool>,
    /// `Some(None)` clears the value.
    pub pages_read: Option<Option<u32>>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        *self == BookChanges::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> NewBook {
        NewBook {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            pages: 412,
            rating: 9,
            vibes: Some(vec!["Sci-Fi".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn from_new_assigns_identity_and_equal_timestamps() {
        let book = Book::from_new(dune());
        assert!(!book.id.as_str().is_empty());
        assert_eq!(book.created_at, book.updated_at);
        assert_eq!(book.vibes, vec!["Sci-Fi"]);
    }

    #[test]
    fn from_new_defaults_missing_vibes_to_empty() {
        let book = Book::from_new(NewBook {
            vibes: None,
            ..dune()
        });
        assert!(book.vibes.is_empty());
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut book = Book::from_new(dune());
        let before = book.clone();
        book.apply(BookChanges {
            rating: Some(10),
            ..Default::default()
        });

        assert_eq!(book.rating, 10);
        assert_eq!(book.title, before.title);
        assert_eq!(book.vibes, before.vibes);
        assert_eq!(book.id, before.id);
    }

    #[test]
    fn apply_can_clear_vibes_and_pages_read() {
        let mut book = Book::from_new(NewBook {
            did_not_finish: true,
            pages_read: Some(120),
            ..dune()
        });
        book.apply(BookChanges {
            vibes: Some(vec![]),
            pages_read: Some(None),
            ..Default::default()
        });

        assert!(book.vibes.is_empty());
        assert_eq!(book.pages_read, None);
    }

    #[test]
    fn empty_changes_are_detected() {
        assert!(BookChanges::default().is_empty());
        assert!(!BookChanges {
            notes: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn format_and_language_parse_leniently() {
        assert_eq!("ebook".parse::<Format>().unwrap(), Format::EBook);
        assert_eq!("E-book".parse::<Format>().unwrap(), Format::EBook);
        assert_eq!("swedish".parse::<Language>().unwrap(), Language::Swedish);
        assert!("Klingon".parse::<Language>().is_err());
    }

    #[test]
    fn format_serializes_with_display_names() {
        let json = serde_json::to_string(&Format::EBook).unwrap();
        assert_eq!(json, "\"E-book\"");
    }
}
