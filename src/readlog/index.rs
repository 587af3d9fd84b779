//! # Display Indexing
//!
//! Book ids are long and opaque, so the front end numbers the listing and
//! lets users refer to a book by its position (`readlog show 2`). The listing
//! order is the one the UI always uses: most recently updated first, ties
//! broken by creation time and then id so the numbering is stable.
//!
//! A selector is either a display index or an id. Ids may be abbreviated to
//! any unique prefix of at least [`MIN_ID_PREFIX`] characters. A number with
//! no book at that position is tried as an id prefix, so all-digit prefixes
//! still work.

use crate::error::{ReadlogError, Result};
use crate::model::Book;
use std::fmt;
use std::str::FromStr;

pub const MIN_ID_PREFIX: usize = 4;

/// A book together with its 1-based position in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBook {
    pub index: usize,
    pub book: Book,
}

/// A user input selecting one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookSelector {
    Index(usize),
    Id(String),
}

impl fmt::Display for BookSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSelector::Index(i) => write!(f, "{}", i),
            BookSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for BookSelector {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let leading_zero = s.len() > 1 && s.starts_with('0');
        if leading_zero && s.len() >= MIN_ID_PREFIX {
            return Ok(BookSelector::Id(s.to_string()));
        }
        if let Ok(n) = s.parse::<usize>() {
            if n == 0 {
                return Err("Indexes start at 1".to_string());
            }
            return Ok(BookSelector::Index(n));
        }
        if s.chars().count() >= MIN_ID_PREFIX {
            return Ok(BookSelector::Id(s.to_string()));
        }
        Err(format!(
            "Invalid selector: {} (use a list index or at least {} characters of an id)",
            s, MIN_ID_PREFIX
        ))
    }
}

/// Sorts books into listing order: most recently updated first.
pub fn sort_recent_first(books: &mut [Book]) {
    books.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });
}

/// Assigns display indexes in listing order.
pub fn index_books(mut books: Vec<Book>) -> Vec<DisplayBook> {
    sort_recent_first(&mut books);
    books
        .into_iter()
        .enumerate()
        .map(|(i, book)| DisplayBook { index: i + 1, book })
        .collect()
}

/// Finds the listed book a selector points at.
pub fn resolve<'a>(listed: &'a [DisplayBook], selector: &BookSelector) -> Result<&'a DisplayBook> {
    match selector {
        BookSelector::Index(n) => {
            if let Some(found) = listed.iter().find(|db| db.index == *n) {
                return Ok(found);
            }
            let digits = n.to_string();
            if digits.len() >= MIN_ID_PREFIX {
                if let Ok(found) = resolve_id(listed, &digits) {
                    return Ok(found);
                }
            }
            Err(ReadlogError::Api(format!("No book at index {}", n)))
        }
        BookSelector::Id(id) => resolve_id(listed, id),
    }
}

fn resolve_id<'a>(listed: &'a [DisplayBook], id: &str) -> Result<&'a DisplayBook> {
    if let Some(exact) = listed.iter().find(|db| db.book.id.as_str() == id) {
        return Ok(exact);
    }
    let matches: Vec<&DisplayBook> = listed
        .iter()
        .filter(|db| db.book.id.as_str().starts_with(id))
        .collect();
    match matches.as_slice() {
        [single] => Ok(*single),
        [] => Err(ReadlogError::Api(format!("No book with id {}", id))),
        _ => Err(ReadlogError::Api(format!(
            "Id prefix {} matches {} books",
            id,
            matches.len()
        ))),
    }
}
