use crate::model::BookId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadlogError {
    #[error("Could not open store: {0}")]
    StoreOpen(String),

    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl ReadlogError {
    /// Classifies a storage error raised while writing.
    ///
    /// Constraint violations (duplicate keys, unique indexes) get their own
    /// variant so callers can tell a benign race from a real fault.
    pub fn write(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => {
                ReadlogError::Constraint(err.to_string())
            }
            _ => ReadlogError::Write(err.to_string()),
        }
    }

    pub fn read(err: rusqlite::Error) -> Self {
        ReadlogError::Read(err.to_string())
    }

    pub fn open(err: rusqlite::Error) -> Self {
        ReadlogError::StoreOpen(err.to_string())
    }

    /// True for failures the storage raised while writing.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, ReadlogError::Write(_) | ReadlogError::Constraint(_))
    }
}

pub type Result<T> = std::result::Result<T, ReadlogError>;
