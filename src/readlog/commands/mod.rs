use crate::index::DisplayBook;
use crate::model::Book;
use crate::tags::TagUsage;

pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod tags;
pub mod update;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self::at(MessageLevel::Info, content)
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::at(MessageLevel::Success, content)
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self::at(MessageLevel::Warning, content)
    }

    fn at(level: MessageLevel, content: impl Into<String>) -> Self {
        Self {
            level,
            content: content.into(),
        }
    }
}

/// What a command produced, for the front end to render.
#[derive(Debug, Default)]
pub struct CmdResult {
    /// Books created, changed, or removed by the command.
    pub affected_books: Vec<Book>,
    /// Books to display, with their listing positions.
    pub listed_books: Vec<DisplayBook>,
    pub tag_usage: Vec<TagUsage>,
    pub suggestions: Vec<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_books(mut self, books: Vec<Book>) -> Self {
        self.affected_books = books;
        self
    }

    pub fn with_listed_books(mut self, books: Vec<DisplayBook>) -> Self {
        self.listed_books = books;
        self
    }

    pub fn with_tag_usage(mut self, usage: Vec<TagUsage>) -> Self {
        self.tag_usage = usage;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}
