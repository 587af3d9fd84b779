//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for
//! every front end. It parses user selectors, carries the loaded
//! configuration into the commands that need it, and returns structured
//! `Result<CmdResult>` values. It never prints.
//!
//! `ReadlogApi<S: LocalStore>` is generic over the store:
//! - Production: `ReadlogApi<StoreHandle>` (lazily opened SQLite file)
//! - Testing: `ReadlogApi<BookStore<MemBackend>>`
//!
//! The raw store contract (create, list, get, update, delete, known tags,
//! record usage) stays reachable through [`ReadlogApi::store`] for front ends
//! that manage their own listing.

use crate::commands;
use crate::config::ReadlogConfig;
use crate::error::{ReadlogError, Result};
use crate::index::BookSelector;
use crate::model::{BookChanges, NewBook};
use crate::store::{IndexKey, LocalStore};

pub struct ReadlogApi<S: LocalStore> {
    store: S,
    config: ReadlogConfig,
}

impl<S: LocalStore> ReadlogApi<S> {
    pub fn new(store: S, config: ReadlogConfig) -> Self {
        Self { store, config }
    }

    /// Opens and upgrades the store if that has not happened yet.
    pub fn initialize(&self) -> Result<()> {
        self.store.initialize()
    }

    pub fn add_book(&self, new: NewBook) -> Result<commands::CmdResult> {
        commands::create::run(&self.store, new)
    }

    pub fn list_books(&self, filters: &[IndexKey]) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, filters)
    }

    pub fn view_book(&self, selector: &str) -> Result<commands::CmdResult> {
        let selector = parse_selector(selector)?;
        commands::view::run(&self.store, &selector)
    }

    pub fn update_book(&self, selector: &str, changes: BookChanges) -> Result<commands::CmdResult> {
        let selector = parse_selector(selector)?;
        commands::update::run(&self.store, &selector, changes)
    }

    pub fn delete_book(&self, selector: &str) -> Result<commands::CmdResult> {
        let selector = parse_selector(selector)?;
        commands::delete::run(&self.store, &selector)
    }

    pub fn tag_usage(&self) -> Result<commands::CmdResult> {
        commands::tags::usage(&self.store)
    }

    /// Suggestions for a tag being typed, skipping tags in `exclude`.
    pub fn suggest_tags(&self, prefix: &str, exclude: &[String]) -> Result<commands::CmdResult> {
        commands::tags::suggest(
            &self.store,
            &self.config.suggested_vibes,
            prefix,
            exclude,
            self.config.suggestion_limit,
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn parse_selector(input: &str) -> Result<BookSelector> {
    input.parse().map_err(ReadlogError::Api)
}

pub use commands::{CmdMessage, CmdResult, MessageLevel};
