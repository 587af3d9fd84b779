//! # Readlog Architecture
//!
//! Readlog is a personal reading log: books with metadata and free-text
//! "vibe" tags, kept in a local SQLite file. The library holds everything;
//! the binary is one thin client of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, print.rs, logger.rs)                │
//! │  - Parses arguments, prints results, owns the exit code     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade: parses selectors, passes config along       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - One module per user action, returns CmdResult            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - LocalStore trait, BookStore over SQLite or memory        │
//! │  - Versioned schema with in-place upgrades                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr. Diagnostics go
//! through the `log` facade; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: entry point for all operations
//! - [`commands`]: logic for each user action
//! - [`store`]: persistence, schema versions, the tag usage index
//! - [`model`]: `Book`, `NewBook`, `BookChanges`
//! - [`tags`]: tag normalization and suggestion ranking
//! - [`index`]: display indexes and selectors
//! - [`config`]: `config.json` settings
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod store;
pub mod tags;
