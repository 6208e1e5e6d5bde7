//! Folio - primitives for collaboratively edited articles
//!
//! Folio manages documents that move through a draft/publish/trash
//! lifecycle while several editors work on them. It provides the pieces
//! that make that safe without a transactional database:
//!
//! - scope-unique public tokens minted from an atomic counter
//! - an advisory, self-expiring "who is editing" lock
//! - an append-only version log with an unsaved-changes signal
//! - a status machine that stamps publication time
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - The `Articles` facade composing the primitives
//! - [`core`] - Domain types, schemas, configuration, and the primitives
//! - [`store`] - Storage traits with in-memory and file-backed implementations
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! 1. No two documents in a scope share a token
//! 2. A document is never stored without a token
//! 3. `last_version_save_count <= save_count`
//! 4. Stored titles are never replaced by the display placeholder

pub mod cli;
pub mod core;
pub mod engine;
pub mod store;
pub mod ui;
