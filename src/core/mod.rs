//! core
//!
//! Core domain types, schemas, and operations for Folio.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ScopeId, EditorId, DocumentId, Token, UtcTimestamp
//! - [`clock`] - Injected time source
//! - [`article`] - Document and version schema, display helpers
//! - [`ops`] - Token allocation, edit lock, version log, status machine
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for Folio storage
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Stored values are never rewritten for presentation
//! - Time comes from an injected clock, so expiry is deterministic in tests

pub mod article;
pub mod clock;
pub mod config;
pub mod ops;
pub mod paths;
pub mod types;
