//! core::article
//!
//! Article records and their presentation.
//!
//! # Modules
//!
//! - [`schema`] - Stored document and version records
//! - [`display`] - Read-time substitutions (blank title placeholder)
//!
//! # Lifecycle
//!
//! A document is created as a draft carrying a freshly minted token, is
//! saved any number of times (each save bumps `save_count`), may be
//! snapshotted into its version log, and moves between draft, publish and
//! trash through [`crate::core::ops::status`].

pub mod display;
pub mod schema;

pub use display::{display_title, DEFAULT_UNTITLED};
pub use schema::{
    Actor, ArticleValueError, Document, NewDocument, Status, StatusFilter, Version,
};
