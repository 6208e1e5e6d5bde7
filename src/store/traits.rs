//! store::traits
//!
//! Collaborator interfaces consumed by the article core.
//!
//! # Design
//!
//! Four logically distinct capabilities:
//!
//! - [`CounterStore`] - durable integers with an atomic increment
//! - [`ExpiringStore`] - ephemeral key-value entries with a TTL
//! - [`DocumentStore`] - document records, unique per `(scope, token)`
//! - [`VersionStore`] - append-only version snapshots
//!
//! They may share one backing technology or use four; nothing in the core
//! depends on that choice. Implementations must be thread-safe
//! (Send + Sync) and must surface outages as [`StoreError::Unavailable`]
//! rather than returning empty results.

use std::time::Duration;

use thiserror::Error;

use crate::core::article::{Document, NewDocument, Status, StatusFilter, Version};
use crate::core::types::{DocumentId, EditorId, ScopeId, Token, UtcTimestamp};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document with this token already exists in the scope.
    #[error("duplicate token {token} in scope {scope}")]
    DuplicateToken { scope: ScopeId, token: Token },

    /// The record to update does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored data could not be parsed.
    #[error("corrupt store data: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether the error reflects an outage rather than a logical failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Durable counters with an atomic increment.
pub trait CounterStore: Send + Sync {
    /// Atomically add one to the counter at `key` and return the new value.
    ///
    /// A missing counter starts at zero, so the first increment returns 1.
    /// Concurrent callers (threads or processes) never observe the same
    /// returned value.
    fn increment(&self, key: &str) -> Result<u64, StoreError>;

    /// Read the counter at `key` without changing it.
    fn current(&self, key: &str) -> Result<Option<u64>, StoreError>;
}

/// Ephemeral key-value entries with an expiry.
pub trait ExpiringStore: Send + Sync {
    /// Write `value` at `key`, replacing any existing entry, expiring after `ttl`.
    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Read the entry at `key`.
    ///
    /// Returns `Ok(None)` when the entry is missing or has expired.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove the entry at `key`. Removing a missing entry is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Persistence for documents.
pub trait DocumentStore: Send + Sync {
    /// Store a new document and assign its durable id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateToken`] if the scope already holds a
    /// document with the same token.
    fn create(&self, new: NewDocument) -> Result<Document, StoreError>;

    /// Read a document by its durable id.
    fn read(&self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Apply a content save to the stored document.
    ///
    /// Replaces the content fields that are `Some`, counts the save against
    /// the stored save count, records `editor` and stamps `updated_at`.
    /// Every other field keeps its stored value. Returns the document as
    /// stored afterwards.
    fn record_save(
        &self,
        id: DocumentId,
        title: Option<&str>,
        body: Option<&str>,
        editor: Option<&EditorId>,
    ) -> Result<Document, StoreError>;

    /// Update only the lifecycle fields of a stored document.
    ///
    /// `published_at` replaces the stored stamp when given; `None` leaves
    /// the stored stamp as it is. Returns the document as stored afterwards.
    fn set_status(
        &self,
        id: DocumentId,
        status: Status,
        published_at: Option<&UtcTimestamp>,
    ) -> Result<Document, StoreError>;

    /// Update only the version save counter of a stored document.
    fn set_last_version_save_count(&self, id: DocumentId, value: u64) -> Result<(), StoreError>;

    /// Find the document carrying `token` in `scope`.
    fn find_by_token(&self, scope: &ScopeId, token: &Token)
        -> Result<Option<Document>, StoreError>;

    /// Find the document imported from `old_url` in `scope`.
    ///
    /// Documents without an old URL are never matched.
    fn find_by_old_url(&self, scope: &ScopeId, old_url: &str)
        -> Result<Option<Document>, StoreError>;

    /// List documents in `scope` selected by `filter`, in token order.
    fn list(&self, scope: &ScopeId, filter: StatusFilter) -> Result<Vec<Document>, StoreError>;
}

/// Append-only persistence for version snapshots.
pub trait VersionStore: Send + Sync {
    /// Append a version. The write either lands completely or not at all.
    fn append(&self, version: &Version) -> Result<(), StoreError>;

    /// All versions of a document, newest first.
    fn list(&self, document: DocumentId) -> Result<Vec<Version>, StoreError>;
}

/// Order versions newest first.
///
/// `versions` must be in insertion order. Versions sharing a creation
/// instant keep reverse insertion order, so the later append comes first.
pub fn newest_first(mut versions: Vec<Version>) -> Vec<Version> {
    versions.reverse();
    versions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    versions
}

/// Sort documents by their token's counter value.
pub(crate) fn sort_by_token(documents: &mut [Document]) {
    documents.sort_by_key(|doc| doc.token().sequence());
}
