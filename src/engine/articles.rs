//! engine::articles
//!
//! The caller-facing facade over the editing primitives.
//!
//! # Architecture
//!
//! [`Articles`] owns one of each component and the stores behind them:
//!
//! ```text
//! Articles
//!   ├── TokenAllocator  -> CounterStore
//!   ├── EditLock        -> ExpiringStore
//!   ├── VersionLog      -> VersionStore + DocumentStore
//!   └── status          -> DocumentStore
//! ```
//!
//! # Error Policy
//!
//! - Creation and version appends propagate store failures and leave prior
//!   state untouched
//! - Lock operations never fail: an unreachable lock store reads as
//!   "unlocked" and is logged at warn level
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use folio::core::article::Status;
//! use folio::core::clock::SystemClock;
//! use folio::core::types::{EditorId, ScopeId};
//! use folio::engine::{Articles, DocumentDraft, Edit};
//!
//! let articles = Articles::in_memory(Arc::new(SystemClock));
//! let scope = ScopeId::new("acme").unwrap();
//! let editor = EditorId::new("u7").unwrap();
//!
//! let mut doc = articles.create(&scope, DocumentDraft::default()).unwrap();
//! assert_eq!(doc.token().as_str(), "1");
//! assert_eq!(articles.display_title(&doc), "Untitled");
//!
//! articles.save(&mut doc, Edit::title("Hello"), Some(&editor)).unwrap();
//! articles.append_version(&mut doc, Some(&editor)).unwrap();
//! articles.transition_status(&mut doc, Status::Publish).unwrap();
//! assert!(doc.published_at().is_some());
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::article::{
    display_title, Document, NewDocument, Status, StatusFilter, Version, DEFAULT_UNTITLED,
};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{Config, ConfigError};
use crate::core::ops::{transition, EditLock, StatusChange, TokenAllocator, VersionLog};
use crate::core::types::{DocumentId, EditorId, ScopeId, Token, TypeError};
use crate::store::{DocumentStore, StoreError, Stores};

/// Errors from article operations.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no document with token {token} in scope {scope}")]
    NotFound { scope: ScopeId, token: Token },

    #[error("no document imported from '{old_url}' in scope {scope}")]
    OldUrlNotFound { scope: ScopeId, old_url: String },

    #[error("document {0} does not exist")]
    UnknownDocument(DocumentId),
}

impl ArticleError {
    /// Whether the failure was a store outage.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ArticleError::Store(e) if e.is_unavailable())
    }
}

/// Initial content for a new document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDraft {
    pub title: String,
    pub body: String,
    pub old_url: Option<String>,
}

/// A content change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edit {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Edit {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }

    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }
}

/// Composes allocation, locking, versioning and status for callers.
#[derive(Clone)]
pub struct Articles {
    documents: Arc<dyn DocumentStore>,
    allocator: TokenAllocator,
    lock: EditLock,
    log: VersionLog,
    clock: Arc<dyn Clock>,
    untitled: String,
}

impl Articles {
    /// Build from a store bundle with default lock TTL and placeholder.
    pub fn new(stores: Stores, clock: Arc<dyn Clock>) -> Self {
        Self {
            allocator: TokenAllocator::new(stores.counters.clone()),
            lock: EditLock::new(stores.cache.clone()),
            log: VersionLog::new(
                stores.versions.clone(),
                stores.documents.clone(),
                clock.clone(),
            ),
            documents: stores.documents,
            clock,
            untitled: DEFAULT_UNTITLED.to_string(),
        }
    }

    /// Process-local stores, for tests and embedding.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(Stores::in_memory(clock.clone()), clock)
    }

    /// File-backed stores in the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns a store error if the data directory cannot be prepared.
    pub fn open(config: &Config) -> Result<Self, ArticleError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let stores = Stores::open(&config.paths(), clock.clone())?;
        debug!(data_dir = %config.data_dir().display(), "opened file stores");
        Ok(Self::new(stores, clock)
            .with_lock_ttl(config.lock_ttl())
            .with_untitled(config.untitled()))
    }

    /// Replace the edit-lock TTL.
    pub fn with_lock_ttl(mut self, ttl: Duration) -> Self {
        self.lock = EditLock::with_ttl(self.lock.cache(), ttl);
        self
    }

    /// Replace the blank-title placeholder.
    pub fn with_untitled(mut self, untitled: impl Into<String>) -> Self {
        self.untitled = untitled.into();
        self
    }

    // =========================================================================
    // Creation and lookup
    // =========================================================================

    /// Mint the next token for `scope` without creating a document.
    pub fn allocate_token(&self, scope: &ScopeId) -> Result<Token, ArticleError> {
        Ok(self.allocator.allocate(scope)?)
    }

    /// Create a draft in `scope`, minting its token.
    ///
    /// # Errors
    ///
    /// If the counter store is unavailable no document is stored. A
    /// duplicate token reported by the document store is surfaced as is.
    pub fn create(&self, scope: &ScopeId, draft: DocumentDraft) -> Result<Document, ArticleError> {
        let token = self.allocator.allocate(scope)?;
        let new = NewDocument {
            title: draft.title,
            body: draft.body,
            old_url: draft.old_url,
            ..NewDocument::new(scope.clone(), token)
        };
        let document = self.documents.create(new)?;
        info!(scope = %scope, token = %document.token(), id = %document.id(), "document created");
        Ok(document)
    }

    /// Read a document by its durable id.
    pub fn get(&self, id: DocumentId) -> Result<Document, ArticleError> {
        self.documents
            .read(id)?
            .ok_or(ArticleError::UnknownDocument(id))
    }

    /// Look up a document by its public token.
    pub fn find(&self, scope: &ScopeId, token: &Token) -> Result<Document, ArticleError> {
        self.documents
            .find_by_token(scope, token)?
            .ok_or_else(|| ArticleError::NotFound {
                scope: scope.clone(),
                token: token.clone(),
            })
    }

    /// Look up an imported document by its previous location.
    pub fn find_by_old_url(&self, scope: &ScopeId, old_url: &str) -> Result<Document, ArticleError> {
        self.documents
            .find_by_old_url(scope, old_url)?
            .ok_or_else(|| ArticleError::OldUrlNotFound {
                scope: scope.clone(),
                old_url: old_url.to_string(),
            })
    }

    /// Documents in `scope` selected by `filter`, in token order.
    pub fn list(&self, scope: &ScopeId, filter: StatusFilter) -> Result<Vec<Document>, ArticleError> {
        Ok(self.documents.list(scope, filter)?)
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Apply `edit`, count the save, and persist.
    ///
    /// Only the edited fields and the save bookkeeping are written, and the
    /// save is counted against the stored save count, so a stale `document`
    /// cannot undo another editor's work. On success `document` is replaced
    /// by the stored copy; on failure it is left untouched.
    ///
    /// The save count grows even when the edit changes nothing, matching a
    /// client that saves without checking for differences.
    pub fn save(
        &self,
        document: &mut Document,
        edit: Edit,
        editor: Option<&EditorId>,
    ) -> Result<(), ArticleError> {
        let stored = self.documents.record_save(
            document.id(),
            edit.title.as_deref(),
            edit.body.as_deref(),
            editor,
        )?;
        debug!(id = %stored.id(), save_count = stored.save_count(), "document saved");
        *document = stored;
        Ok(())
    }

    /// Snapshot the document's current content.
    pub fn append_version(
        &self,
        document: &mut Document,
        editor: Option<&EditorId>,
    ) -> Result<Version, ArticleError> {
        Ok(self.log.append(document, editor)?)
    }

    /// Whether content was saved since the last snapshot.
    pub fn has_unsaved_version(&self, document: &Document) -> bool {
        document.has_unsaved_version()
    }

    /// All versions of `document`, newest first.
    pub fn versions(&self, document: &Document) -> Result<Vec<Version>, ArticleError> {
        Ok(self.log.list(document)?)
    }

    /// Presentation title, substituting the placeholder for a blank one.
    pub fn display_title<'a>(&'a self, document: &'a Document) -> &'a str {
        display_title(document, &self.untitled)
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Move `document` to `status` and persist the result.
    ///
    /// Only `status` and, on entry into publish, `published_at` are
    /// written. A transition that changes nothing writes nothing. On success
    /// `document` is replaced by the stored copy; on failure it is left
    /// untouched, so a retry reports the same change.
    pub fn transition_status(
        &self,
        document: &mut Document,
        status: Status,
    ) -> Result<StatusChange, ArticleError> {
        let mut next = document.clone();
        let change = transition(&mut next, status, self.clock.now());
        if !change.changed() {
            return Ok(change);
        }

        let stamp = if change.published {
            next.published_at()
        } else {
            None
        };
        *document = self.documents.set_status(next.id(), next.status(), stamp)?;
        Ok(change)
    }

    // =========================================================================
    // Edit lock
    // =========================================================================

    /// The underlying lock, for callers that want store errors.
    pub fn edit_lock(&self) -> &EditLock {
        &self.lock
    }

    /// Record `editor` as active on `document`.
    ///
    /// Returns false if the lock store could not be written; editing should
    /// continue regardless.
    pub fn acquire_lock(&self, document: DocumentId, editor: &EditorId) -> bool {
        match self.lock.acquire(document, editor) {
            Ok(()) => true,
            Err(e) => {
                warn!(document = %document, error = %e, "could not record edit lock");
                false
            }
        }
    }

    /// Who is editing `document`, if anyone.
    pub fn lock_holder(&self, document: DocumentId) -> Option<EditorId> {
        self.lock.holder(document)
    }

    pub fn is_locked(&self, document: DocumentId) -> bool {
        self.lock.is_locked(document)
    }

    pub fn is_locked_by(&self, document: DocumentId, editor: &EditorId) -> bool {
        self.lock.is_locked_by(document, editor)
    }

    /// Clear `document`'s lock if `editor` holds it.
    pub fn release_lock(&self, document: DocumentId, editor: &EditorId) -> bool {
        match self.lock.release(document, editor) {
            Ok(released) => released,
            Err(e) => {
                warn!(document = %document, error = %e, "could not release edit lock");
                false
            }
        }
    }
}
