//! core::ops::version_log
//!
//! Append-only history of document content.
//!
//! # Architecture
//!
//! Appending is two store calls:
//!
//! 1. [`VersionStore::append`] persists the snapshot (all or nothing)
//! 2. [`DocumentStore::set_last_version_save_count`] records that the
//!    snapshot reflects the document's current save count
//!
//! If step 1 fails nothing changes and the caller may retry. If the process
//! dies between the steps, the stored counter lags the log and
//! [`has_unsaved_version`] reports a false positive; no content is lost.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use folio::core::article::NewDocument;
//! use folio::core::clock::SystemClock;
//! use folio::core::ops::version_log::{has_unsaved_version, VersionLog};
//! use folio::core::types::{EditorId, ScopeId, Token};
//! use folio::store::Stores;
//!
//! let stores = Stores::in_memory(Arc::new(SystemClock));
//! let log = VersionLog::new(stores.versions.clone(), stores.documents.clone(), Arc::new(SystemClock));
//!
//! let scope = ScopeId::new("acme").unwrap();
//! let doc = stores.documents.create(NewDocument::new(scope, Token::from_sequence(1))).unwrap();
//! let mut doc = stores.documents.record_save(doc.id(), Some("Hello"), None, None).unwrap();
//! assert!(has_unsaved_version(&doc));
//!
//! let version = log.append(&mut doc, Some(&EditorId::new("u7").unwrap())).unwrap();
//! assert!(!has_unsaved_version(&doc));
//! assert_eq!(log.list(&doc).unwrap()[0].id, version.id);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::core::article::{Actor, Document, Version};
use crate::core::clock::Clock;
use crate::core::types::EditorId;
use crate::store::{DocumentStore, StoreError, VersionStore};

/// Whether `document` has content saves not captured by a version.
pub fn has_unsaved_version(document: &Document) -> bool {
    document.has_unsaved_version()
}

/// Writes and reads a document's version history.
#[derive(Clone)]
pub struct VersionLog {
    versions: Arc<dyn VersionStore>,
    documents: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl VersionLog {
    pub fn new(
        versions: Arc<dyn VersionStore>,
        documents: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            versions,
            documents,
            clock,
        }
    }

    /// Snapshot `document`'s current title and body.
    ///
    /// The version is attributed to `editor`, or to the document's scope
    /// when no editor is given. On success `document`'s
    /// `last_version_save_count` equals its `save_count`.
    ///
    /// # Errors
    ///
    /// If the version store rejects the write, neither the log nor the
    /// document counter changes.
    pub fn append(
        &self,
        document: &mut Document,
        editor: Option<&EditorId>,
    ) -> Result<Version, StoreError> {
        let actor = Actor::resolve(editor, document.scope());
        let version = Version::snapshot(document, actor, self.clock.now());
        self.versions.append(&version)?;

        let save_count = document.save_count();
        self.documents
            .set_last_version_save_count(document.id(), save_count)?;
        document.mark_versioned(save_count);

        debug!(
            document = %document.id(),
            version = %version.id,
            actor = %version.actor,
            save_count,
            "version appended"
        );
        Ok(version)
    }

    /// All versions of `document`, newest first.
    pub fn list(&self, document: &Document) -> Result<Vec<Version>, StoreError> {
        self.versions.list(document.id())
    }
}
