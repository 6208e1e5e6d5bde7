//! core::ops::edit_lock
//!
//! Advisory, self-expiring edit lock per document.
//!
//! # Architecture
//!
//! The lock is a marker in an expiring key-value store:
//! `/articles/<document_id>/locked_by` holds the active editor's id and
//! expires after a fixed window (10 seconds by default). Editors re-acquire
//! on a heartbeat while they work; a crashed client simply stops
//! refreshing and the marker lapses.
//!
//! # Semantics
//!
//! - `acquire` always succeeds and always overwrites: last writer wins
//! - A missing or expired marker reads as unlocked
//! - The lock never blocks or rejects a write; it only tells the UI who
//!   else is probably editing
//!
//! # Degraded mode
//!
//! The `query*` methods return store errors to the caller. The
//! [`EditLock::holder`], [`EditLock::is_locked`] and
//! [`EditLock::is_locked_by`] helpers log a warning and report "unlocked"
//! instead, so editing never depends on the lock store's health.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use folio::core::clock::ManualClock;
//! use folio::core::ops::edit_lock::EditLock;
//! use folio::core::types::{DocumentId, EditorId};
//! use folio::store::MemoryExpiringStore;
//!
//! let clock = Arc::new(ManualClock::new());
//! let lock = EditLock::new(Arc::new(MemoryExpiringStore::new(clock.clone())));
//! let doc = DocumentId::generate();
//! let alice = EditorId::new("alice").unwrap();
//!
//! lock.acquire(doc, &alice).unwrap();
//! assert!(lock.is_locked_by(doc, &alice));
//!
//! clock.advance(Duration::from_secs(11));
//! assert!(!lock.is_locked(doc));
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::types::{DocumentId, EditorId};
use crate::store::{ExpiringStore, StoreError};

/// Default lifetime of a lock marker.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(10);

/// Store key of a document's lock marker.
pub fn lock_key(document: DocumentId) -> String {
    format!("/articles/{}/locked_by", document)
}

/// Advisory edit lock backed by an expiring store.
#[derive(Clone)]
pub struct EditLock {
    cache: Arc<dyn ExpiringStore>,
    ttl: Duration,
}

impl EditLock {
    /// Create a lock with the default TTL.
    pub fn new(cache: Arc<dyn ExpiringStore>) -> Self {
        Self::with_ttl(cache, DEFAULT_LOCK_TTL)
    }

    /// Create a lock with a custom TTL.
    pub fn with_ttl(cache: Arc<dyn ExpiringStore>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// The lifetime of a marker written by [`EditLock::acquire`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub(crate) fn cache(&self) -> Arc<dyn ExpiringStore> {
        self.cache.clone()
    }

    /// Record `editor` as the active editor of `document`.
    ///
    /// Overwrites any current holder and restarts the expiry window.
    pub fn acquire(&self, document: DocumentId, editor: &EditorId) -> Result<(), StoreError> {
        self.cache
            .set_with_expiry(&lock_key(document), editor.as_str(), self.ttl)?;
        debug!(document = %document, editor = %editor, ttl_ms = self.ttl.as_millis() as u64, "edit lock acquired");
        Ok(())
    }

    /// The current holder of `document`'s lock.
    ///
    /// Returns `Ok(None)` when unlocked or expired.
    pub fn query(&self, document: DocumentId) -> Result<Option<EditorId>, StoreError> {
        let Some(raw) = self.cache.get(&lock_key(document))? else {
            return Ok(None);
        };
        match EditorId::new(raw) {
            Ok(editor) => Ok(Some(editor)),
            Err(e) => Err(StoreError::Corrupt(format!(
                "lock marker for document {}: {}",
                document, e
            ))),
        }
    }

    /// Clear `document`'s lock if `editor` holds it.
    ///
    /// Returns whether a marker was removed. The check and the delete are
    /// two store calls; a concurrent acquire in between may be lost, which
    /// the next heartbeat repairs.
    pub fn release(&self, document: DocumentId, editor: &EditorId) -> Result<bool, StoreError> {
        if self.query(document)?.as_ref() != Some(editor) {
            return Ok(false);
        }
        self.cache.delete(&lock_key(document))?;
        debug!(document = %document, editor = %editor, "edit lock released");
        Ok(true)
    }

    /// The current holder, treating a store failure as unlocked.
    pub fn holder(&self, document: DocumentId) -> Option<EditorId> {
        match self.query(document) {
            Ok(holder) => holder,
            Err(e) => {
                warn!(document = %document, error = %e, "lock store unavailable, treating as unlocked");
                None
            }
        }
    }

    /// Whether anyone currently holds `document`'s lock.
    pub fn is_locked(&self, document: DocumentId) -> bool {
        self.holder(document).is_some()
    }

    /// Whether `editor` currently holds `document`'s lock.
    pub fn is_locked_by(&self, document: DocumentId, editor: &EditorId) -> bool {
        self.holder(document).as_ref() == Some(editor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::store::MemoryExpiringStore;

    struct DownCache;

    impl ExpiringStore for DownCache {
        fn set_with_expiry(&self, _: &str, _: &str, _: Duration) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("cache down".into()))
        }

        fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("cache down".into()))
        }

        fn delete(&self, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("cache down".into()))
        }
    }

    fn setup() -> (Arc<ManualClock>, EditLock) {
        let clock = Arc::new(ManualClock::new());
        let lock = EditLock::new(Arc::new(MemoryExpiringStore::new(clock.clone())));
        (clock, lock)
    }

    fn editor(name: &str) -> EditorId {
        EditorId::new(name).unwrap()
    }

    #[test]
    fn key_format() {
        let id = DocumentId::generate();
        assert_eq!(lock_key(id), format!("/articles/{}/locked_by", id));
    }

    #[test]
    fn unlocked_by_default() {
        let (_clock, lock) = setup();
        let doc = DocumentId::generate();
        assert_eq!(lock.query(doc).unwrap(), None);
        assert!(!lock.is_locked(doc));
    }

    #[test]
    fn held_until_ttl_elapses() {
        let (clock, lock) = setup();
        let doc = DocumentId::generate();
        lock.acquire(doc, &editor("e")).unwrap();

        clock.advance(Duration::from_secs(9));
        assert_eq!(lock.query(doc).unwrap(), Some(editor("e")));

        clock.advance(Duration::from_secs(2));
        assert_eq!(lock.query(doc).unwrap(), None);
    }

    #[test]
    fn last_writer_wins() {
        let (_clock, lock) = setup();
        let doc = DocumentId::generate();
        lock.acquire(doc, &editor("e1")).unwrap();
        lock.acquire(doc, &editor("e2")).unwrap();
        assert_eq!(lock.query(doc).unwrap(), Some(editor("e2")));
        assert!(lock.is_locked_by(doc, &editor("e2")));
        assert!(!lock.is_locked_by(doc, &editor("e1")));
    }

    #[test]
    fn heartbeat_extends_hold() {
        let (clock, lock) = setup();
        let doc = DocumentId::generate();
        for _ in 0..5 {
            lock.acquire(doc, &editor("e")).unwrap();
            clock.advance(Duration::from_secs(8));
        }
        assert!(lock.is_locked_by(doc, &editor("e")));
    }

    #[test]
    fn locks_are_per_document() {
        let (_clock, lock) = setup();
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        lock.acquire(a, &editor("e")).unwrap();
        assert!(!lock.is_locked(b));
    }

    #[test]
    fn custom_ttl() {
        let clock = Arc::new(ManualClock::new());
        let lock = EditLock::with_ttl(
            Arc::new(MemoryExpiringStore::new(clock.clone())),
            Duration::from_secs(60),
        );
        let doc = DocumentId::generate();
        lock.acquire(doc, &editor("e")).unwrap();
        clock.advance(Duration::from_secs(30));
        assert!(lock.is_locked(doc));
        assert_eq!(lock.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn release_only_by_holder() {
        let (_clock, lock) = setup();
        let doc = DocumentId::generate();
        lock.acquire(doc, &editor("e1")).unwrap();

        assert!(!lock.release(doc, &editor("e2")).unwrap());
        assert!(lock.is_locked_by(doc, &editor("e1")));

        assert!(lock.release(doc, &editor("e1")).unwrap());
        assert!(!lock.is_locked(doc));
    }

    #[test]
    fn store_outage_reads_as_unlocked() {
        let lock = EditLock::new(Arc::new(DownCache));
        let doc = DocumentId::generate();
        assert!(lock.acquire(doc, &editor("e")).is_err());
        assert!(lock.query(doc).is_err());
        assert_eq!(lock.holder(doc), None);
        assert!(!lock.is_locked(doc));
        assert!(!lock.is_locked_by(doc, &editor("e")));
    }
}
