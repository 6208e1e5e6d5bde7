//! store::memory
//!
//! In-process implementations of the store traits.
//!
//! Every store guards its state with a single `Mutex`, which makes each
//! operation atomic within the process. Nothing survives a restart. A
//! poisoned mutex is reported as [`StoreError::Unavailable`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::traits::{
    newest_first, sort_by_token, CounterStore, DocumentStore, ExpiringStore, StoreError,
    VersionStore,
};
use crate::core::article::{Document, NewDocument, Status, StatusFilter, Version};
use crate::core::clock::Clock;
use crate::core::types::{DocumentId, EditorId, ScopeId, Token, UtcTimestamp};

fn guard<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable(format!("{} lock poisoned", what)))
}

/// Counters held in memory.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: Mutex<HashMap<String, u64>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let mut counters = guard(&self.counters, "counter")?;
        let value = counters.entry(key.to_string()).or_insert(0);
        *value = value
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt(format!("counter '{}' overflowed", key)))?;
        Ok(*value)
    }

    fn current(&self, key: &str) -> Result<Option<u64>, StoreError> {
        Ok(guard(&self.counters, "counter")?.get(key).copied())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: UtcTimestamp,
}

/// Expiring entries held in memory.
///
/// Expiry is evaluated lazily against the injected clock when an entry is
/// read; there is no background sweeper.
pub struct MemoryExpiringStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryExpiringStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl ExpiringStore for MemoryExpiringStore {
    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut entries = guard(&self.entries, "cache")?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = self.clock.now();
        let entries = guard(&self.entries, "cache")?;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone()))
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        guard(&self.entries, "cache")?.remove(key);
        Ok(())
    }
}

/// Documents held in memory.
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<DocumentId, Document>>,
    clock: Arc<dyn Clock>,
}

impl MemoryDocumentStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn find(
        &self,
        predicate: impl Fn(&Document) -> bool,
    ) -> Result<Option<Document>, StoreError> {
        let documents = guard(&self.documents, "document")?;
        Ok(documents.values().find(|doc| predicate(doc)).cloned())
    }

    /// Run `mutate` on the stored copy of `id` and return the result.
    fn modify(
        &self,
        id: DocumentId,
        mutate: impl FnOnce(&mut Document),
    ) -> Result<Document, StoreError> {
        let mut documents = guard(&self.documents, "document")?;
        let stored = documents
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("document {}", id)))?;
        mutate(stored);
        Ok(stored.clone())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn create(&self, new: NewDocument) -> Result<Document, StoreError> {
        let mut documents = guard(&self.documents, "document")?;
        if documents
            .values()
            .any(|doc| doc.scope() == &new.scope && doc.token() == &new.token)
        {
            return Err(StoreError::DuplicateToken {
                scope: new.scope,
                token: new.token,
            });
        }
        let document = Document::from_new(DocumentId::generate(), new, self.clock.now());
        documents.insert(document.id(), document.clone());
        Ok(document)
    }

    fn read(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(guard(&self.documents, "document")?.get(&id).cloned())
    }

    fn record_save(
        &self,
        id: DocumentId,
        title: Option<&str>,
        body: Option<&str>,
        editor: Option<&EditorId>,
    ) -> Result<Document, StoreError> {
        let now = self.clock.now();
        self.modify(id, |stored| {
            stored.apply_save(title, body, editor);
            stored.touch(now);
        })
    }

    fn set_status(
        &self,
        id: DocumentId,
        status: Status,
        published_at: Option<&UtcTimestamp>,
    ) -> Result<Document, StoreError> {
        let now = self.clock.now();
        self.modify(id, |stored| {
            stored.set_status(status);
            if let Some(at) = published_at {
                stored.set_published_at(at.clone());
            }
            stored.touch(now);
        })
    }

    fn set_last_version_save_count(&self, id: DocumentId, value: u64) -> Result<(), StoreError> {
        self.modify(id, |stored| stored.mark_versioned(value)).map(|_| ())
    }

    fn find_by_token(
        &self,
        scope: &ScopeId,
        token: &Token,
    ) -> Result<Option<Document>, StoreError> {
        self.find(|doc| doc.scope() == scope && doc.token() == token)
    }

    fn find_by_old_url(
        &self,
        scope: &ScopeId,
        old_url: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.find(|doc| doc.scope() == scope && doc.old_url.as_deref() == Some(old_url))
    }

    fn list(&self, scope: &ScopeId, filter: StatusFilter) -> Result<Vec<Document>, StoreError> {
        let documents = guard(&self.documents, "document")?;
        let mut selected: Vec<Document> = documents
            .values()
            .filter(|doc| doc.scope() == scope && filter.matches(doc.status()))
            .cloned()
            .collect();
        sort_by_token(&mut selected);
        Ok(selected)
    }
}

/// Version logs held in memory, in insertion order per document.
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    logs: Mutex<HashMap<DocumentId, Vec<Version>>>,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VersionStore for MemoryVersionStore {
    fn append(&self, version: &Version) -> Result<(), StoreError> {
        guard(&self.logs, "version")?
            .entry(version.document_id)
            .or_default()
            .push(version.clone());
        Ok(())
    }

    fn list(&self, document: DocumentId) -> Result<Vec<Version>, StoreError> {
        let logs = guard(&self.logs, "version")?;
        Ok(newest_first(
            logs.get(&document).cloned().unwrap_or_default(),
        ))
    }
}
