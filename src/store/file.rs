//! store::file
//!
//! File-backed implementations of the store traits.
//!
//! # Storage
//!
//! See [`crate::core::paths`] for the layout. Tables (`counters.json`,
//! `cache.json`, `documents.json`) are rewritten whole on every mutation;
//! version logs are JSON lines appended in place.
//!
//! # Concurrency
//!
//! Every read-modify-write of a table holds an exclusive OS-level lock
//! (`fs2`) on the table's `.lock` file for its whole duration, so an
//! increment is atomic across threads and processes. Writes go to a temp
//! file which is fsynced and renamed over the table, so a crash never
//! leaves a half-written table behind.
//!
//! # Errors
//!
//! I/O failures map to [`StoreError::Unavailable`]; content that does not
//! parse maps to [`StoreError::Corrupt`].

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::traits::{
    newest_first, sort_by_token, CounterStore, DocumentStore, ExpiringStore, StoreError,
    VersionStore,
};
use crate::core::article::{Document, NewDocument, Status, StatusFilter, Version};
use crate::core::clock::Clock;
use crate::core::paths::FolioPaths;
use crate::core::types::{DocumentId, EditorId, ScopeId, Token, UtcTimestamp};

/// Kind tag written into the documents table.
pub const DOCUMENTS_KIND: &str = "folio.documents";

/// Current documents table schema version.
pub const DOCUMENTS_SCHEMA_VERSION: u32 = 1;

fn unavailable(action: &str, path: &Path, err: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("cannot {} {}: {}", action, path.display(), err))
}

/// An exclusive lock on a store file, released on drop.
#[derive(Debug)]
struct StoreLock {
    file: Option<File>,
}

impl StoreLock {
    /// Block until the exclusive lock at `path` is held.
    fn acquire(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| unavailable("create", parent, e))?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| unavailable("open", path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| unavailable("lock", path, e))?;
        trace!(path = %path.display(), "store lock acquired");
        Ok(Self { file: Some(file) })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
    }
}

/// Read a JSON table, or its default if the file does not exist yet.
fn read_table<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path).map_err(|e| unavailable("read", path, e))?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&content)
        .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
}

/// Replace a JSON table atomically (temp file, fsync, rename).
fn write_table<T: Serialize>(path: &Path, table: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| unavailable("create", parent, e))?;
    }
    let content = serde_json::to_string_pretty(table)
        .map_err(|e| StoreError::Corrupt(format!("cannot serialize {}: {}", path.display(), e)))?;

    let temp_path = path.with_extension("tmp");
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| unavailable("create", &temp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| unavailable("write", &temp_path, e))?;
        file.sync_all()
            .map_err(|e| unavailable("sync", &temp_path, e))?;
    }
    fs::rename(&temp_path, path).map_err(|e| unavailable("rename", &temp_path, e))
}

/// Token counters in `counters.json`.
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileCounterStore {
    pub fn new(paths: &FolioPaths) -> Self {
        Self {
            path: paths.counters_path(),
            lock_path: paths.counters_lock_path(),
        }
    }
}

impl CounterStore for FileCounterStore {
    fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let mut counters: BTreeMap<String, u64> = read_table(&self.path)?;
        let value = counters.entry(key.to_string()).or_insert(0);
        *value = value
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt(format!("counter '{}' overflowed", key)))?;
        let value = *value;
        write_table(&self.path, &counters)?;
        Ok(value)
    }

    fn current(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let counters: BTreeMap<String, u64> = read_table(&self.path)?;
        Ok(counters.get(key).copied())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    value: String,
    expires_at: UtcTimestamp,
}

/// Expiring entries in `cache.json`.
///
/// Expired entries read as absent and are dropped on the next write.
pub struct FileExpiringStore {
    path: PathBuf,
    lock_path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileExpiringStore {
    pub fn new(paths: &FolioPaths, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: paths.cache_path(),
            lock_path: paths.cache_lock_path(),
            clock,
        }
    }
}

impl ExpiringStore for FileExpiringStore {
    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = self.clock.now();
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let mut entries: BTreeMap<String, CacheEntry> = read_table(&self.path)?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        write_table(&self.path, &entries)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = self.clock.now();
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let entries: BTreeMap<String, CacheEntry> = read_table(&self.path)?;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone()))
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let mut entries: BTreeMap<String, CacheEntry> = read_table(&self.path)?;
        if entries.remove(key).is_some() {
            write_table(&self.path, &entries)?;
        }
        Ok(())
    }
}

/// On-disk shape of `documents.json`.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentTable {
    kind: String,
    schema_version: u32,
    /// Keyed by the hyphenated document id.
    documents: BTreeMap<String, Document>,
}

impl Default for DocumentTable {
    fn default() -> Self {
        Self {
            kind: DOCUMENTS_KIND.to_string(),
            schema_version: DOCUMENTS_SCHEMA_VERSION,
            documents: BTreeMap::new(),
        }
    }
}

impl DocumentTable {
    fn validate(self, path: &Path) -> Result<Self, StoreError> {
        if self.kind != DOCUMENTS_KIND {
            return Err(StoreError::Corrupt(format!(
                "{}: invalid kind '{}', expected '{}'",
                path.display(),
                self.kind,
                DOCUMENTS_KIND
            )));
        }
        if self.schema_version != DOCUMENTS_SCHEMA_VERSION {
            return Err(StoreError::Corrupt(format!(
                "{}: unsupported schema version {}, supported: {}",
                path.display(),
                self.schema_version,
                DOCUMENTS_SCHEMA_VERSION
            )));
        }
        Ok(self)
    }
}

/// Document records in `documents.json`.
pub struct FileDocumentStore {
    path: PathBuf,
    lock_path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileDocumentStore {
    pub fn new(paths: &FolioPaths, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: paths.documents_path(),
            lock_path: paths.documents_lock_path(),
            clock,
        }
    }

    fn load(&self) -> Result<DocumentTable, StoreError> {
        read_table::<DocumentTable>(&self.path)?.validate(&self.path)
    }

    fn find(
        &self,
        predicate: impl Fn(&Document) -> bool,
    ) -> Result<Option<Document>, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let table = self.load()?;
        Ok(table.documents.into_values().find(|doc| predicate(doc)))
    }

    /// Run `mutate` on the stored copy of `id`, persist the table and
    /// return the updated document.
    ///
    /// The read, the change and the write all happen under the table lock,
    /// so fields the closure does not touch keep whatever another writer
    /// stored last.
    fn modify(
        &self,
        id: DocumentId,
        mutate: impl FnOnce(&mut Document),
    ) -> Result<Document, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let mut table = self.load()?;
        let stored = table
            .documents
            .get_mut(&id.to_string())
            .ok_or_else(|| StoreError::NotFound(format!("document {}", id)))?;
        mutate(stored);
        let updated = stored.clone();
        write_table(&self.path, &table)?;
        Ok(updated)
    }
}

impl DocumentStore for FileDocumentStore {
    fn create(&self, new: NewDocument) -> Result<Document, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let mut table = self.load()?;
        if table
            .documents
            .values()
            .any(|doc| doc.scope() == &new.scope && doc.token() == &new.token)
        {
            return Err(StoreError::DuplicateToken {
                scope: new.scope,
                token: new.token,
            });
        }
        let document = Document::from_new(DocumentId::generate(), new, self.clock.now());
        table
            .documents
            .insert(document.id().to_string(), document.clone());
        write_table(&self.path, &table)?;
        Ok(document)
    }

    fn read(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let mut table = self.load()?;
        Ok(table.documents.remove(&id.to_string()))
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
        let _lock = StoreLock::acquire(&self.lock_path)?;
        let table = self.load()?;
        let mut selected: Vec<Document> = table
            .documents
            .into_values()
            .filter(|doc| doc.scope() == scope && filter.matches(doc.status()))
            .collect();
        sort_by_token(&mut selected);
        Ok(selected)
    }
}

/// Version logs as JSON lines under `versions/`.
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    paths: FolioPaths,
}

impl FileVersionStore {
    pub fn new(paths: &FolioPaths) -> Self {
        Self {
            paths: paths.clone(),
        }
    }
}

impl VersionStore for FileVersionStore {
    fn append(&self, version: &Version) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(version)
            .map_err(|e| StoreError::Corrupt(format!("cannot serialize version: {}", e)))?;
        line.push('\n');

        let path = self.paths.version_log_path(version.document_id);
        let _lock = StoreLock::acquire(&self.paths.version_lock_path(version.document_id))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| unavailable("open", &path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| unavailable("append to", &path, e))?;
        file.sync_all().map_err(|e| unavailable("sync", &path, e))
    }

    fn list(&self, document: DocumentId) -> Result<Vec<Version>, StoreError> {
        let path = self.paths.version_log_path(document);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let _lock = StoreLock::acquire(&self.paths.version_lock_path(document))?;
        let file = File::open(&path).map_err(|e| unavailable("open", &path, e))?;

        let mut versions = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| unavailable("read", &path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let version: Version = serde_json::from_str(&line).map_err(|e| {
                StoreError::Corrupt(format!("{} line {}: {}", path.display(), index + 1, e))
            })?;
            versions.push(version);
        }
        Ok(newest_first(versions))
    }
}
