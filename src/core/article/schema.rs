//! core::article::schema
//!
//! Persisted article and version records.
//!
//! # Invariants
//!
//! - `token` is assigned at construction and has no setter
//! - `last_version_save_count <= save_count` at all times
//! - `published_at` is only written by the status machine and never cleared
//! - `title` is stored exactly as written; placeholder substitution is a
//!   presentation concern (see [`super::display`])
//!
//! # Example
//!
//! ```
//! use folio::core::article::{Document, NewDocument, Status};
//! use folio::core::types::{DocumentId, ScopeId, Token, UtcTimestamp};
//!
//! let new = NewDocument::new(ScopeId::new("acme").unwrap(), Token::from_sequence(1));
//! let mut doc = Document::from_new(DocumentId::generate(), new, UtcTimestamp::now());
//! assert_eq!(doc.status(), Status::Draft);
//! assert!(!doc.has_unsaved_version());
//!
//! doc.record_save(None);
//! assert!(doc.has_unsaved_version());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::types::{DocumentId, EditorId, ScopeId, Token, UtcTimestamp};

/// Errors from parsing article values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArticleValueError {
    #[error("unknown status '{0}', must be one of: draft, publish, trash")]
    UnknownStatus(String),
}

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Publish,
    Trash,
}

impl Status {
    /// All statuses, in lifecycle order.
    pub const ALL: [Status; 3] = [Status::Draft, Status::Publish, Status::Trash];

    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Publish => "publish",
            Status::Trash => "trash",
        }
    }
}

impl FromStr for Status {
    type Err = ArticleValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Status::Draft),
            "publish" => Ok(Status::Publish),
            "trash" => Ok(Status::Trash),
            other => Err(ArticleValueError::UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-side selection of documents by status.
///
/// Anything that is not a recognised status name selects every document
/// that is not in the trash, which is what listings show by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    Only(Status),
    All,
    #[default]
    NotTrash,
}

impl StatusFilter {
    /// Build a filter from an optional user-supplied name.
    ///
    /// # Example
    ///
    /// ```
    /// use folio::core::article::{Status, StatusFilter};
    ///
    /// assert_eq!(StatusFilter::parse(Some("trash")), StatusFilter::Only(Status::Trash));
    /// assert_eq!(StatusFilter::parse(Some("all")), StatusFilter::All);
    /// assert_eq!(StatusFilter::parse(Some("bogus")), StatusFilter::NotTrash);
    /// assert_eq!(StatusFilter::parse(None), StatusFilter::NotTrash);
    /// ```
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some("all") => StatusFilter::All,
            Some(name) => name
                .parse::<Status>()
                .map(StatusFilter::Only)
                .unwrap_or(StatusFilter::NotTrash),
            None => StatusFilter::NotTrash,
        }
    }

    /// Check whether a status is selected by this filter.
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::Only(wanted) => *wanted == status,
            StatusFilter::All => true,
            StatusFilter::NotTrash => status != Status::Trash,
        }
    }
}

/// Who a version is attributed to.
///
/// Saves made without an explicit editor (imports, automation) are
/// attributed to the owning scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Editor(EditorId),
    Scope(ScopeId),
}

impl Actor {
    /// Resolve the actor for an optional editor within a scope.
    pub fn resolve(editor: Option<&EditorId>, scope: &ScopeId) -> Self {
        match editor {
            Some(editor) => Actor::Editor(editor.clone()),
            None => Actor::Scope(scope.clone()),
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Editor(id) => write!(f, "editor:{}", id),
            Actor::Scope(id) => write!(f, "scope:{}", id),
        }
    }
}

/// Fields for a document that has not been stored yet.
///
/// A `NewDocument` can only be built with a token, so a document can never
/// reach the store without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub scope: ScopeId,
    pub token: Token,
    pub title: String,
    pub body: String,
    pub old_url: Option<String>,
}

impl NewDocument {
    /// Create an empty draft for `scope` carrying `token`.
    pub fn new(scope: ScopeId, token: Token) -> Self {
        Self {
            scope,
            token,
            title: String::new(),
            body: String::new(),
            old_url: None,
        }
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    scope: ScopeId,
    token: Token,
    /// Title as written; may be empty.
    pub title: String,
    pub body: String,
    /// Location of the document in a previous system, if imported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_url: Option<String>,
    status: Status,
    save_count: u64,
    last_version_save_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    published_at: Option<UtcTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_edit_editor: Option<EditorId>,
    created_at: UtcTimestamp,
    updated_at: UtcTimestamp,
}

impl Document {
    /// Materialize a stored document from creation fields.
    ///
    /// Called by document stores once they have assigned `id`.
    pub fn from_new(id: DocumentId, new: NewDocument, now: UtcTimestamp) -> Self {
        Self {
            id,
            scope: new.scope,
            token: new.token,
            title: new.title,
            body: new.body,
            old_url: new.old_url,
            status: Status::Draft,
            save_count: 0,
            last_version_save_count: 0,
            published_at: None,
            last_edit_editor: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn save_count(&self) -> u64 {
        self.save_count
    }

    pub fn last_version_save_count(&self) -> u64 {
        self.last_version_save_count
    }

    pub fn published_at(&self) -> Option<&UtcTimestamp> {
        self.published_at.as_ref()
    }

    pub fn last_edit_editor(&self) -> Option<&EditorId> {
        self.last_edit_editor.as_ref()
    }

    pub fn created_at(&self) -> &UtcTimestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &UtcTimestamp {
        &self.updated_at
    }

    pub fn is_publish(&self) -> bool {
        self.status == Status::Publish
    }

    pub fn is_draft(&self) -> bool {
        self.status == Status::Draft
    }

    pub fn is_trash(&self) -> bool {
        self.status == Status::Trash
    }

    /// Whether content has been saved since the last version snapshot.
    pub fn has_unsaved_version(&self) -> bool {
        self.save_count > self.last_version_save_count
    }

    /// Replace the given content fields and count the save.
    pub fn apply_save(
        &mut self,
        title: Option<&str>,
        body: Option<&str>,
        editor: Option<&EditorId>,
    ) {
        if let Some(title) = title {
            self.title = title.to_string();
        }
        if let Some(body) = body {
            self.body = body.to_string();
        }
        self.record_save(editor);
    }

    /// Count a content save made by `editor`.
    pub fn record_save(&mut self, editor: Option<&EditorId>) {
        self.save_count = self.save_count.saturating_add(1);
        if let Some(editor) = editor {
            self.last_edit_editor = Some(editor.clone());
        }
    }

    /// Record that a version snapshot reflects `save_count`.
    ///
    /// The value is clamped to the current save count.
    pub fn mark_versioned(&mut self, save_count: u64) {
        self.last_version_save_count = save_count.min(self.save_count);
    }

    /// Stamp the modification time. Stores call this on every write.
    pub fn touch(&mut self, now: UtcTimestamp) {
        self.updated_at = now;
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) fn set_published_at(&mut self, at: UtcTimestamp) {
        self.published_at = Some(at);
    }
}

/// An immutable snapshot of a document's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: Uuid,
    pub document_id: DocumentId,
    pub scope: ScopeId,
    pub title: String,
    pub body: String,
    pub actor: Actor,
    pub created_at: UtcTimestamp,
}

impl Version {
    /// Snapshot the current content of `document`.
    pub fn snapshot(document: &Document, actor: Actor, created_at: UtcTimestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document.id(),
            scope: document.scope().clone(),
            title: document.title.clone(),
            body: document.body.clone(),
            actor,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        let new = NewDocument {
            title: "Hello".into(),
            body: "World".into(),
            ..NewDocument::new(ScopeId::new("acme").unwrap(), Token::from_sequence(3))
        };
        Document::from_new(DocumentId::generate(), new, UtcTimestamp::now())
    }

    mod status {
        use super::*;

        #[test]
        fn default_is_draft() {
            assert_eq!(Status::default(), Status::Draft);
            assert!(doc().is_draft());
        }

        #[test]
        fn parse_and_display_agree() {
            for status in Status::ALL {
                assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
                assert_eq!(status.to_string(), status.as_str());
            }
        }

        #[test]
        fn parse_rejects_unknown() {
            assert_eq!(
                "archived".parse::<Status>(),
                Err(ArticleValueError::UnknownStatus("archived".into()))
            );
        }

        #[test]
        fn serializes_lowercase() {
            assert_eq!(
                serde_json::to_string(&Status::Publish).unwrap(),
                "\"publish\""
            );
        }
    }

    mod status_filter {
        use super::*;

        #[test]
        fn not_trash_excludes_only_trash() {
            let filter = StatusFilter::NotTrash;
            assert!(filter.matches(Status::Draft));
            assert!(filter.matches(Status::Publish));
            assert!(!filter.matches(Status::Trash));
        }

        #[test]
        fn only_matches_one() {
            let filter = StatusFilter::Only(Status::Publish);
            assert!(filter.matches(Status::Publish));
            assert!(!filter.matches(Status::Draft));
        }

        #[test]
        fn all_matches_everything() {
            assert!(Status::ALL.iter().all(|s| StatusFilter::All.matches(*s)));
        }
    }

    mod actor {
        use super::*;

        #[test]
        fn resolves_editor_when_given() {
            let scope = ScopeId::new("acme").unwrap();
            let editor = EditorId::new("u7").unwrap();
            assert_eq!(
                Actor::resolve(Some(&editor), &scope),
                Actor::Editor(editor)
            );
        }

        #[test]
        fn falls_back_to_scope() {
            let scope = ScopeId::new("acme").unwrap();
            assert_eq!(Actor::resolve(None, &scope), Actor::Scope(scope));
        }

        #[test]
        fn serialized_form_is_tagged() {
            let actor = Actor::Editor(EditorId::new("u7").unwrap());
            let json = serde_json::to_string(&actor).unwrap();
            assert_eq!(json, r#"{"kind":"editor","id":"u7"}"#);
        }
    }

    mod document {
        use super::*;

        #[test]
        fn new_document_starts_clean() {
            let doc = doc();
            assert_eq!(doc.save_count(), 0);
            assert_eq!(doc.last_version_save_count(), 0);
            assert!(doc.published_at().is_none());
            assert!(!doc.has_unsaved_version());
        }

        #[test]
        fn record_save_tracks_editor() {
            let mut doc = doc();
            let editor = EditorId::new("u1").unwrap();
            doc.record_save(Some(&editor));
            assert_eq!(doc.save_count(), 1);
            assert_eq!(doc.last_edit_editor(), Some(&editor));

            doc.record_save(None);
            assert_eq!(doc.save_count(), 2);
            assert_eq!(doc.last_edit_editor(), Some(&editor));
        }

        #[test]
        fn apply_save_replaces_only_given_fields() {
            let mut doc = doc();
            doc.body = "kept".into();
            doc.apply_save(Some("New title"), None, None);
            assert_eq!(doc.title, "New title");
            assert_eq!(doc.body, "kept");
            assert_eq!(doc.save_count(), 1);
        }

        #[test]
        fn mark_versioned_clamps_to_save_count() {
            let mut doc = doc();
            doc.record_save(None);
            doc.mark_versioned(10);
            assert_eq!(doc.last_version_save_count(), 1);
            assert!(!doc.has_unsaved_version());
        }

        #[test]
        fn json_roundtrip_keeps_raw_title() {
            let mut doc = doc();
            doc.title = String::new();
            let json = serde_json::to_string(&doc).unwrap();
            let parsed: Document = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, doc);
            assert_eq!(parsed.title, "");
        }
    }

    mod version {
        use super::*;

        #[test]
        fn snapshot_copies_content() {
            let doc = doc();
            let actor = Actor::Scope(doc.scope().clone());
            let version = Version::snapshot(&doc, actor.clone(), UtcTimestamp::now());
            assert_eq!(version.document_id, doc.id());
            assert_eq!(version.title, "Hello");
            assert_eq!(version.body, "World");
            assert_eq!(version.actor, actor);
        }
    }
}
