//! core::ops::status
//!
//! Document lifecycle transitions.
//!
//! Any status may move to any other. The only side effect is publication
//! stamping: a transition *into* `publish` from another status sets
//! `published_at` to the transition time. Staying in `publish` leaves it
//! alone, and leaving `publish` never clears it, so a document that goes
//! publish -> trash -> publish is stamped again on the way back.

use tracing::debug;

use crate::core::article::{Document, Status};
use crate::core::types::UtcTimestamp;

/// What a call to [`transition`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: Status,
    pub to: Status,
    /// True when this transition stamped `published_at`.
    pub published: bool,
}

impl StatusChange {
    /// Whether the status actually changed.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Move `document` to `to`, stamping `published_at` with `now` when the
/// document newly enters `publish`.
///
/// # Example
///
/// ```
/// use folio::core::article::{Document, NewDocument, Status};
/// use folio::core::ops::status::transition;
/// use folio::core::types::{DocumentId, ScopeId, Token, UtcTimestamp};
///
/// let new = NewDocument::new(ScopeId::new("acme").unwrap(), Token::from_sequence(1));
/// let mut doc = Document::from_new(DocumentId::generate(), new, UtcTimestamp::now());
///
/// let change = transition(&mut doc, Status::Publish, UtcTimestamp::now());
/// assert!(change.published);
/// assert!(doc.published_at().is_some());
///
/// let again = transition(&mut doc, Status::Publish, UtcTimestamp::now());
/// assert!(!again.published);
/// ```
pub fn transition(document: &mut Document, to: Status, now: UtcTimestamp) -> StatusChange {
    let from = document.status();
    let published = from != Status::Publish && to == Status::Publish;

    document.set_status(to);
    if published {
        document.set_published_at(now);
    }

    debug!(document = %document.id(), %from, %to, published, "status transition");
    StatusChange {
        from,
        to,
        published,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::article::NewDocument;
    use crate::core::types::{DocumentId, ScopeId, Token};
    use std::time::Duration;

    fn doc() -> Document {
        let new = NewDocument::new(ScopeId::new("acme").unwrap(), Token::from_sequence(1));
        Document::from_new(DocumentId::generate(), new, UtcTimestamp::now())
    }

    #[test]
    fn draft_to_publish_stamps() {
        let mut doc = doc();
        let now = UtcTimestamp::now();
        let change = transition(&mut doc, Status::Publish, now.clone());
        assert_eq!(change.from, Status::Draft);
        assert!(change.published);
        assert!(change.changed());
        assert!(doc.is_publish());
        assert_eq!(doc.published_at(), Some(&now));
    }

    #[test]
    fn republish_keeps_original_stamp() {
        let mut doc = doc();
        let first = UtcTimestamp::now();
        transition(&mut doc, Status::Publish, first.clone());
        let change = transition(&mut doc, Status::Publish, first.clone() + Duration::from_secs(60));
        assert!(!change.published);
        assert!(!change.changed());
        assert_eq!(doc.published_at(), Some(&first));
    }

    #[test]
    fn leaving_publish_keeps_stamp() {
        let mut doc = doc();
        let first = UtcTimestamp::now();
        transition(&mut doc, Status::Publish, first.clone());
        transition(&mut doc, Status::Trash, first.clone() + Duration::from_secs(1));
        assert!(doc.is_trash());
        assert_eq!(doc.published_at(), Some(&first));
    }

    #[test]
    fn returning_to_publish_restamps() {
        let mut doc = doc();
        let first = UtcTimestamp::now();
        let later = first.clone() + Duration::from_secs(3600);
        transition(&mut doc, Status::Publish, first);
        transition(&mut doc, Status::Trash, later.clone());
        let change = transition(&mut doc, Status::Publish, later.clone());
        assert!(change.published);
        assert_eq!(doc.published_at(), Some(&later));
    }

    #[test]
    fn non_publish_transitions_never_stamp() {
        let mut doc = doc();
        for to in [Status::Trash, Status::Draft, Status::Trash] {
            let change = transition(&mut doc, to, UtcTimestamp::now());
            assert!(!change.published);
        }
        assert!(doc.published_at().is_none());
    }
}
