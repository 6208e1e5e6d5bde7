//! core::article::display
//!
//! Read-time presentation of stored fields.
//!
//! Storage keeps what the editor wrote. A blank title is shown as a
//! placeholder, but the placeholder is never written back.

use super::schema::Document;

/// Placeholder used when no configuration overrides it.
pub const DEFAULT_UNTITLED: &str = "Untitled";

/// The title to show for `document`.
///
/// Returns `placeholder` when the stored title is empty or whitespace only.
///
/// # Example
///
/// ```
/// use folio::core::article::{display_title, Document, NewDocument};
/// use folio::core::types::{DocumentId, ScopeId, Token, UtcTimestamp};
///
/// let new = NewDocument::new(ScopeId::new("acme").unwrap(), Token::from_sequence(1));
/// let doc = Document::from_new(DocumentId::generate(), new, UtcTimestamp::now());
/// assert_eq!(display_title(&doc, "Untitled"), "Untitled");
/// assert_eq!(doc.title, "");
/// ```
pub fn display_title<'a>(document: &'a Document, placeholder: &'a str) -> &'a str {
    if document.title.trim().is_empty() {
        placeholder
    } else {
        &document.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::article::NewDocument;
    use crate::core::types::{DocumentId, ScopeId, Token, UtcTimestamp};

    fn doc_with_title(title: &str) -> Document {
        let new = NewDocument {
            title: title.to_string(),
            ..NewDocument::new(ScopeId::new("acme").unwrap(), Token::from_sequence(1))
        };
        Document::from_new(DocumentId::generate(), new, UtcTimestamp::now())
    }

    #[test]
    fn keeps_real_title() {
        let doc = doc_with_title("Release notes");
        assert_eq!(display_title(&doc, DEFAULT_UNTITLED), "Release notes");
    }

    #[test]
    fn blank_title_uses_placeholder() {
        assert_eq!(display_title(&doc_with_title(""), "Untitled"), "Untitled");
        assert_eq!(display_title(&doc_with_title("   \n"), "Sans titre"), "Sans titre");
    }

    #[test]
    fn placeholder_is_not_stored() {
        let doc = doc_with_title("");
        let _ = display_title(&doc, DEFAULT_UNTITLED);
        assert!(doc.title.is_empty());
    }
}
