//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ScopeId`] - Owning namespace of a document (tenant, workspace)
//! - [`EditorId`] - Identity of an acting editor
//! - [`DocumentId`] - Internal durable key assigned by the document store
//! - [`Token`] - Public, scope-unique document identifier
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! Scope and editor identifiers are opaque to this crate, but they end up
//! inside store keys (`scopes/<scope>/article_next_id`), so construction
//! rejects values that would make those keys ambiguous.
//!
//! # Examples
//!
//! ```
//! use folio::core::types::{EditorId, ScopeId, Token};
//!
//! let scope = ScopeId::new("acme").unwrap();
//! let editor = EditorId::new("u7").unwrap();
//! let token = Token::from_sequence(42);
//! assert_eq!(token.as_str(), "42");
//!
//! assert!(ScopeId::new("").is_err());
//! assert!(ScopeId::new("a/b").is_err());
//! assert!(Token::new("abc").is_err());
//! # let _ = (scope, editor);
//! ```

use std::ops::Add;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid scope id: {0}")]
    InvalidScope(String),

    #[error("invalid editor id: {0}")]
    InvalidEditor(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("invalid document id: {0}")]
    InvalidDocumentId(String),
}

/// Shared rules for identifiers that are embedded in store keys.
fn validate_key_segment(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("cannot be empty");
    }
    if value.contains('/') {
        return Err("cannot contain '/'");
    }
    if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err("cannot contain whitespace or control characters");
    }
    Ok(())
}

/// The namespace owning a document.
///
/// Scopes partition token sequences, lock keys and version logs. This crate
/// never creates or validates scopes beyond key safety; it only stores and
/// compares their identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScopeId(String);

impl ScopeId {
    /// Create a new scope id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidScope` if the id is empty or contains
    /// `/`, whitespace or control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_key_segment(&id).map_err(|reason| TypeError::InvalidScope(reason.into()))?;
        Ok(Self(id))
    }

    /// Get the scope id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ScopeId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ScopeId> for String {
    fn from(id: ScopeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an editor (a user in the identity collaborator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EditorId(String);

impl EditorId {
    /// Create a new editor id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidEditor` if the id is empty or contains
    /// `/`, whitespace or control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_key_segment(&id).map_err(|reason| TypeError::InvalidEditor(reason.into()))?;
        Ok(Self(id))
    }

    /// Get the editor id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EditorId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<EditorId> for String {
    fn from(id: EditorId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EditorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal durable key of a document.
///
/// Assigned by the document store on create, never shown to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh document id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a document id from its hyphenated string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidDocumentId(e.to_string()))
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public identifier of a document, unique within its scope.
///
/// Tokens are the canonical decimal form of a positive counter value. They
/// are minted once by the token allocator and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Parse a token.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidToken` unless the value is the canonical
    /// decimal form of a positive integer (no sign, no leading zeros).
    pub fn new(token: impl Into<String>) -> Result<Self, TypeError> {
        let token = token.into();
        match token.parse::<u64>() {
            Ok(n) if n > 0 && n.to_string() == token => Ok(Self(token)),
            _ => Err(TypeError::InvalidToken(format!(
                "'{}' is not a positive decimal number",
                token
            ))),
        }
    }

    /// Build the token for a counter value.
    pub fn from_sequence(value: u64) -> Self {
        Self(value.to_string())
    }

    /// The counter value this token was minted from.
    pub fn sequence(&self) -> u64 {
        // Construction guarantees the canonical decimal form.
        self.0.parse().unwrap_or_default()
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Token {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use folio::core::types::UtcTimestamp;
/// use std::time::Duration;
///
/// let now = UtcTimestamp::now();
/// let later = now.clone() + Duration::from_secs(10);
/// assert!(later > now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl Add<std::time::Duration> for UtcTimestamp {
    type Output = UtcTimestamp;

    fn add(self, rhs: std::time::Duration) -> Self::Output {
        let sum = chrono::Duration::from_std(rhs)
            .ok()
            .and_then(|delta| self.0.checked_add_signed(delta));
        Self(sum.unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC))
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod scope_id {
        use super::*;

        #[test]
        fn valid() {
            assert!(ScopeId::new("acme").is_ok());
            assert!(ScopeId::new("space-42_x").is_ok());
        }

        #[test]
        fn rejects_empty() {
            assert!(matches!(ScopeId::new(""), Err(TypeError::InvalidScope(_))));
        }

        #[test]
        fn rejects_slash_and_whitespace() {
            assert!(ScopeId::new("a/b").is_err());
            assert!(ScopeId::new("a b").is_err());
            assert!(ScopeId::new("a\tb").is_err());
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<ScopeId, _> = serde_json::from_str("\"a/b\"");
            assert!(result.is_err());
        }
    }

    mod editor_id {
        use super::*;

        #[test]
        fn valid() {
            let editor = EditorId::new("u7").unwrap();
            assert_eq!(editor.as_str(), "u7");
            assert_eq!(editor.to_string(), "u7");
        }

        #[test]
        fn rejects_empty() {
            assert!(matches!(
                EditorId::new(""),
                Err(TypeError::InvalidEditor(_))
            ));
        }
    }

    mod token {
        use super::*;

        #[test]
        fn from_sequence_is_canonical() {
            assert_eq!(Token::from_sequence(1).as_str(), "1");
            assert_eq!(Token::from_sequence(1000).as_str(), "1000");
        }

        #[test]
        fn sequence_roundtrip() {
            assert_eq!(Token::from_sequence(77).sequence(), 77);
        }

        #[test]
        fn rejects_non_canonical() {
            assert!(Token::new("0").is_err());
            assert!(Token::new("007").is_err());
            assert!(Token::new("+7").is_err());
            assert!(Token::new("-7").is_err());
            assert!(Token::new("seven").is_err());
            assert!(Token::new("").is_err());
        }

        #[test]
        fn parses_canonical() {
            assert_eq!(Token::new("12").unwrap(), Token::from_sequence(12));
        }
    }

    mod document_id {
        use super::*;

        #[test]
        fn parse_roundtrip() {
            let id = DocumentId::generate();
            assert_eq!(DocumentId::parse(&id.to_string()).unwrap(), id);
        }

        #[test]
        fn parse_rejects_garbage() {
            assert!(DocumentId::parse("not-a-uuid").is_err());
        }
    }

    mod timestamp {
        use super::*;

        #[test]
        fn add_duration_orders_later() {
            let now = UtcTimestamp::now();
            let later = now.clone() + std::time::Duration::from_millis(1);
            assert!(later > now);
        }

        #[test]
        fn display_is_rfc3339() {
            let ts = UtcTimestamp::from_datetime(
                chrono::DateTime::parse_from_rfc3339("2024-01-02T03:04:05+00:00")
                    .unwrap()
                    .with_timezone(&chrono::Utc),
            );
            assert_eq!(ts.to_string(), "2024-01-02T03:04:05+00:00");
        }
    }
}
