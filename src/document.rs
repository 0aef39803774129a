//! Document types flowing through ingestion and the document store.
//!
//! ```text
//! RawDocument ──extract──▶ ExtractedDocument ──index──▶ IndexedDocument
//!  (bytes)                   (title, body)               (id, uri, display)
//! ```
//!
//! Only [`IndexedDocument`] outlives a build. Body text is dropped once it
//! has been tokenized.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public identifier of an indexed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh random identifier.
    pub fn new_v4() -> Self {
        DocumentId(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        DocumentId(uuid)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A document as produced by a source, before any processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Identifier assigned by the source (e.g. a relative file path).
    pub id: String,

    /// Raw content bytes.
    pub content: Vec<u8>,

    /// Where the document came from; shown to users in results.
    pub source_uri: String,
}

impl RawDocument {
    /// Create a raw document from bytes.
    pub fn new<I: Into<String>, U: Into<String>>(id: I, content: Vec<u8>, source_uri: U) -> Self {
        RawDocument {
            id: id.into(),
            content,
            source_uri: source_uri.into(),
        }
    }

    /// Create a raw document from text.
    pub fn from_text<I, C, U>(id: I, content: C, source_uri: U) -> Self
    where
        I: Into<String>,
        C: Into<String>,
        U: Into<String>,
    {
        RawDocument::new(id, content.into().into_bytes(), source_uri)
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn content_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Title and body text pulled out of a raw document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Display title, possibly generated from the body.
    pub title: String,

    /// Plain text to be indexed.
    pub body_text: String,
}

impl ExtractedDocument {
    /// Create an extracted document.
    pub fn new<T: Into<String>, B: Into<String>>(title: T, body_text: B) -> Self {
        ExtractedDocument {
            title: title.into(),
            body_text: body_text.into(),
        }
    }

    /// Whether there is any text worth indexing.
    pub fn has_body(&self) -> bool {
        !self.body_text.trim().is_empty()
    }
}

/// What the document store keeps for every indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Public identifier.
    pub id: DocumentId,

    /// Location of the original document.
    pub uri: String,

    /// Text shown for this document in results.
    pub display_text: String,
}

impl IndexedDocument {
    /// Create a stored record for an extracted document.
    ///
    /// The display text is the title, or the uri when the title is empty.
    pub fn new(uri: &str, title: &str) -> Self {
        let display_text = if title.is_empty() { uri } else { title };
        IndexedDocument {
            id: DocumentId::new_v4(),
            uri: uri.to_string(),
            display_text: display_text.to_string(),
        }
    }
}
