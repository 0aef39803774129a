//! Extraction of display titles and plain text from raw documents.
//!
//! Extraction never fails. Unparseable or empty input degrades to an empty
//! title and empty text, and the index builder decides what to do with that.

pub mod html;
pub mod title;

pub use html::HtmlTextExtractor;
pub use title::TitleGenerator;

use crate::document::{ExtractedDocument, RawDocument};

/// Converts raw content into a title and body text.
pub trait TextExtractor: Send + Sync {
    /// Extract title and body text from `content`.
    ///
    /// `title_selector` locates the title element; when it matches nothing
    /// the title is generated from the body text.
    fn extract(&self, content: &str, title_selector: &str) -> ExtractedDocument;

    /// Extract from a raw document, decoding its bytes as UTF-8.
    fn extract_document(&self, doc: &RawDocument, title_selector: &str) -> ExtractedDocument {
        self.extract(&doc.content_str(), title_selector)
    }

    /// Get the name of this extractor.
    fn name(&self) -> &'static str;
}
