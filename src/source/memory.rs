//! In-memory source, keyed by source title.

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::config::SourceConfig;
use crate::document::RawDocument;
use crate::error::{Result, SearchError};
use crate::source::{DocumentSource, DocumentStream};

/// Serves documents registered in memory under a source title.
///
/// Any source kind is accepted. A title that was never registered yields no
/// documents; a title marked as failing yields its documents followed by a
/// `SourceUnavailable` error.
#[derive(Debug, Default)]
pub struct InMemorySource {
    documents: RwLock<AHashMap<String, Vec<RawDocument>>>,
    failing: RwLock<AHashMap<String, String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        InMemorySource::default()
    }

    /// Replace the documents served for `title`.
    pub fn insert<S: Into<String>>(&self, title: S, documents: Vec<RawDocument>) {
        self.documents.write().insert(title.into(), documents);
    }

    /// Make `title` report a read failure after its documents.
    pub fn fail<T: Into<String>, M: Into<String>>(&self, title: T, message: M) {
        self.failing.write().insert(title.into(), message.into());
    }

    /// Stop failing `title`.
    pub fn recover(&self, title: &str) {
        self.failing.write().remove(title);
    }
}

impl DocumentSource for InMemorySource {
    fn fetch(&self, source: &SourceConfig) -> Result<DocumentStream> {
        let documents = self
            .documents
            .read()
            .get(&source.title)
            .cloned()
            .unwrap_or_default();

        let failure = self
            .failing
            .read()
            .get(&source.title)
            .map(|message| SearchError::source_unavailable(&source.title, message));

        Ok(Box::new(documents.into_iter().map(Ok).chain(failure.map(Err))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_registered_documents() {
        let source = InMemorySource::new();
        source.insert("Docs", vec![RawDocument::from_text("a", "<p>a</p>", "mem://a")]);

        let docs: Vec<_> = source
            .fetch(&SourceConfig::folder("Docs", "unused"))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "a");
    }

    #[test]
    fn test_failure_follows_documents() {
        let source = InMemorySource::new();
        source.insert("Docs", vec![RawDocument::from_text("a", "<p>a</p>", "mem://a")]);
        source.fail("Docs", "disk unplugged");

        let items: Vec<_> = source.fetch(&SourceConfig::folder("Docs", "unused")).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(SearchError::SourceUnavailable { .. })));

        source.recover("Docs");
        let items: Vec<_> = source.fetch(&SourceConfig::folder("Docs", "unused")).unwrap().collect();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_unknown_title_is_empty() {
        let source = InMemorySource::new();
        assert_eq!(source.fetch(&SourceConfig::folder("Nope", "")).unwrap().count(), 0);
    }
}
