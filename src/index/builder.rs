//! Building snapshots from sources and single documents.

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::analysis::Analyzer;
use crate::config::SourceConfig;
use crate::document::{DocumentId, IndexedDocument, RawDocument};
use crate::error::{Result, SearchError};
use crate::extract::TextExtractor;
use crate::index::segment::{Segment, SegmentWriter};
use crate::index::snapshot::IndexSnapshot;
use crate::source::DocumentSource;

/// Documents buffered in memory before a segment is flushed.
pub const DEFAULT_MAX_BUFFERED_DOCS: usize = 1000;

/// Outcome of a full build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// Sources read.
    pub sources: usize,
    /// Documents added to the index.
    pub indexed: usize,
    /// Documents skipped for having no text.
    pub skipped: usize,
    /// Segments in the resulting snapshot.
    pub segments: usize,
}

/// Turns raw documents into index segments.
///
/// The builder itself holds no index state; every call returns a new
/// [`IndexSnapshot`] and leaves publishing it to the caller.
#[derive(Clone)]
pub struct IndexBuilder {
    analyzer: Arc<dyn Analyzer>,
    extractor: Arc<dyn TextExtractor>,
    default_title_selector: String,
    max_buffered_docs: usize,
}

impl IndexBuilder {
    /// Create a builder.
    pub fn new(analyzer: Arc<dyn Analyzer>, extractor: Arc<dyn TextExtractor>) -> Self {
        IndexBuilder {
            analyzer,
            extractor,
            default_title_selector: String::new(),
            max_buffered_docs: DEFAULT_MAX_BUFFERED_DOCS,
        }
    }

    /// Title selector used when a source has none, and for single documents.
    pub fn with_default_title_selector<S: Into<String>>(mut self, selector: S) -> Self {
        self.default_title_selector = selector.into();
        self
    }

    /// Flush a segment every `max_buffered_docs` documents.
    pub fn with_max_buffered_docs(mut self, max_buffered_docs: usize) -> Self {
        self.max_buffered_docs = max_buffered_docs.max(1);
        self
    }

    /// The analyzer applied to document text.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// The extractor applied to raw documents.
    pub fn extractor(&self) -> &Arc<dyn TextExtractor> {
        &self.extractor
    }

    /// Build a fresh snapshot from every source, in order.
    ///
    /// Each source is drained completely. If any of its documents failed,
    /// the first failure is returned once the source is exhausted and
    /// nothing built so far is kept. After each source the segments written
    /// so far are merged into one.
    pub fn build(
        &self,
        sources: &[SourceConfig],
        fetcher: &dyn DocumentSource,
        generation: u64,
    ) -> Result<(IndexSnapshot, BuildSummary)> {
        let mut summary = BuildSummary::default();
        let mut segments: Vec<Arc<Segment>> = Vec::new();
        let mut next_doc = 0;

        for source in sources {
            let stream = source.source_kind().and_then(|_| fetcher.fetch(source));
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("Cannot read source '{}': {e}", source.title);
                    return Err(e);
                }
            };
            info!("Indexing source '{}' ({})", source.title, source.uri);

            let selector = self.title_selector_for(source);
            let mut writer = SegmentWriter::new(next_doc);
            let mut failure: Option<SearchError> = None;

            for item in stream {
                let prepared = item.and_then(|raw| self.prepare(&raw, selector));
                match prepared {
                    Ok(Some((document, terms))) => {
                        writer.add_document(document, &terms);
                        summary.indexed += 1;
                    }
                    Ok(None) => summary.skipped += 1,
                    Err(e) => {
                        error!("Failed to index a document of source '{}': {e}", source.title);
                        failure.get_or_insert(e);
                    }
                }

                if writer.buffered_docs() >= self.max_buffered_docs {
                    let next = SegmentWriter::new(writer.next_doc());
                    let full = std::mem::replace(&mut writer, next);
                    debug!("Flushing segment of {} documents", full.buffered_docs());
                    segments.push(Arc::new(full.finish()));
                }
            }

            if let Some(e) = failure {
                error!("Source '{}' failed, abandoning rebuild", source.title);
                return Err(match e {
                    e @ SearchError::SourceUnavailable { .. } => e,
                    other => SearchError::source_unavailable(&source.title, other.to_string()),
                });
            }

            next_doc = writer.next_doc();
            if !writer.is_empty() {
                segments.push(Arc::new(writer.finish()));
            }
            if segments.len() > 1 {
                segments = vec![Arc::new(Segment::merge(&segments)?)];
            }

            summary.sources += 1;
        }

        let snapshot = IndexSnapshot::from_segments(generation, segments);
        summary.segments = snapshot.segments().len();

        info!(
            "Built index generation {generation}: {} documents from {} sources ({} skipped)",
            summary.indexed, summary.sources, summary.skipped
        );

        Ok((snapshot, summary))
    }

    /// Add one document on top of `snapshot`.
    ///
    /// Segments written by a rebuild are never rewritten here. Upserted
    /// documents share a tail segment until it holds `max_buffered_docs`
    /// documents, then start a new one, so the segment count grows by one
    /// per `max_buffered_docs` upserts. Every other segment is shared.
    pub fn upsert(
        &self,
        snapshot: &IndexSnapshot,
        raw: &RawDocument,
        generation: u64,
    ) -> Result<(IndexSnapshot, DocumentId)> {
        let Some((document, terms)) = self.prepare(raw, &self.default_title_selector)? else {
            return Err(SearchError::empty_document(raw.source_uri.clone()));
        };

        let id = document.id;
        let mut writer = SegmentWriter::new(snapshot.next_doc());
        writer.add_document(document, &terms);
        let segment = writer.finish();

        let next = match snapshot.open_tail() {
            Some(tail) if tail.doc_count() < self.max_buffered_docs => {
                let merged = Segment::merge(&[Arc::clone(tail), Arc::new(segment)])?;
                snapshot.with_replaced_tail(generation, merged)
            }
            _ => snapshot.with_segment(generation, segment),
        };

        Ok((next, id))
    }

    /// Extract and analyze a document.
    ///
    /// Returns `None` for documents without body text.
    pub fn prepare(
        &self,
        raw: &RawDocument,
        title_selector: &str,
    ) -> Result<Option<(IndexedDocument, Vec<String>)>> {
        let extracted = self.extractor.extract_document(raw, title_selector);
        if !extracted.has_body() {
            warn!("Skipping {}: no text to index", raw.source_uri);
            return Ok(None);
        }

        let terms = self.analyzer.analyze_terms(&extracted.body_text)?;
        let document = IndexedDocument::new(&raw.source_uri, &extracted.title);

        Ok(Some((document, terms)))
    }

    fn title_selector_for<'a>(&'a self, source: &'a SourceConfig) -> &'a str {
        if source.title_selector.trim().is_empty() {
            &self.default_title_selector
        } else {
            &source.title_selector
        }
    }
}

impl std::fmt::Debug for IndexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuilder")
            .field("analyzer", &self.analyzer.name())
            .field("extractor", &self.extractor.name())
            .field("default_title_selector", &self.default_title_selector)
            .field("max_buffered_docs", &self.max_buffered_docs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::EnglishAnalyzer;
    use crate::extract::HtmlTextExtractor;
    use crate::source::InMemorySource;

    fn builder() -> IndexBuilder {
        IndexBuilder::new(Arc::new(EnglishAnalyzer::new()), Arc::new(HtmlTextExtractor::new()))
            .with_default_title_selector("h1")
    }

    fn page(name: &str, html: &str) -> RawDocument {
        RawDocument::from_text(name, html, format!("mem://{name}"))
    }

    #[test]
    fn test_build_indexes_every_source() {
        let fetcher = InMemorySource::new();
        fetcher.insert("A", vec![page("a1", "<h1>Fire</h1><p>Leave the building</p>")]);
        fetcher.insert("B", vec![page("b1", "<p>Flood plan</p>"), page("b2", "<p>Fire plan</p>")]);
        let sources = vec![SourceConfig::folder("A", "a"), SourceConfig::folder("B", "b")];

        let (snapshot, summary) = builder().build(&sources, &fetcher, 1).unwrap();

        assert_eq!(summary, BuildSummary { sources: 2, indexed: 3, skipped: 0, segments: 1 });
        assert_eq!(snapshot.doc_count(), 3);
        assert_eq!(snapshot.doc_frequency("fire"), 2);
        assert_eq!(snapshot.document(0).map(|d| d.display_text.as_str()), Some("Fire"));
        assert_eq!(snapshot.document(1).map(|d| d.uri.as_str()), Some("mem://b1"));
    }

    #[test]
    fn test_blank_documents_are_skipped() {
        let fetcher = InMemorySource::new();
        fetcher.insert("A", vec![page("empty", "<div>  </div>"), page("full", "<p>Exit</p>")]);

        let (snapshot, summary) = builder()
            .build(&[SourceConfig::folder("A", "a")], &fetcher, 1)
            .unwrap();

        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(snapshot.doc_count(), 1);
    }

    #[test]
    fn test_segments_are_merged_after_each_source() {
        let fetcher = InMemorySource::new();
        let docs = (0..7).map(|i| page(&format!("d{i}"), "<p>drill</p>")).collect();
        fetcher.insert("A", docs);

        let (snapshot, summary) = builder()
            .with_max_buffered_docs(2)
            .build(&[SourceConfig::folder("A", "a")], &fetcher, 1)
            .unwrap();

        assert_eq!(summary.segments, 1);
        assert_eq!(snapshot.doc_frequency("drill"), 7);
        let docs: Vec<_> = snapshot.postings("drill").map(|p| p.doc).collect();
        assert_eq!(docs, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_failing_source_aborts_after_draining() {
        let fetcher = InMemorySource::new();
        fetcher.insert("A", vec![page("a", "<p>a</p>")]);
        fetcher.fail("A", "permission denied");

        let result = builder().build(&[SourceConfig::folder("A", "a")], &fetcher, 1);
        assert!(matches!(result, Err(SearchError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_unknown_kind_is_configuration_error() {
        let mut source = SourceConfig::folder("A", "a");
        source.kind = "gopher".to_string();

        let result = builder().build(&[source], &InMemorySource::new(), 1);
        assert!(matches!(result, Err(SearchError::Configuration(_))));
    }

    #[test]
    fn test_upsert_appends_a_segment() {
        let base = IndexSnapshot::empty(1);
        let builder = builder();

        let (next, id) = builder
            .upsert(&base, &page("new", "<h1>Evacuation</h1><p>Use stairs</p>"), 2)
            .unwrap();

        assert_eq!(next.generation(), 2);
        assert_eq!(next.doc_count(), 1);
        assert_eq!(next.document(0).map(|d| d.id), Some(id));
        assert!(base.is_empty());
    }

    #[test]
    fn test_upserts_fill_the_tail_segment() {
        let builder = builder().with_max_buffered_docs(3);
        let fetcher = InMemorySource::new();
        fetcher.insert("A", vec![page("a", "<p>fire</p>")]);
        let (mut snapshot, _) = builder
            .build(&[SourceConfig::folder("A", "a")], &fetcher, 1)
            .unwrap();
        let base = snapshot.clone();

        for i in 0..7 {
            let raw = page(&format!("u{i}"), "<p>fire drill</p>");
            snapshot = builder.upsert(&snapshot, &raw, i + 2).unwrap().0;
        }

        let sizes: Vec<usize> = snapshot.segments().iter().map(|s| s.doc_count()).collect();
        assert_eq!(sizes, vec![1, 3, 3, 1]);
        assert!(Arc::ptr_eq(&base.segments()[0], &snapshot.segments()[0]));
        assert_eq!(snapshot.doc_frequency("fire"), 8);
        let docs: Vec<_> = snapshot.postings("drill").map(|p| p.doc).collect();
        assert_eq!(docs, (1..8).collect::<Vec<_>>());
        assert_eq!(base.doc_count(), 1);
        assert_eq!(base.segments().len(), 1);
    }

    #[test]
    fn test_small_rebuilt_segment_is_not_merged_into() {
        let builder = builder();
        let fetcher = InMemorySource::new();
        fetcher.insert("A", vec![page("a", "<p>fire</p>")]);
        let (base, _) = builder
            .build(&[SourceConfig::folder("A", "a")], &fetcher, 1)
            .unwrap();

        let (next, _) = builder.upsert(&base, &page("b", "<p>flood</p>"), 2).unwrap();

        assert_eq!(next.segments().len(), 2);
        assert_eq!(next.sealed_segments(), 1);
        assert!(Arc::ptr_eq(&base.segments()[0], &next.segments()[0]));
    }

    #[test]
    fn test_fetch_error_is_returned() {
        let fetcher = |source: &SourceConfig| -> Result<crate::source::DocumentStream> {
            Err(SearchError::source_unavailable(&source.title, "unreachable"))
        };

        let result = builder().build(&[SourceConfig::folder("A", "a")], &fetcher, 1);
        assert!(matches!(
            result,
            Err(SearchError::SourceUnavailable { ref source_title, .. }) if source_title == "A"
        ));
    }

    #[test]
    fn test_upsert_rejects_blank_documents() {
        let result = builder().upsert(&IndexSnapshot::empty(1), &page("blank", "<p> </p>"), 2);
        assert!(matches!(result, Err(SearchError::EmptyDocument(_))));
    }
}
