//! Read-only views over a set of segments.

use std::sync::Arc;

use crate::document::IndexedDocument;
use crate::index::posting::{DocOrdinal, Posting};
use crate::index::segment::Segment;

/// An immutable, point-in-time view of the whole index.
///
/// Snapshots share their segments; building the next snapshot never
/// touches the current one, so a reader holding an `Arc<IndexSnapshot>`
/// keeps seeing exactly what was published when it took it.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    generation: u64,
    segments: Vec<Arc<Segment>>,
    /// Leading segments written by a rebuild; upserts never rewrite them.
    sealed: usize,
    doc_count: usize,
    total_length: u64,
}

impl IndexSnapshot {
    /// Create an empty snapshot.
    pub fn empty(generation: u64) -> Self {
        IndexSnapshot {
            generation,
            ..IndexSnapshot::default()
        }
    }

    /// Create a snapshot over ordered, contiguous segments, all sealed.
    pub fn from_segments(generation: u64, segments: Vec<Arc<Segment>>) -> Self {
        let segments: Vec<_> = segments.into_iter().filter(|s| !s.is_empty()).collect();
        let doc_count = segments.iter().map(|s| s.doc_count()).sum();
        let total_length = segments.iter().map(|s| s.total_length()).sum();

        IndexSnapshot {
            generation,
            sealed: segments.len(),
            segments,
            doc_count,
            total_length,
        }
    }

    /// A new snapshot sharing this one's segments plus `segment`.
    pub fn with_segment(&self, generation: u64, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Arc::new(segment));
        self.derive(generation, segments)
    }

    /// A new snapshot with the last unsealed segment replaced by `segment`.
    ///
    /// Falls back to appending when every segment is sealed.
    pub fn with_replaced_tail(&self, generation: u64, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        if segments.len() > self.sealed {
            segments.pop();
        }
        segments.push(Arc::new(segment));
        self.derive(generation, segments)
    }

    /// The last segment, if an upsert may still rewrite it.
    pub fn open_tail(&self) -> Option<&Arc<Segment>> {
        if self.segments.len() > self.sealed {
            self.segments.last()
        } else {
            None
        }
    }

    /// Number of leading segments written by a rebuild.
    pub fn sealed_segments(&self) -> usize {
        self.sealed
    }

    fn derive(&self, generation: u64, segments: Vec<Arc<Segment>>) -> Self {
        let sealed = self.sealed;
        IndexSnapshot {
            sealed: sealed.min(segments.len()),
            ..IndexSnapshot::from_segments(generation, segments)
        }
    }

    /// Monotonic number of the write that produced this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Segments, in ordinal order.
    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Whether no document is indexed.
    pub fn is_empty(&self) -> bool {
        self.doc_count == 0
    }

    /// Ordinal the next added document will get.
    pub fn next_doc(&self) -> DocOrdinal {
        self.segments.last().map_or(0, |s| s.end_doc())
    }

    /// Average analyzed document length.
    pub fn avg_doc_length(&self) -> f32 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_length as f32 / self.doc_count as f32
        }
    }

    /// Number of documents containing `term`.
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.segments
            .iter()
            .filter_map(|s| s.postings(term))
            .map(|l| l.doc_frequency())
            .sum()
    }

    /// All postings of `term`, in ordinal order.
    pub fn postings<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Posting> + 'a {
        self.segments
            .iter()
            .filter_map(move |s| s.postings(term))
            .flat_map(|l| l.iter())
    }

    /// Stored record of a document.
    pub fn document(&self, doc: DocOrdinal) -> Option<&IndexedDocument> {
        self.segment_of(doc).and_then(|s| s.document(doc))
    }

    /// Analyzed length of a document.
    pub fn doc_length(&self, doc: DocOrdinal) -> Option<u32> {
        self.segment_of(doc).and_then(|s| s.doc_length(doc))
    }

    /// Iterate over every stored document, in ordinal order.
    pub fn documents(&self) -> impl Iterator<Item = &IndexedDocument> {
        self.segments.iter().flat_map(|s| s.documents().iter())
    }

    fn segment_of(&self, doc: DocOrdinal) -> Option<&Segment> {
        let pos = self.segments.partition_point(|s| s.end_doc() <= doc);
        self.segments
            .get(pos)
            .filter(|s| s.contains(doc))
            .map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::segment::SegmentWriter;

    fn segment(first_doc: DocOrdinal, docs: &[&str]) -> Segment {
        let mut writer = SegmentWriter::new(first_doc);
        for (i, text) in docs.iter().enumerate() {
            let terms: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            writer.add_document(IndexedDocument::new(&format!("{first_doc}-{i}"), ""), &terms);
        }
        writer.finish()
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = IndexSnapshot::empty(3);

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.generation(), 3);
        assert_eq!(snapshot.next_doc(), 0);
        assert_eq!(snapshot.avg_doc_length(), 0.0);
        assert_eq!(snapshot.doc_frequency("fire"), 0);
        assert!(snapshot.document(0).is_none());
    }

    #[test]
    fn test_statistics_span_segments() {
        let snapshot = IndexSnapshot::from_segments(
            1,
            vec![
                Arc::new(segment(0, &["fire drill", "exit"])),
                Arc::new(segment(2, &["fire fire"])),
            ],
        );

        assert_eq!(snapshot.doc_count(), 3);
        assert_eq!(snapshot.next_doc(), 3);
        assert_eq!(snapshot.doc_frequency("fire"), 2);
        assert_eq!(snapshot.avg_doc_length(), 5.0 / 3.0);

        let docs: Vec<_> = snapshot.postings("fire").map(|p| p.doc).collect();
        assert_eq!(docs, vec![0, 2]);

        assert_eq!(snapshot.document(1).map(|d| d.uri.as_str()), Some("0-1"));
        assert_eq!(snapshot.document(2).map(|d| d.uri.as_str()), Some("2-0"));
        assert_eq!(snapshot.doc_length(2), Some(2));
        assert!(snapshot.document(3).is_none());
    }

    #[test]
    fn test_with_segment_leaves_original_untouched() {
        let first = IndexSnapshot::from_segments(1, vec![Arc::new(segment(0, &["fire"]))]);
        let second = first.with_segment(2, segment(first.next_doc(), &["flood"]));

        assert_eq!(first.doc_count(), 1);
        assert_eq!(first.doc_frequency("flood"), 0);
        assert_eq!(second.doc_count(), 2);
        assert_eq!(second.doc_frequency("flood"), 1);
        assert!(Arc::ptr_eq(&first.segments()[0], &second.segments()[0]));
    }

    #[test]
    fn test_only_appended_segments_can_be_replaced() {
        let built = IndexSnapshot::from_segments(1, vec![Arc::new(segment(0, &["fire"]))]);
        assert_eq!(built.sealed_segments(), 1);
        assert!(built.open_tail().is_none());

        let replaced = built.with_replaced_tail(2, segment(1, &["flood"]));
        assert_eq!(replaced.segments().len(), 2);
        assert_eq!(replaced.doc_frequency("fire"), 1);

        let tail = replaced.open_tail().cloned().unwrap();
        assert_eq!(tail.first_doc(), 1);

        let grown = replaced.with_replaced_tail(3, segment(1, &["flood", "flood barrier"]));
        assert_eq!(grown.segments().len(), 2);
        assert_eq!(grown.doc_count(), 3);
        assert_eq!(grown.doc_frequency("flood"), 2);
        assert_eq!(grown.sealed_segments(), 1);
        assert_eq!(replaced.doc_count(), 2);
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let snapshot = IndexSnapshot::from_segments(1, vec![Arc::new(Segment::default())]);
        assert!(snapshot.segments().is_empty());
    }
}
