//! Immutable index segments.
//!
//! A segment owns the postings and stored documents for a contiguous range
//! of document ordinals `[first_doc, first_doc + doc_count)`. Segments are
//! written once by a [`SegmentWriter`] and shared between snapshots
//! afterwards.

use std::sync::Arc;

use ahash::AHashMap;

use crate::document::IndexedDocument;
use crate::error::{Result, SearchError};
use crate::index::posting::{DocOrdinal, Posting, PostingList};

/// An immutable slice of the index.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    first_doc: DocOrdinal,
    documents: Vec<IndexedDocument>,
    doc_lengths: Vec<u32>,
    postings: AHashMap<String, PostingList>,
    total_length: u64,
}

impl Segment {
    /// First document ordinal held by this segment.
    pub fn first_doc(&self) -> DocOrdinal {
        self.first_doc
    }

    /// One past the last document ordinal held by this segment.
    pub fn end_doc(&self) -> DocOrdinal {
        self.first_doc + self.documents.len() as DocOrdinal
    }

    /// Number of documents in this segment.
    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether the segment holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether `doc` falls into this segment's range.
    pub fn contains(&self, doc: DocOrdinal) -> bool {
        doc >= self.first_doc && doc < self.end_doc()
    }

    /// Stored record of a document.
    pub fn document(&self, doc: DocOrdinal) -> Option<&IndexedDocument> {
        self.local(doc).map(|i| &self.documents[i])
    }

    /// Analyzed length of a document, in terms.
    pub fn doc_length(&self, doc: DocOrdinal) -> Option<u32> {
        self.local(doc).map(|i| self.doc_lengths[i])
    }

    /// Postings of a term within this segment.
    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Sum of all document lengths.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// Stored documents, in ordinal order.
    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    /// Merge adjacent segments into one.
    ///
    /// The segments must be ordered and their ordinal ranges must touch.
    pub fn merge(segments: &[Arc<Segment>]) -> Result<Segment> {
        let Some(first) = segments.first() else {
            return Ok(Segment::default());
        };

        let mut merged = Segment {
            first_doc: first.first_doc,
            ..Segment::default()
        };

        for segment in segments {
            if segment.first_doc != merged.end_doc() {
                return Err(SearchError::index(format!(
                    "cannot merge segment starting at {} after ordinal {}",
                    segment.first_doc,
                    merged.end_doc()
                )));
            }

            merged.documents.extend(segment.documents.iter().cloned());
            merged.doc_lengths.extend_from_slice(&segment.doc_lengths);
            merged.total_length += segment.total_length;

            for (term, list) in &segment.postings {
                merged
                    .postings
                    .entry(term.clone())
                    .or_default()
                    .extend_from(list);
            }
        }

        Ok(merged)
    }

    fn local(&self, doc: DocOrdinal) -> Option<usize> {
        self.contains(doc).then(|| (doc - self.first_doc) as usize)
    }
}

/// Accumulates documents into a new [`Segment`].
#[derive(Debug)]
pub struct SegmentWriter {
    segment: Segment,
}

impl SegmentWriter {
    /// Create a writer whose first document gets ordinal `first_doc`.
    pub fn new(first_doc: DocOrdinal) -> Self {
        SegmentWriter {
            segment: Segment {
                first_doc,
                ..Segment::default()
            },
        }
    }

    /// Add a document with its analyzed terms and return its ordinal.
    pub fn add_document(&mut self, document: IndexedDocument, terms: &[String]) -> DocOrdinal {
        let doc = self.segment.end_doc();

        let mut frequencies: AHashMap<&str, u32> = AHashMap::new();
        for term in terms {
            *frequencies.entry(term.as_str()).or_insert(0) += 1;
        }

        for (term, term_frequency) in frequencies {
            self.segment
                .postings
                .entry(term.to_string())
                .or_default()
                .add_posting(Posting::new(doc, term_frequency));
        }

        let length = terms.len() as u32;
        self.segment.documents.push(document);
        self.segment.doc_lengths.push(length);
        self.segment.total_length += u64::from(length);

        doc
    }

    /// Number of documents buffered so far.
    pub fn buffered_docs(&self) -> usize {
        self.segment.doc_count()
    }

    /// Whether nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Ordinal the next added document will get.
    pub fn next_doc(&self) -> DocOrdinal {
        self.segment.end_doc()
    }

    /// Seal the segment.
    pub fn finish(self) -> Segment {
        self.segment
    }
}
