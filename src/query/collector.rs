//! Collector gathering the best-scoring documents.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::index::DocOrdinal;

/// A document with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc: DocOrdinal,
    pub score: f32,
}

impl ScoredDoc {
    pub fn new(doc: DocOrdinal, score: f32) -> Self {
        ScoredDoc { doc, score }
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank order: higher score first, then lower ordinal first.
///
/// "Less" means ranked earlier, so the max of a `BinaryHeap` is the worst
/// document kept and `into_sorted_vec` yields the ranking.
impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc.cmp(&other.doc))
    }
}

/// Keeps the top N documents by score.
#[derive(Debug)]
pub struct TopDocsCollector {
    /// Maximum number of documents to keep.
    max_docs: usize,
    /// Kept documents; the worst is on top.
    hits: BinaryHeap<ScoredDoc>,
    /// Total number of documents offered.
    total_hits: usize,
}

impl TopDocsCollector {
    /// Create a new top docs collector.
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs.min(1024)),
            total_hits: 0,
        }
    }

    /// Offer a document.
    pub fn collect(&mut self, doc: DocOrdinal, score: f32) {
        self.total_hits += 1;

        if self.max_docs == 0 {
            return;
        }

        let candidate = ScoredDoc::new(doc, score);

        if self.hits.len() < self.max_docs {
            self.hits.push(candidate);
        } else if let Some(mut worst) = self.hits.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    /// Get the maximum number of documents to keep.
    pub fn max_docs(&self) -> usize {
        self.max_docs
    }

    /// Number of documents offered, kept or not.
    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    /// The kept documents, best first.
    pub fn into_sorted_vec(self) -> Vec<ScoredDoc> {
        self.hits.into_sorted_vec()
    }
}
