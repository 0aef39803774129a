//! Similarity functions for ranking search results.

use std::fmt::Debug;

use crate::config::ScoringKind;

/// Corpus-wide statistics of one query term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermStatistics {
    /// Documents containing the term.
    pub doc_freq: usize,
    /// Documents in the index.
    pub doc_count: usize,
    /// Average analyzed document length.
    pub avg_doc_length: f32,
}

/// Trait for similarity functions.
pub trait Similarity: Send + Sync + Debug {
    /// Score one term occurring `term_freq` times in a document of
    /// `doc_length` terms.
    fn score(&self, term_freq: u32, doc_length: u32, stats: &TermStatistics) -> f32;

    /// Factor applied for matching `matched` of `total` scoring clauses.
    fn coord(&self, _matched: usize, _total: usize) -> f32 {
        1.0
    }

    /// Get the name of this similarity.
    fn name(&self) -> &'static str;
}

/// Create the similarity selected by configuration.
pub fn similarity_for(kind: ScoringKind) -> Box<dyn Similarity> {
    match kind {
        ScoringKind::TfIdf => Box::new(TfIdfSimilarity),
        ScoringKind::Bm25 => Box::new(Bm25Similarity::default()),
    }
}

/// Classic TF/IDF.
///
/// `tf * idf² / sqrt(length)` per term with `idf = 1 + ln(N / (df + 1))`,
/// scaled by the fraction of clauses matched.
///
/// Term frequency grows linearly against the square-root length norm, so
/// repeating a term always raises its score even though it also makes the
/// document longer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfSimilarity;

impl TfIdfSimilarity {
    /// Inverse document frequency.
    pub fn idf(stats: &TermStatistics) -> f32 {
        1.0 + (stats.doc_count as f32 / (stats.doc_freq as f32 + 1.0)).ln()
    }
}

impl Similarity for TfIdfSimilarity {
    fn score(&self, term_freq: u32, doc_length: u32, stats: &TermStatistics) -> f32 {
        if term_freq == 0 {
            return 0.0;
        }

        let idf = Self::idf(stats);
        let norm = 1.0 / (doc_length.max(1) as f32).sqrt();

        term_freq as f32 * idf * idf * norm
    }

    fn coord(&self, matched: usize, total: usize) -> f32 {
        if total == 0 {
            0.0
        } else {
            matched as f32 / total as f32
        }
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

/// Okapi BM25.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Similarity {
    k1: f32,
    b: f32,
}

impl Bm25Similarity {
    /// Create a BM25 similarity with custom parameters.
    pub fn with_params(k1: f32, b: f32) -> Self {
        Bm25Similarity { k1, b }
    }

    /// Get the k1 parameter.
    pub fn k1(&self) -> f32 {
        self.k1
    }

    /// Get the b parameter.
    pub fn b(&self) -> f32 {
        self.b
    }

    /// Inverse document frequency, never negative.
    pub fn idf(stats: &TermStatistics) -> f32 {
        let n = stats.doc_count as f32;
        let df = stats.doc_freq as f32;

        // IDF = ln(1 + (N - df + 0.5) / (df + 0.5))
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }
}

impl Default for Bm25Similarity {
    fn default() -> Self {
        Bm25Similarity { k1: 1.2, b: 0.75 }
    }
}

impl Similarity for Bm25Similarity {
    fn score(&self, term_freq: u32, doc_length: u32, stats: &TermStatistics) -> f32 {
        if term_freq == 0 || stats.doc_freq == 0 {
            return 0.0;
        }

        let tf = term_freq as f32;
        let avg_len = if stats.avg_doc_length > 0.0 { stats.avg_doc_length } else { 1.0 };
        let norm_factor = 1.0 - self.b + self.b * (doc_length as f32 / avg_len);

        Self::idf(stats) * (tf * (self.k1 + 1.0)) / (tf + self.k1 * norm_factor)
    }

    fn name(&self) -> &'static str {
        "bm25"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(doc_freq: usize, doc_count: usize) -> TermStatistics {
        TermStatistics {
            doc_freq,
            doc_count,
            avg_doc_length: 10.0,
        }
    }

    #[test]
    fn test_tfidf_formula() {
        let similarity = TfIdfSimilarity;
        let s = stats(1, 3);

        let idf = 1.0 + (3.0f32 / 2.0).ln();
        let expected = 4.0 * idf * idf / 16.0f32.sqrt();

        assert!((similarity.score(4, 16, &s) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_tfidf_higher_frequency_scores_higher() {
        let similarity = TfIdfSimilarity;
        let s = stats(2, 10);

        assert!(similarity.score(3, 8, &s) > similarity.score(1, 8, &s));
    }

    #[test]
    fn test_tfidf_repetition_outweighs_added_length() {
        let similarity = TfIdfSimilarity;
        let s = stats(2, 3);

        // "fire" against "fire fire fire"
        assert!(similarity.score(3, 3, &s) > similarity.score(1, 1, &s));
        // "fire exit" against "fire fire fire exit"
        assert!(similarity.score(3, 4, &s) > similarity.score(1, 2, &s));
        for extra in 1..50 {
            assert!(similarity.score(1 + extra, 1 + extra, &s) > similarity.score(extra, extra, &s));
        }
    }

    #[test]
    fn test_tfidf_rarer_terms_score_higher() {
        let similarity = TfIdfSimilarity;

        assert!(similarity.score(1, 8, &stats(1, 10)) > similarity.score(1, 8, &stats(9, 10)));
    }

    #[test]
    fn test_tfidf_is_positive_when_every_doc_matches() {
        assert!(TfIdfSimilarity.score(1, 1, &stats(1, 1)) > 0.0);
    }

    #[test]
    fn test_tfidf_coord() {
        assert_eq!(TfIdfSimilarity.coord(1, 2), 0.5);
        assert_eq!(TfIdfSimilarity.coord(0, 0), 0.0);
    }

    #[test]
    fn test_bm25_saturates() {
        let similarity = Bm25Similarity::default();
        let s = stats(1, 10);

        let one = similarity.score(1, 10, &s);
        let ten = similarity.score(10, 10, &s);
        let hundred = similarity.score(100, 10, &s);

        assert!(ten > one);
        assert!(hundred - ten < ten - one);
        assert_eq!(similarity.coord(1, 2), 1.0);
    }

    #[test]
    fn test_bm25_params() {
        let similarity = Bm25Similarity::with_params(2.0, 0.5);
        assert_eq!(similarity.k1(), 2.0);
        assert_eq!(similarity.b(), 0.5);
    }

    #[test]
    fn test_similarity_for() {
        assert_eq!(similarity_for(ScoringKind::TfIdf).name(), "tfidf");
        assert_eq!(similarity_for(ScoringKind::Bm25).name(), "bm25");
    }
}
