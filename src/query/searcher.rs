//! Evaluates parsed queries against an index snapshot.

use ahash::{AHashMap, AHashSet};
use log::debug;

use crate::index::{DocOrdinal, IndexSnapshot};
use crate::query::collector::{ScoredDoc, TopDocsCollector};
use crate::query::parser::{Clause, Occur, ParsedQuery};
use crate::query::scorer::{Similarity, TermStatistics};

/// Per-document accumulator.
#[derive(Debug, Default, Clone, Copy)]
struct Candidate {
    score: f32,
    matched: usize,
    required: usize,
}

/// Runs queries against one snapshot.
///
/// A document matches when it satisfies every required clause, no
/// prohibited clause, and at least one scoring clause. A clause is satisfied
/// when every one of its terms occurs in the document.
#[derive(Debug)]
pub struct Searcher<'a> {
    snapshot: &'a IndexSnapshot,
    similarity: &'a dyn Similarity,
}

impl<'a> Searcher<'a> {
    pub fn new(snapshot: &'a IndexSnapshot, similarity: &'a dyn Similarity) -> Self {
        Searcher {
            snapshot,
            similarity,
        }
    }

    /// Return the best `limit` documents, best first.
    pub fn search(&self, query: &ParsedQuery, limit: usize) -> Vec<ScoredDoc> {
        let scoring_total = query.clauses().iter().filter(|c| c.is_scoring()).count();
        if scoring_total == 0 || self.snapshot.is_empty() {
            return Vec::new();
        }

        let required_total = query
            .clauses()
            .iter()
            .filter(|c| c.occur == Occur::Must)
            .count();

        let mut candidates: AHashMap<DocOrdinal, Candidate> = AHashMap::new();
        let mut prohibited: AHashSet<DocOrdinal> = AHashSet::new();

        for clause in query.clauses() {
            let matches = self.clause_matches(clause);

            if clause.occur == Occur::MustNot {
                for doc in matches.keys() {
                    prohibited.insert(*doc);
                }
                continue;
            }

            for (doc, score) in matches {
                let candidate = candidates.entry(doc).or_default();
                candidate.score += score;
                candidate.matched += 1;
                if clause.occur == Occur::Must {
                    candidate.required += 1;
                }
            }
        }

        let mut collector = TopDocsCollector::new(limit);
        for (doc, candidate) in candidates {
            if candidate.required < required_total || prohibited.contains(&doc) {
                continue;
            }
            let coord = self.similarity.coord(candidate.matched, scoring_total);
            collector.collect(doc, candidate.score * coord);
        }

        debug!(
            "Query '{query}' matched {} documents with {}",
            collector.total_hits(),
            self.similarity.name()
        );

        collector.into_sorted_vec()
    }

    /// Documents containing every term of `clause`, with the clause score.
    fn clause_matches(&self, clause: &Clause) -> AHashMap<DocOrdinal, f32> {
        let mut found: AHashMap<DocOrdinal, (usize, f32)> = AHashMap::new();

        for term in &clause.terms {
            let stats = TermStatistics {
                doc_freq: self.snapshot.doc_frequency(term),
                doc_count: self.snapshot.doc_count(),
                avg_doc_length: self.snapshot.avg_doc_length(),
            };
            if stats.doc_freq == 0 {
                return AHashMap::new();
            }

            for posting in self.snapshot.postings(term) {
                let doc_length = self.snapshot.doc_length(posting.doc).unwrap_or(0);
                let entry = found.entry(posting.doc).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += self.similarity.score(posting.term_frequency, doc_length, &stats);
            }
        }

        let needed = clause.terms.len();
        found
            .into_iter()
            .filter(|(_, (count, _))| *count == needed)
            .map(|(doc, (_, score))| (doc, score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::{Analyzer, EnglishAnalyzer};
    use crate::document::IndexedDocument;
    use crate::index::SegmentWriter;
    use crate::query::parser::QueryParser;
    use crate::query::scorer::{Bm25Similarity, TfIdfSimilarity};

    fn snapshot(texts: &[&str]) -> IndexSnapshot {
        let analyzer = EnglishAnalyzer::new();
        let mut writer = SegmentWriter::new(0);
        for (i, text) in texts.iter().enumerate() {
            let terms = analyzer.analyze_terms(text).unwrap();
            writer.add_document(IndexedDocument::new(&format!("doc{i}"), ""), &terms);
        }
        IndexSnapshot::empty(0).with_segment(1, writer.finish())
    }

    fn search(snapshot: &IndexSnapshot, query: &str) -> Vec<DocOrdinal> {
        let parser = QueryParser::new(Arc::new(EnglishAnalyzer::new()));
        let query = parser.parse(query).unwrap();
        Searcher::new(snapshot, &TfIdfSimilarity)
            .search(&query, 25)
            .iter()
            .map(|d| d.doc)
            .collect()
    }

    #[test]
    fn test_optional_terms_match_either() {
        let index = snapshot(&["fire exit", "flood barrier", "office plants"]);
        let mut docs = search(&index, "fire flood");
        docs.sort();
        assert_eq!(docs, vec![0, 1]);
    }

    #[test]
    fn test_more_matching_clauses_rank_higher() {
        let index = snapshot(&["fire alarm", "fire alarm drill", "drill"]);
        assert_eq!(search(&index, "fire drill")[0], 1);
    }

    #[test]
    fn test_required_and_prohibited() {
        let index = snapshot(&["fire drill", "fire alarm", "drill"]);

        assert_eq!(search(&index, "+fire drill"), vec![0, 1]);
        assert_eq!(search(&index, "fire -drill"), vec![1]);
        assert_eq!(search(&index, "fire AND drill"), vec![0]);
    }

    #[test]
    fn test_only_prohibited_matches_nothing() {
        let index = snapshot(&["fire drill", "alarm"]);
        assert!(search(&index, "-fire").is_empty());
    }

    #[test]
    fn test_phrase_requires_all_terms() {
        let index = snapshot(&["fire drill tomorrow", "drill fire", "fire alarm"]);
        let mut docs = search(&index, "\"fire drill\"");
        docs.sort();
        assert_eq!(docs, vec![0, 1]);
    }

    #[test]
    fn test_term_frequency_raises_rank() {
        let index = snapshot(&[
            "fire drill exit stairs alarm",
            "fire fire fire drill exit",
        ]);
        assert_eq!(search(&index, "fire"), vec![1, 0]);
    }

    #[test]
    fn test_repetition_alone_raises_rank() {
        let index = snapshot(&["fire", "fire fire fire"]);
        assert_eq!(search(&index, "fire"), vec![1, 0]);
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let index = snapshot(&["drill", "other", "drill", "drill"]);
        assert_eq!(search(&index, "drill"), vec![0, 2, 3]);
    }

    #[test]
    fn test_limit() {
        let texts: Vec<String> = (0..40).map(|i| format!("drill number{i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let index = snapshot(&refs);

        let docs = search(&index, "drill");
        assert_eq!(docs.len(), 25);
        assert_eq!(docs[0], 0);
        assert_eq!(docs[24], 24);
    }

    #[test]
    fn test_unknown_term() {
        let index = snapshot(&["fire"]);
        assert!(search(&index, "volcano").is_empty());
    }

    #[test]
    fn test_bm25_ranks_by_frequency() {
        let index = snapshot(&[
            "fire drill exit stairs alarm",
            "fire fire fire drill exit",
            "office plants",
        ]);
        let parser = QueryParser::new(Arc::new(EnglishAnalyzer::new()));
        let query = parser.parse("fire").unwrap();
        let similarity = Bm25Similarity::default();

        let docs: Vec<_> = Searcher::new(&index, &similarity)
            .search(&query, 10)
            .iter()
            .map(|d| d.doc)
            .collect();
        assert_eq!(docs, vec![1, 0]);
    }
}
