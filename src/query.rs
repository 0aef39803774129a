//! Query parsing, scoring and evaluation.
//!
//! ```text
//! query string → QueryParser → ParsedQuery → Searcher → ranked ordinals
//!                    │                          │
//!                 Analyzer                  Similarity
//! ```

pub mod collector;
pub mod parser;
pub mod scorer;
pub mod searcher;

pub use collector::{ScoredDoc, TopDocsCollector};
pub use parser::{Clause, Occur, ParsedQuery, QueryParser};
pub use scorer::{Bm25Similarity, Similarity, TermStatistics, TfIdfSimilarity, similarity_for};
pub use searcher::Searcher;
