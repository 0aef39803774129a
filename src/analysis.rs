//! Text analysis: turning raw text into normalized search terms.
//!
//! The same [`Analyzer`](analyzer::Analyzer) must be used for indexing and
//! for queries, otherwise query terms stop lining up with indexed terms.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Terms
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, EnglishAnalyzer, PipelineAnalyzer};
pub use token::{Token, TokenStream};
pub use token_filter::Filter;
pub use tokenizer::Tokenizer;
