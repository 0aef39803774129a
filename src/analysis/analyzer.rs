//! Analyzers combine a tokenizer with a chain of filters.
//!
//! # Available Implementations
//!
//! - [`PipelineAnalyzer`] - Custom tokenizer + filter chains
//! - [`EnglishAnalyzer`] - Case folding and English Snowball stemming
//!
//! # Examples
//!
//! ```
//! use simple_search::analysis::analyzer::{Analyzer, EnglishAnalyzer};
//!
//! let analyzer = EnglishAnalyzer::new();
//! let terms = analyzer.analyze_terms("Including EMERGENCIES").unwrap();
//!
//! assert_eq!(terms, vec!["includ", "emerg"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Implementations must be deterministic: the same text always yields the
/// same token sequence.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze the given text and keep only the term strings.
    fn analyze_terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .analyze(text)?
            .filter(|token| !token.is_empty())
            .map(|token| token.text)
            .collect())
    }
}

pub mod english;
pub mod pipeline;

pub use english::EnglishAnalyzer;
pub use pipeline::PipelineAnalyzer;
