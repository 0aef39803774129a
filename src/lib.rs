//! # simple-search
//!
//! In-memory full-text search over HTML documents.
//!
//! ## Features
//!
//! - Lenient HTML extraction with duplicate-node removal and generated titles
//! - English analysis (case folding, Snowball stemming)
//! - Segmented inverted index with snapshot isolation
//! - Boolean queries ranked by TF/IDF or BM25
//! - Single-writer/many-reader search service
//!
//! ## Example
//!
//! ```no_run
//! use simple_search::config::{SearchConfig, SourceConfig};
//! use simple_search::search::SearchService;
//!
//! let config = SearchConfig::with_sources(vec![
//!     SourceConfig::folder("Handbook", "./pages").with_file_pattern("*.html"),
//! ]);
//! let service = SearchService::with_folder_source(config).unwrap();
//! service.build_or_rebuild_index().unwrap();
//!
//! for hit in service.search("emergency procedures").hits {
//!     println!("{:.3} {} ({})", hit.score, hit.display_text, hit.uri);
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod index;
pub mod query;
pub mod search;
pub mod source;

pub mod prelude {
    pub use crate::config::{SearchConfig, SourceConfig};
    pub use crate::document::{DocumentId, RawDocument};
    pub use crate::error::{Result, SearchError};
    pub use crate::search::{SearchHit, SearchResult, SearchService};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
