//! Error types for simple-search.
//!
//! All fallible operations return [`SearchError`] through the crate
//! [`Result`] alias. Only the rebuild path propagates errors to callers;
//! queries always resolve to a [`SearchResult`](crate::search::SearchResult).
//!
//! # Examples
//!
//! ```
//! use simple_search::error::{Result, SearchError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SearchError::configuration("unsupported source kind 'ftp'"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for simple-search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// I/O errors (reading configuration or document files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration, including unrecognized source kinds.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configured source could not be read completely.
    #[error("Source unavailable: {source_title}: {message}")]
    SourceUnavailable {
        source_title: String,
        message: String,
    },

    /// Query parsing or evaluation errors.
    #[error("Query error: {0}")]
    Query(String),

    /// Analysis errors (tokenization, filtering).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Index construction errors.
    #[error("Index error: {0}")]
    Index(String),

    /// An operation needed a built index and there was none.
    #[error("No index available")]
    UninitializedIndex,

    /// A document had no body text to index.
    #[error("Document has no indexable text: {0}")]
    EmptyDocument(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        SearchError::Configuration(msg.into())
    }

    /// Create a new source-unavailable error.
    pub fn source_unavailable<T: Into<String>, S: Into<String>>(title: T, msg: S) -> Self {
        SearchError::SourceUnavailable {
            source_title: title.into(),
            message: msg.into(),
        }
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        SearchError::Query(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SearchError::Analysis(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        SearchError::Index(msg.into())
    }

    /// Create a new empty-document error.
    pub fn empty_document<S: Into<String>>(uri: S) -> Self {
        SearchError::EmptyDocument(uri.into())
    }
}
