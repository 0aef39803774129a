//! Configuration for sources and the search engine.
//!
//! Configuration is JSON. The `sources` list is read once per full rebuild;
//! the `engine` section tunes ranking and extraction.
//!
//! ```json
//! {
//!   "sources": [
//!     {
//!       "title": "Handbook",
//!       "kind": "folder",
//!       "uri": "./pages",
//!       "file_pattern": "*.html",
//!       "title_selector": "h2[class*='content-title']"
//!     }
//!   ],
//!   "engine": { "max_hits": 25, "scoring": "tfidf" }
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Default number of hits returned by a query.
pub const DEFAULT_MAX_HITS: usize = 25;

/// Default length of a generated title, in characters.
pub const DEFAULT_TITLE_LENGTH: usize = 10;

/// Where a source pulls its raw documents from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Pages fetched over HTTP.
    Web,
    /// Files under a local folder.
    Folder,
    /// Records held in a document database.
    Database,
}

impl FromStr for SourceKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(SourceKind::Web),
            "folder" => Ok(SourceKind::Folder),
            "database" => Ok(SourceKind::Database),
            other => Err(SearchError::configuration(format!(
                "unrecognized source kind '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Web => "web",
            SourceKind::Folder => "folder",
            SourceKind::Database => "database",
        };
        f.write_str(name)
    }
}

/// Describes one place to pull raw documents from.
///
/// The kind is kept as written in the configuration and only resolved by
/// [`SourceConfig::source_kind`], so an unknown kind surfaces as a
/// configuration error when a rebuild reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Name shown in logs and errors.
    pub title: String,

    /// Raw source kind (`web`, `folder` or `database`).
    pub kind: String,

    /// Location of the source. For folders, the root path.
    pub uri: String,

    /// File name pattern, e.g. `*.html`. Empty or absent means every file.
    #[serde(default)]
    pub file_pattern: Option<String>,

    /// CSS selector locating the title element of each document.
    #[serde(default)]
    pub title_selector: String,
}

impl SourceConfig {
    /// Create a folder source.
    pub fn folder<T: Into<String>, U: Into<String>>(title: T, path: U) -> Self {
        SourceConfig {
            title: title.into(),
            kind: SourceKind::Folder.to_string(),
            uri: path.into(),
            file_pattern: None,
            title_selector: String::new(),
        }
    }

    /// Set the file name pattern.
    pub fn with_file_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.file_pattern = Some(pattern.into());
        self
    }

    /// Set the title selector.
    pub fn with_title_selector<S: Into<String>>(mut self, selector: S) -> Self {
        self.title_selector = selector.into();
        self
    }

    /// Resolve the configured kind.
    pub fn source_kind(&self) -> Result<SourceKind> {
        self.kind.parse()
    }
}

/// Ranking function used to score hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringKind {
    /// Classic TF/IDF with length normalization and coordination.
    #[default]
    TfIdf,
    /// Okapi BM25.
    Bm25,
}

/// Engine-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of hits returned by a query.
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,

    /// Number of characters kept when a title is generated from body text.
    #[serde(default = "default_title_length")]
    pub title_length: usize,

    /// Title selector applied to documents added one at a time.
    #[serde(default)]
    pub default_title_selector: String,

    /// Ranking function.
    #[serde(default)]
    pub scoring: ScoringKind,
}

fn default_max_hits() -> usize {
    DEFAULT_MAX_HITS
}

fn default_title_length() -> usize {
    DEFAULT_TITLE_LENGTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_hits: DEFAULT_MAX_HITS,
            title_length: DEFAULT_TITLE_LENGTH,
            default_title_selector: String::new(),
            scoring: ScoringKind::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Sources indexed by a full rebuild, in order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SearchConfig {
    /// Create a configuration over the given sources with default engine settings.
    pub fn with_sources(sources: Vec<SourceConfig>) -> Self {
        SearchConfig {
            sources,
            engine: EngineConfig::default(),
        }
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_hits == 0 {
            return Err(SearchError::configuration("engine.max_hits must be >= 1"));
        }

        for (i, source) in self.sources.iter().enumerate() {
            if source.title.trim().is_empty() {
                return Err(SearchError::configuration(format!(
                    "sources[{i}].title must not be empty"
                )));
            }
        }

        Ok(())
    }
}

/// Parse and validate a configuration from a JSON string.
pub fn parse_config(content: &str) -> Result<SearchConfig> {
    let config: SearchConfig = serde_json::from_str(content)
        .map_err(|e| SearchError::configuration(format!("failed to parse config: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<SearchConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SearchError::configuration(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    parse_config(&content)
}
