//! The search service: index lifecycle, upserts and queries.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::analysis::{Analyzer, EnglishAnalyzer};
use crate::config::SearchConfig;
use crate::document::{DocumentId, RawDocument};
use crate::error::{Result, SearchError};
use crate::extract::{HtmlTextExtractor, TitleGenerator};
use crate::index::{BuildSummary, IndexBuilder, IndexSnapshot};
use crate::query::{QueryParser, Searcher, Similarity, similarity_for};
use crate::search::result::{SearchHit, SearchResult};
use crate::source::{DocumentSource, FolderSource};

/// Owns the published index and serializes writers.
///
/// Readers take the current snapshot and never block on a writer: the lock
/// around the snapshot pointer is only held to clone or swap an `Arc`.
/// Rebuilds and upserts run one at a time under the writer lock, build
/// the next snapshot privately and publish it in one swap.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use simple_search::config::{SearchConfig, SourceConfig};
/// use simple_search::document::RawDocument;
/// use simple_search::search::SearchService;
/// use simple_search::source::InMemorySource;
///
/// let pages = Arc::new(InMemorySource::new());
/// pages.insert("Handbook", vec![RawDocument::from_text(
///     "a.html",
///     "<h1>Fire</h1><p>Leave the building</p>",
///     "/handbook/a.html",
/// )]);
///
/// let config = SearchConfig::with_sources(vec![SourceConfig::folder("Handbook", "/handbook")]);
/// let service = SearchService::new(config, pages).unwrap();
///
/// assert_eq!(service.search("fire").message, "no index available");
///
/// service.build_or_rebuild_index().unwrap();
/// let result = service.search("buildings");
/// assert_eq!(result.message, "found 1 matches for: buildings");
/// ```
pub struct SearchService {
    config: SearchConfig,
    source: Arc<dyn DocumentSource>,
    builder: IndexBuilder,
    parser: QueryParser,
    similarity: Box<dyn Similarity>,
    /// Last published snapshot; `None` until the first successful build.
    current: RwLock<Option<Arc<IndexSnapshot>>>,
    /// Writer lock, guarding the last generation number handed out.
    writer: Mutex<u64>,
}

impl SearchService {
    /// Create a service reading documents through `source`.
    pub fn new(config: SearchConfig, source: Arc<dyn DocumentSource>) -> Result<Self> {
        config.validate()?;

        let analyzer: Arc<dyn Analyzer> = Arc::new(EnglishAnalyzer::new());
        let extractor = HtmlTextExtractor::with_title_generator(TitleGenerator::new(
            config.engine.title_length,
        ));
        let builder = IndexBuilder::new(analyzer.clone(), Arc::new(extractor))
            .with_default_title_selector(config.engine.default_title_selector.clone());

        Ok(SearchService {
            similarity: similarity_for(config.engine.scoring),
            parser: QueryParser::new(analyzer),
            builder,
            source,
            config,
            current: RwLock::new(None),
            writer: Mutex::new(0),
        })
    }

    /// Create a service reading sources from local folders.
    pub fn with_folder_source(config: SearchConfig) -> Result<Self> {
        SearchService::new(config, Arc::new(FolderSource::new()))
    }

    /// The configuration this service was created with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The currently published snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.current.read().clone()
    }

    /// Whether an index has been published.
    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Rebuild the whole index from the configured sources.
    ///
    /// The new index replaces the old one only if every source was read
    /// successfully; otherwise the previous index stays in place and the
    /// error is returned.
    pub fn build_or_rebuild_index(&self) -> Result<BuildSummary> {
        let mut generation = self.writer.lock();
        let next = *generation + 1;

        info!("Rebuilding index from {} sources", self.config.sources.len());

        let (snapshot, summary) =
            match self
                .builder
                .build(&self.config.sources, self.source.as_ref(), next)
            {
                Ok(built) => built,
                Err(e) => {
                    error!("Rebuild failed, keeping the previous index: {e}");
                    return Err(e);
                }
            };

        *generation = next;
        self.publish(snapshot);

        Ok(summary)
    }

    /// Run [`build_or_rebuild_index`](Self::build_or_rebuild_index) on a
    /// background thread.
    pub fn spawn_build(self: &Arc<Self>) -> JoinHandle<Result<BuildSummary>> {
        let service = Arc::clone(self);
        thread::spawn(move || service.build_or_rebuild_index())
    }

    /// Add one document to the live index without a rebuild.
    ///
    /// Fails with [`SearchError::UninitializedIndex`] before the first
    /// build, and with [`SearchError::EmptyDocument`] when the document has
    /// no text. The index is unchanged on failure.
    ///
    /// Upserts are never compacted into the main segment; each run of
    /// `max_buffered_docs` upserts adds one segment that every query then
    /// visits. A rebuild folds them back into a single segment.
    pub fn add_document(&self, raw: RawDocument) -> Result<DocumentId> {
        let mut generation = self.writer.lock();

        let current = self.snapshot().ok_or(SearchError::UninitializedIndex)?;
        let next = *generation + 1;

        let (snapshot, id) = self.builder.upsert(&current, &raw, next)?;

        *generation = next;
        self.publish(snapshot);
        info!("Indexed {} as {id}", raw.source_uri);

        Ok(id)
    }

    /// Answer a query. Never fails; problems become not-found results.
    pub fn search(&self, text: &str) -> SearchResult {
        if text.trim().is_empty() {
            return SearchResult::empty_query();
        }

        let Some(snapshot) = self.snapshot() else {
            warn!("Search before an index was built");
            return SearchResult::no_index();
        };

        match self.run_query(&snapshot, text) {
            Ok(hits) => SearchResult::found(text, hits),
            Err(e) => {
                error!("Error during search for '{text}': {e}");
                SearchResult::failed()
            }
        }
    }

    fn run_query(&self, snapshot: &IndexSnapshot, text: &str) -> Result<Vec<SearchHit>> {
        let query = self.parser.parse(text)?;
        debug!("Parsed '{text}' as '{query}'");

        let scored = Searcher::new(snapshot, self.similarity.as_ref())
            .search(&query, self.config.engine.max_hits);

        scored
            .into_iter()
            .map(|scored| {
                let document = snapshot.document(scored.doc).ok_or_else(|| {
                    SearchError::index(format!("no stored document for ordinal {}", scored.doc))
                })?;
                Ok(SearchHit {
                    id: document.id,
                    uri: document.uri.clone(),
                    display_text: document.display_text.clone(),
                    score: scored.score,
                })
            })
            .collect()
    }

    fn publish(&self, snapshot: IndexSnapshot) {
        debug!(
            "Publishing generation {} ({} documents, {} segments)",
            snapshot.generation(),
            snapshot.doc_count(),
            snapshot.segments().len()
        );
        *self.current.write() = Some(Arc::new(snapshot));
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("config", &self.config)
            .field("builder", &self.builder)
            .field("similarity", &self.similarity.name())
            .field("generation", &self.snapshot().map(|s| s.generation()))
            .finish()
    }
}
