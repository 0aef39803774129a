//! Document sources feed raw documents into a rebuild.
//!
//! A source turns one [`SourceConfig`] into a stream of [`RawDocument`]s.
//! Items are results so that a source can report a broken document and keep
//! going; the index builder drains the whole stream before it decides
//! whether the source failed.

pub mod folder;
pub mod memory;

pub use folder::FolderSource;
pub use memory::InMemorySource;

use crate::config::SourceConfig;
use crate::document::RawDocument;
use crate::error::Result;

/// Stream of raw documents produced by a source.
pub type DocumentStream = Box<dyn Iterator<Item = Result<RawDocument>> + Send>;

/// Fetches the raw documents of a configured source.
pub trait DocumentSource: Send + Sync {
    /// Open a stream over the documents of `source`.
    ///
    /// Returns a configuration error when this implementation cannot serve
    /// the source's kind.
    fn fetch(&self, source: &SourceConfig) -> Result<DocumentStream>;
}

impl<F> DocumentSource for F
where
    F: Fn(&SourceConfig) -> Result<DocumentStream> + Send + Sync,
{
    fn fetch(&self, source: &SourceConfig) -> Result<DocumentStream> {
        self(source)
    }
}
