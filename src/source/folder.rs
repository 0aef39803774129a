//! Folder source: every matching file under a directory tree.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use log::{debug, error};
use walkdir::WalkDir;

use crate::config::{SourceConfig, SourceKind};
use crate::document::RawDocument;
use crate::error::{Result, SearchError};
use crate::source::{DocumentSource, DocumentStream};

/// Reads documents from local folders.
///
/// Files are matched by name against the source's `file_pattern` (all files
/// when it is empty) and visited in sorted order. The document id is the
/// path relative to the folder, the uri is the full path.
///
/// A missing folder is logged and yields no documents. Only `folder`
/// sources are served.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderSource;

impl FolderSource {
    pub fn new() -> Self {
        FolderSource
    }

    fn walk(source: &SourceConfig) -> Result<DocumentStream> {
        let root = PathBuf::from(&source.uri);
        if !root.is_dir() {
            error!(
                "Folder '{}' of source '{}' does not exist",
                root.display(),
                source.title
            );
            return Ok(Box::new(std::iter::empty()));
        }

        let matcher = file_matcher(source.file_pattern.as_deref())?;
        let title = source.title.clone();

        let documents = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(SearchError::source_unavailable(&title, e.to_string()))),
                };
                if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
                    return None;
                }
                Some(read_document(&root, entry.path(), &title))
            });

        Ok(Box::new(documents))
    }
}

impl DocumentSource for FolderSource {
    fn fetch(&self, source: &SourceConfig) -> Result<DocumentStream> {
        match source.source_kind()? {
            SourceKind::Folder => Self::walk(source),
            kind @ (SourceKind::Web | SourceKind::Database) => Err(SearchError::configuration(
                format!("source '{}': kind '{kind}' is not supported", source.title),
            )),
        }
    }
}

fn file_matcher(pattern: Option<&str>) -> Result<GlobMatcher> {
    let pattern = pattern.map(str::trim).filter(|p| !p.is_empty()).unwrap_or("*");
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| SearchError::configuration(format!("invalid file pattern '{pattern}': {e}")))
}

fn read_document(root: &Path, path: &Path, title: &str) -> Result<RawDocument> {
    let content = std::fs::read(path).map_err(|e| {
        SearchError::source_unavailable(title, format!("failed to read {}: {e}", path.display()))
    })?;

    let id = path.strip_prefix(root).unwrap_or(path).to_string_lossy().into_owned();
    debug!("Read {} ({} bytes)", path.display(), content.len());

    Ok(RawDocument::new(id, content, path.to_string_lossy()))
}
