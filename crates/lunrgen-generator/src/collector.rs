//! Content collection.
//!
//! Walks the content directory and turns every published page into a
//! [`PageDescriptor`], in a deterministic discovery order.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use lunrgen_core::{Config, ContentPath, ContentType, Frontmatter, PageDescriptor};
use lunrgen_parser::ParserRegistry;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error in {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Parser or frontmatter error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid content path.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Why a page was left out of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// `search: false` in the frontmatter.
    SearchDisabled,
    /// `published: false` in the frontmatter.
    Unpublished,
    /// `draft: true` while drafts are disabled.
    Draft,
    /// Dated in the future while future pages are disabled.
    Future,
}

/// Pages collected from the content directory.
#[derive(Debug, Default)]
pub struct Collection {
    /// Descriptors in discovery order.
    pub pages: Vec<PageDescriptor>,

    /// Number of files excluded by frontmatter flags.
    pub excluded: usize,

    /// Files that failed to parse, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl Collection {
    /// Number of content files that did not produce a page.
    pub fn skipped(&self) -> usize {
        self.excluded + self.failed.len()
    }
}

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    parser: ParserRegistry,
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            parser: ParserRegistry::new(),
            content_dir: content_dir.into(),
        }
    }

    /// Collect all searchable pages from the content directory.
    ///
    /// Unreadable files abort collection; files with broken frontmatter are
    /// logged and recorded in [`Collection::failed`].
    pub fn collect(&self) -> Result<Collection> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        let mut collection = Collection::default();

        for path in &files {
            match self.parse_file(path) {
                Ok(Ok(page)) => collection.pages.push(page),
                Ok(Err(reason)) => {
                    debug!(path = %path.display(), ?reason, "excluding page");
                    collection.excluded += 1;
                }
                Err(CollectorError::Io { path, source }) => {
                    return Err(CollectorError::Io { path, source });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse file");
                    collection.failed.push((path.clone(), e.to_string()));
                }
            }
        }

        info!(
            pages = collection.pages.len(),
            excluded = collection.excluded,
            failed = collection.failed.len(),
            "content collection complete"
        );

        Ok(collection)
    }

    /// Find all content files recursively, sorted by file name at every level.
    pub fn find_content_files(&self) -> Result<Vec<PathBuf>> {
        if !self.content_dir.exists() {
            warn!(dir = %self.content_dir.display(), "content directory does not exist");
            return Ok(Vec::new());
        }

        let include_drafts = self.config.build.drafts;
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry, include_drafts));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ContentType::from_extension(&ext.to_string_lossy()).is_some())
            {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Parse a single content file.
    ///
    /// The inner `Err` carries the reason a valid page was excluded.
    fn parse_file(&self, path: &Path) -> Result<std::result::Result<PageDescriptor, Exclusion>> {
        debug!(path = %path.display(), "parsing file");

        let content = fs::read_to_string(path).map_err(|source| CollectorError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let relative_path = path.strip_prefix(&self.content_dir).unwrap_or(path);
        let content_path = ContentPath::from_path(relative_path)
            .ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;

        let parsed = self
            .parser
            .parse(&content, path)
            .map_err(|e| CollectorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        parsed
            .frontmatter
            .validate(path)
            .map_err(|e| CollectorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if let Some(reason) = self.exclusion(&parsed.frontmatter) {
            return Ok(Err(reason));
        }

        Ok(Ok(PageDescriptor::from_parsed(
            parsed,
            &content_path,
            &self.config,
        )))
    }

    /// Decide whether frontmatter flags keep a page out of the store.
    fn exclusion(&self, fm: &Frontmatter) -> Option<Exclusion> {
        if !fm.search {
            Some(Exclusion::SearchDisabled)
        } else if !fm.published {
            Some(Exclusion::Unpublished)
        } else if fm.draft && !self.config.build.drafts {
            Some(Exclusion::Draft)
        } else if !self.config.build.future && fm.date.is_some_and(|date| date > Utc::now()) {
            Some(Exclusion::Future)
        } else {
            None
        }
    }
}

/// Hidden entries are always skipped; `_drafts` only when drafts are off.
fn is_skipped_dir(entry: &DirEntry, include_drafts: bool) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && name == "_drafts" && !include_drafts)
}
