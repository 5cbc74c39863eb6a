//! Build orchestration.
//!
//! Coordinates collection, store building, and writing the store artifact.

use std::{fs, io, path::PathBuf, time::Instant};

use lunrgen_core::Config;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    collector::{CollectorError, ContentCollector},
    store::{StoreBuilder, StoreError, StoreFormat},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] lunrgen_core::CoreError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of records written to the store.
    pub records: usize,

    /// Number of content files that did not become records.
    pub skipped: usize,

    /// Size of the written artifact in bytes.
    pub bytes: usize,

    /// Path of the written artifact, if any.
    pub output: Option<PathBuf>,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that produces the search store.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    format: StoreFormat,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            format: StoreFormat::default(),
        }
    }

    /// Set the artifact format.
    #[must_use]
    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    /// Path the store artifact is written to.
    ///
    /// The configured file name keeps its stem; the extension follows the format.
    pub fn store_path(&self) -> PathBuf {
        let path = self.output_dir.join(&self.config.search.output);
        if path.extension().is_some_and(|ext| ext == self.format.extension()) {
            path
        } else {
            path.with_extension(self.format.extension())
        }
    }

    /// Execute the build.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        self.config.validate()?;

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            format = %self.format,
            "starting build"
        );

        if !self.config.search.enabled {
            info!("search disabled, no store generated");
            self.remove_stale_store()?;
            stats.duration_ms = elapsed_ms(start);
            return Ok(stats);
        }

        let collector = ContentCollector::new(self.config.clone(), &self.content_dir);
        let collection = collector.collect()?;
        stats.skipped = collection.skipped();

        let store = StoreBuilder::from_config(&self.config.search).build(&collection.pages);
        store.validate()?;

        let path = self.store_path();
        stats.bytes = store.write_to_file(&path, self.format, &self.config.search.variable)?;
        stats.records = store.len();
        stats.output = Some(path);
        stats.duration_ms = elapsed_ms(start);

        info!(
            records = stats.records,
            skipped = stats.skipped,
            bytes = stats.bytes,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Remove a store left behind by an earlier build.
    fn remove_stale_store(&self) -> Result<()> {
        let path = self.store_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                warn!(path = %path.display(), "removed stale search store");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e).into()),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
