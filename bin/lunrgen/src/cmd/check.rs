//! Check command - validate configuration and content

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, bail};
use lunrgen_core::{Config, PageDescriptor};
use lunrgen_generator::ContentCollector;

use super::resolve_dir;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and all content files.
pub fn run(config_path: &Path, content: Option<&Path>, strict: bool) -> Result<ValidationResult> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        let content_dir = content
            .map(Path::to_path_buf)
            .unwrap_or_else(|| resolve_dir(config_path, &cfg.build.content_dir));

        if content_dir.is_dir() {
            println!("\nChecking content files...");
            validate_content(cfg, &content_dir, &mut result)?;
        } else {
            result.add_warning(format!(
                "Content directory does not exist: {}",
                content_dir.display()
            ));
        }

        if !cfg.search.enabled {
            result.add_warning("search.enabled is false, no store will be generated");
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(result)
}

/// Collect every page and check the store invariants.
fn validate_content(config: &Config, content_dir: &Path, result: &mut ValidationResult) -> Result<()> {
    let collector = ContentCollector::new(config.clone(), content_dir);
    let collection = collector.collect()?;

    for (path, reason) in &collection.failed {
        result.add_error(format!("{}: {reason}", path.display()));
    }

    for (url, sources) in duplicate_urls(&collection.pages) {
        let sources: Vec<_> = sources.iter().map(|p| p.display().to_string()).collect();
        result.add_error(format!("Duplicate url {url}: {}", sources.join(", ")));
    }

    for page in collection.pages.iter().filter(|p| p.text.is_none()) {
        result.add_warning(format!("{} has no text, excerpt will be null", page.url));
    }

    let checked = collection.pages.len() + collection.skipped();
    if collection.failed.is_empty() {
        println!("  ✓ All {checked} content files valid");
    } else {
        println!(
            "  ✗ {}/{checked} content files have errors",
            collection.failed.len()
        );
    }
    println!(
        "  ℹ {} searchable page(s), {} excluded by frontmatter",
        collection.pages.len(),
        collection.excluded
    );

    Ok(())
}

/// URLs claimed by more than one page, with the files claiming them.
fn duplicate_urls(pages: &[PageDescriptor]) -> BTreeMap<&str, Vec<PathBuf>> {
    let mut by_url: BTreeMap<&str, Vec<PathBuf>> = BTreeMap::new();

    for page in pages {
        by_url
            .entry(page.url.as_str())
            .or_default()
            .push(page.source_path.clone().unwrap_or_default());
    }

    by_url.retain(|_, sources| sources.len() > 1);
    by_url
}
