//! Build command - generates the search store

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use lunrgen_generator::{BuildStats, Builder, StoreFormat};

use super::{load_config, resolve_dir};

/// Command-line overrides for a build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Output directory, instead of `build.output_dir`.
    pub output: Option<PathBuf>,
    /// Content directory, instead of `build.content_dir`.
    pub content: Option<PathBuf>,
    /// Include drafts.
    pub drafts: bool,
    /// Site base path, instead of `site.base_path`.
    pub base_path: Option<String>,
    /// Artifact format.
    pub format: StoreFormat,
}

/// Run the build command.
///
/// Collects content pages and writes the search store to the output directory.
pub fn run(config_path: &Path, options: &BuildOptions) -> Result<BuildStats> {
    let start = Instant::now();
    tracing::info!(?config_path, ?options, "Starting build");

    let mut config = load_config(config_path)?;

    if options.drafts {
        config.build.drafts = true;
    }

    // Override base_path if specified via CLI
    if let Some(bp) = options.base_path.as_deref() {
        tracing::info!(base_path = bp, "Overriding site base_path from CLI");
        config.site.base_path = bp.to_string();
    }

    let content_dir = options
        .content
        .clone()
        .unwrap_or_else(|| resolve_dir(config_path, &config.build.content_dir));
    let output_dir = options
        .output
        .clone()
        .unwrap_or_else(|| resolve_dir(config_path, &config.build.output_dir));

    tracing::debug!(?config, "Loaded configuration");

    let builder = Builder::new(config, content_dir, output_dir).with_format(options.format);
    let stats = builder.build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Records:    {}", stats.records);
    println!("  Skipped:    {}", stats.skipped);
    println!("  Size:       {} bytes", stats.bytes);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    match &stats.output {
        Some(path) => println!("  Output:     {}", path.display()),
        None => println!("  Output:     (search disabled)"),
    }
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(stats)
}
