//! Command implementations.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use lunrgen_core::Config;

pub mod build;
pub mod check;

/// Load the configuration, with `LUNRGEN__*` environment overrides applied.
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path).wrap_err("Failed to load configuration")
}

/// Resolve a configured directory relative to the configuration file.
pub fn resolve_dir(config_path: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        return dir.to_path_buf();
    }

    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(dir),
        _ => dir.to_path_buf(),
    }
}
