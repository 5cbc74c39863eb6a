//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for lunrgen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Search store settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// URL prefix the site is deployed under (e.g., "/sampling").
    ///
    /// Prepended to every record URL and to site-relative teasers.
    #[serde(default)]
    pub base_path: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding content pages.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Whether to include drafts.
    #[serde(default)]
    pub drafts: bool,

    /// Whether to include pages dated in the future.
    #[serde(default)]
    pub future: bool,
}

/// Search store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whether the store is generated at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Put the whole page text into `excerpt` instead of a truncated snippet.
    #[serde(default)]
    pub full_content: bool,

    /// Number of words kept in a truncated excerpt.
    #[serde(default = "default_excerpt_words")]
    pub excerpt_words: usize,

    /// Artifact path, relative to the output directory.
    #[serde(default = "default_search_output")]
    pub output: String,

    /// Name of the global JS variable the store is assigned to.
    #[serde(default = "default_variable")]
    pub variable: String,

    /// Teaser used for pages that do not declare one.
    #[serde(default)]
    pub default_teaser: Option<String>,
}

// Default value functions
fn default_output_dir() -> String {
    "_site".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_true() -> bool {
    true
}

fn default_excerpt_words() -> usize {
    50
}

fn default_search_output() -> String {
    "assets/js/lunr/lunr-store.js".to_string()
}

fn default_variable() -> String {
    "store".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            content_dir: default_content_dir(),
            drafts: false,
            future: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            full_content: false,
            excerpt_words: default_excerpt_words(),
            output: default_search_output(),
            variable: default_variable(),
            default_teaser: None,
        }
    }
}

impl Config {
    /// Create a configuration with defaults for everything except the title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                base_path: String::new(),
            },
            build: BuildConfig::default(),
            search: SearchConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, with `LUNRGEN__*` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("LUNRGEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        let base_path = &self.site.base_path;
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return Err(CoreError::config(format!(
                "site.base_path must start with '/': {base_path}"
            )));
        }
        if base_path.len() > 1 && base_path.ends_with('/') {
            tracing::warn!("site.base_path should not have a trailing slash");
        }

        if !self.search.full_content && self.search.excerpt_words == 0 {
            return Err(CoreError::config("search.excerpt_words must be at least 1"));
        }

        if self.search.output.is_empty() || Path::new(&self.search.output).is_absolute() {
            return Err(CoreError::config(
                "search.output must be a relative path inside the output directory",
            ));
        }

        if !is_js_identifier(&self.search.variable) {
            return Err(CoreError::config(format!(
                "search.variable is not a valid JavaScript identifier: {}",
                self.search.variable
            )));
        }

        Ok(())
    }

    /// Get the site-relative URL for a path, including the base path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_path.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
