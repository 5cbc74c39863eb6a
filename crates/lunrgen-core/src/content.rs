//! Content types and structures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{config::Config, frontmatter::Frontmatter};

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown content (.md files).
    Markdown,
    /// HTML content (.html files).
    Html,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Get the file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

/// Content path with slug extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Original file path, relative to the content directory.
    pub path: PathBuf,

    /// URL slug derived from the path, without surrounding slashes.
    pub slug: String,

    /// Content type based on extension.
    pub content_type: ContentType,
}

impl ContentPath {
    /// Parse a content path to extract the slug.
    ///
    /// - `wave.md` → slug: "wave"
    /// - `vignettes/wave.md` → slug: "vignettes/wave"
    /// - `vignettes/index.md` → slug: "vignettes"
    /// - `index.html` → slug: ""
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let content_type = ContentType::from_extension(extension)?;
        let stem = path.file_stem()?.to_str()?;

        let parent = path.parent().unwrap_or(Path::new(""));
        let parent = parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let slug = if stem == "index" {
            parent
        } else if parent.is_empty() {
            stem.to_string()
        } else {
            format!("{parent}/{stem}")
        };

        Some(Self {
            path: path.to_path_buf(),
            slug: slug.trim_matches('/').to_string(),
            content_type,
        })
    }

    /// Get the URL path for this content, without the site base path.
    ///
    /// URLs are directory-style: they start and end with `/`.
    pub fn url_path(&self) -> String {
        if self.slug.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", self.slug)
        }
    }
}

/// Parsed content with metadata and extracted text.
#[derive(Debug, Clone)]
pub struct ParsedContent {
    /// Parsed frontmatter metadata.
    pub frontmatter: Frontmatter,

    /// Plain text of the body, whitespace-collapsed.
    pub text: String,
}

/// Everything the store builder needs to know about one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Page title.
    pub title: String,

    /// Site-relative output URL, including the base path.
    pub url: String,

    /// Plain text the excerpt is derived from.
    #[serde(default)]
    pub text: Option<String>,

    /// Categories for this page.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Tags for this page.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Resolved teaser image reference.
    #[serde(default)]
    pub teaser: Option<String>,

    /// Source file path.
    #[serde(default, skip_serializing)]
    pub source_path: Option<PathBuf>,
}

impl PageDescriptor {
    /// Create a descriptor with only a title and URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            text: None,
            categories: Vec::new(),
            tags: Vec::new(),
            teaser: None,
            source_path: None,
        }
    }

    /// Create a descriptor from parsed content and its path.
    pub fn from_parsed(content: ParsedContent, content_path: &ContentPath, config: &Config) -> Self {
        let fm = content.frontmatter;

        let url = match fm.permalink.as_deref().map(str::trim) {
            Some(permalink) if !permalink.is_empty() => config.url_for(permalink),
            _ => config.url_for(&content_path.url_path()),
        };

        let text = fm
            .explicit_excerpt()
            .map(str::to_string)
            .or(Some(content.text))
            .filter(|t| !t.trim().is_empty());

        let teaser = fm
            .header
            .teaser
            .clone()
            .or_else(|| config.search.default_teaser.clone())
            .filter(|t| !t.trim().is_empty())
            .map(|t| resolve_teaser(&t, config));

        Self {
            title: fm.title,
            url,
            text,
            categories: fm.categories,
            tags: fm.tags,
            teaser,
            source_path: Some(content_path.path.clone()),
        }
    }
}

/// Absolute URLs pass through; site-relative paths get the base path.
fn resolve_teaser(teaser: &str, config: &Config) -> String {
    if teaser.contains("://") {
        teaser.to_string()
    } else {
        config.url_for(teaser)
    }
}
