//! Search store generation.
//!
//! Maps page descriptors 1:1 onto search records and serializes them as the
//! script the client-side search widget loads before it initializes.

use std::{collections::HashSet, fmt, fs, path::Path, str::FromStr};

use lunrgen_core::{PageDescriptor, config::SearchConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum recommended size for a store loaded in one request (500KB).
pub const MAX_RECOMMENDED_STORE_SIZE: usize = 500 * 1024;

/// Marker appended to truncated excerpts.
const ELLIPSIS: &str = "...";

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Two records resolve to the same URL.
    #[error("duplicate url {url}: {first} and {second}")]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// One search entry.
///
/// Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Page title.
    pub title: String,

    /// Plain-text snippet of the page.
    pub excerpt: Option<String>,

    /// Page categories.
    pub categories: Vec<String>,

    /// Page tags.
    pub tags: Vec<String>,

    /// Site-relative page URL.
    pub url: String,

    /// Thumbnail image reference.
    pub teaser: Option<String>,
}

/// Ordered sequence of records produced by one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    records: Vec<Record>,
}

/// Serialized form of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreFormat {
    /// `var <name> = [...]`, loaded with a `<script>` tag.
    #[default]
    Js,
    /// Bare JSON array, fetched by the client.
    Json,
}

impl StoreFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for StoreFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "js" | "javascript" => Ok(Self::Js),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown store format '{other}' (expected js or json)")),
        }
    }
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check that every record URL is unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.records.len());

        for record in &self.records {
            if !seen.insert(record.url.as_str()) {
                let first = self
                    .records
                    .iter()
                    .find(|r| r.url == record.url)
                    .map(|r| r.title.clone())
                    .unwrap_or_default();

                return Err(StoreError::DuplicateUrl {
                    url: record.url.clone(),
                    first,
                    second: record.title.clone(),
                });
            }
        }

        Ok(())
    }

    /// Serialize the records to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the records to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize records from a JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the store artifact.
    ///
    /// `variable` is only used by [`StoreFormat::Js`].
    pub fn render(&self, format: StoreFormat, variable: &str) -> Result<String> {
        let json = self.to_json_pretty()?;

        Ok(match format {
            StoreFormat::Js => format!("var {variable} = {json}\n"),
            StoreFormat::Json => format!("{json}\n"),
        })
    }

    /// Render the store and write it to `path`, replacing any previous file.
    ///
    /// Returns the number of bytes written.
    pub fn write_to_file(&self, path: &Path, format: StoreFormat, variable: &str) -> Result<usize> {
        let rendered = self.render(format, variable)?;

        if rendered.len() > MAX_RECOMMENDED_STORE_SIZE {
            warn!(
                size = rendered.len(),
                max = MAX_RECOMMENDED_STORE_SIZE,
                "search store exceeds recommended size"
            );
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &rendered)?;

        debug!(path = %path.display(), bytes = rendered.len(), "wrote search store");
        Ok(rendered.len())
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// How excerpts are derived from page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcerptMode {
    /// Keep the first `words` words, marking cuts with `...`.
    Truncated { words: usize },
    /// Keep the whole text.
    Full,
}

impl Default for ExcerptMode {
    fn default() -> Self {
        Self::Truncated { words: 50 }
    }
}

/// Maps page descriptors onto store records.
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    excerpt: ExcerptMode,
}

impl StoreBuilder {
    /// Create a builder with the given excerpt mode.
    #[must_use]
    pub fn new(excerpt: ExcerptMode) -> Self {
        Self { excerpt }
    }

    /// Create a builder from search settings.
    #[must_use]
    pub fn from_config(search: &SearchConfig) -> Self {
        let excerpt = if search.full_content {
            ExcerptMode::Full
        } else {
            ExcerptMode::Truncated {
                words: search.excerpt_words,
            }
        };
        Self::new(excerpt)
    }

    /// Build a store with one record per page, in input order.
    pub fn build(&self, pages: &[PageDescriptor]) -> Store {
        Store {
            records: pages.iter().map(|page| self.record(page)).collect(),
        }
    }

    /// Map a single page onto its record.
    pub fn record(&self, page: &PageDescriptor) -> Record {
        Record {
            title: page.title.clone(),
            excerpt: page.text.as_deref().and_then(|text| self.excerpt(text)),
            categories: page.categories.clone(),
            tags: page.tags.clone(),
            url: page.url.clone(),
            teaser: page.teaser.clone(),
        }
    }

    fn excerpt(&self, text: &str) -> Option<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }

        Some(match self.excerpt {
            ExcerptMode::Truncated { words: limit } if words.len() > limit => {
                format!("{}{ELLIPSIS}", words[..limit].join(" "))
            }
            _ => words.join(" "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, url: &str, text: Option<&str>) -> PageDescriptor {
        PageDescriptor {
            text: text.map(str::to_string),
            ..PageDescriptor::new(title, url)
        }
    }

    fn vignettes() -> Vec<PageDescriptor> {
        vec![
            page(
                "Statistical Matching using Optimal Transport",
                "/matching/",
                Some("Introduction In this vignette, we will explain how some functions work."),
            ),
            page("Wave Sampling", "/wave/", Some("Introduction Geographical data.")),
            page("Sequential balanced sampling", "/balseq/", None),
            PageDescriptor {
                tags: vec!["systematic".to_string()],
                categories: vec!["design".to_string()],
                teaser: Some("/assets/images/deville.png".to_string()),
                ..page("Deville systematic", "/deville/", Some("Introduction"))
            },
        ]
    }

    #[test]
    fn test_single_page_record() {
        let store = StoreBuilder::default().build(&[PageDescriptor::new("Wave Sampling", "/wave/")]);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.records()[0],
            Record {
                title: "Wave Sampling".to_string(),
                excerpt: None,
                categories: vec![],
                tags: vec![],
                url: "/wave/".to_string(),
                teaser: None,
            }
        );
    }

    #[test]
    fn test_build_preserves_length_and_order() {
        let pages = vignettes();
        let store = StoreBuilder::default().build(&pages);

        assert_eq!(store.len(), pages.len());
        let urls: Vec<_> = store.into_iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["/matching/", "/wave/", "/balseq/", "/deville/"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let pages = vignettes();
        let builder = StoreBuilder::default();

        let first = builder.build(&pages);
        let second = builder.build(&pages);

        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_build_empty_input() {
        let store = StoreBuilder::default().build(&[]);
        assert!(store.is_empty());
        assert_eq!(store.to_json().unwrap(), "[]");
    }

    #[test]
    fn test_record_copies_taxonomies_and_teaser() {
        let store = StoreBuilder::default().build(&vignettes());
        let deville = &store.records()[3];

        assert_eq!(deville.tags, vec!["systematic"]);
        assert_eq!(deville.categories, vec!["design"]);
        assert_eq!(deville.teaser.as_deref(), Some("/assets/images/deville.png"));
    }

    #[test]
    fn test_excerpt_truncated_at_word_limit() {
        let builder = StoreBuilder::new(ExcerptMode::Truncated { words: 5 });
        let record = builder.record(&page(
            "Wave",
            "/wave/",
            Some("Geographical data are generally auto-correlated. This is why"),
        ));

        assert_eq!(
            record.excerpt.as_deref(),
            Some("Geographical data are generally auto-correlated....")
        );
    }

    #[test]
    fn test_excerpt_at_limit_is_not_marked() {
        let builder = StoreBuilder::new(ExcerptMode::Truncated { words: 3 });
        let record = builder.record(&page("T", "/t/", Some("one  two\nthree")));
        assert_eq!(record.excerpt.as_deref(), Some("one two three"));
    }

    #[test]
    fn test_excerpt_full_content() {
        let text = "word ".repeat(120);
        let builder = StoreBuilder::new(ExcerptMode::Full);
        let record = builder.record(&page("T", "/t/", Some(&text)));

        let excerpt = record.excerpt.expect("excerpt");
        assert_eq!(excerpt.split(' ').count(), 120);
        assert!(!excerpt.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_excerpt_blank_text_is_null() {
        let record = StoreBuilder::default().record(&page("T", "/t/", Some(" \n\t ")));
        assert!(record.excerpt.is_none());
    }

    #[test]
    fn test_from_config() {
        let mut search = SearchConfig::default();
        search.excerpt_words = 7;
        assert_eq!(
            StoreBuilder::from_config(&search).excerpt,
            ExcerptMode::Truncated { words: 7 }
        );

        search.full_content = true;
        assert_eq!(StoreBuilder::from_config(&search).excerpt, ExcerptMode::Full);
    }

    #[test]
    fn test_validate_rejects_duplicate_urls() {
        let store = StoreBuilder::default().build(&[
            page("Wave Sampling", "/wave/", None),
            page("Deville", "/deville/", None),
            page("Wave (copy)", "/wave/", None),
        ]);

        let err = store.validate().unwrap_err();
        match err {
            StoreError::DuplicateUrl { url, first, second } => {
                assert_eq!(url, "/wave/");
                assert_eq!(first, "Wave Sampling");
                assert_eq!(second, "Wave (copy)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_accepts_unique_urls() {
        let store = StoreBuilder::default().build(&vignettes());
        assert!(store.validate().is_ok());
    }

    #[test]
    fn test_json_field_order_and_nulls() {
        let store = StoreBuilder::default().build(&[PageDescriptor::new("Wave Sampling", "/wave/")]);
        let json = store.to_json().unwrap();

        assert_eq!(
            json,
            r#"[{"title":"Wave Sampling","excerpt":null,"categories":[],"tags":[],"url":"/wave/","teaser":null}]"#
        );
    }

    #[test]
    fn test_json_round_trip() {
        let store = StoreBuilder::default().build(&vignettes());
        let parsed = Store::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn test_render_js() {
        let store = StoreBuilder::default().build(&[PageDescriptor::new("Wave Sampling", "/wave/")]);
        let js = store.render(StoreFormat::Js, "store").unwrap();

        assert!(js.starts_with("var store = [\n"));
        assert!(js.ends_with("]\n"));

        let json = js.trim_start_matches("var store = ");
        let parsed = Store::from_json(json).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn test_render_json() {
        let store = StoreBuilder::default().build(&[]);
        assert_eq!(store.render(StoreFormat::Json, "ignored").unwrap(), "[]\n");
    }

    #[test]
    fn test_write_to_file_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets/js/lunr/lunr-store.js");

        let big = StoreBuilder::default().build(&vignettes());
        big.write_to_file(&path, StoreFormat::Js, "store").unwrap();

        let small = StoreBuilder::default().build(&[]);
        let bytes = small.write_to_file(&path, StoreFormat::Js, "store").unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "var store = []\n");
        assert_eq!(bytes, written.len());
    }

    #[test]
    fn test_store_format_parsing() {
        assert_eq!("js".parse::<StoreFormat>(), Ok(StoreFormat::Js));
        assert_eq!("JSON".parse::<StoreFormat>(), Ok(StoreFormat::Json));
        assert!("xml".parse::<StoreFormat>().is_err());
        assert_eq!(StoreFormat::Json.to_string(), "json");
    }
}
