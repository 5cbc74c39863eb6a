//! HTML page parser.

use std::path::Path;

use lunrgen_core::{content::ParsedContent, frontmatter::parse_frontmatter};
use thiserror::Error;

use crate::text::{collapse_whitespace, decode_entities, strip_tags};

/// HTML parsing errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] lunrgen_core::error::CoreError),
}

/// Result type for HTML operations.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Parser for HTML pages with frontmatter.
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML page with frontmatter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let text = self.extract_text(&body);

        Ok(ParsedContent { frontmatter, text })
    }

    /// Extract the plain text of an HTML body.
    pub fn extract_text(&self, body: &str) -> String {
        collapse_whitespace(&decode_entities(&strip_tags(body)))
    }
}
