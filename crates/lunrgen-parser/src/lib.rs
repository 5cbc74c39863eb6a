//! lunrgen Parser Library
//!
//! Reduces Markdown and HTML content pages to frontmatter plus plain text.

pub mod html;
pub mod markdown;
pub mod text;

use std::path::Path;

pub use html::HtmlParser;
use lunrgen_core::content::{ContentType, ParsedContent};
pub use markdown::MarkdownParser;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Markdown parsing error.
    #[error("markdown error: {0}")]
    Markdown(#[from] markdown::MarkdownError),

    /// HTML parsing error.
    #[error("html error: {0}")]
    Html(#[from] html::HtmlError),

    /// Unknown file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Trait for content parsers.
pub trait ContentParser {
    /// Parse content from a string and file path.
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent>;
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        Ok(self.parse(content, path)?)
    }
}

impl ContentParser for HtmlParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        Ok(self.parse(content, path)?)
    }
}

/// Registry for content parsers with auto-detection.
#[derive(Debug, Default)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
    html: HtmlParser,
}

impl ParserRegistry {
    /// Create a new parser registry with default parsers.
    pub fn new() -> Self {
        Self {
            markdown: MarkdownParser::new(),
            html: HtmlParser::new(),
        }
    }

    /// Parse content, auto-detecting the parser from file extension.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParserError::UnknownExtension("(none)".to_string()))?;

        let content_type = ContentType::from_extension(ext)
            .ok_or_else(|| ParserError::UnknownExtension(ext.to_string()))?;

        self.parser_for(content_type).parse(content, path)
    }

    /// Parser responsible for a content type.
    pub fn parser_for(&self, content_type: ContentType) -> &dyn ContentParser {
        match content_type {
            ContentType::Markdown => &self.markdown,
            ContentType::Html => &self.html,
        }
    }
}
