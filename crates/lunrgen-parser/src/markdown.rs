//! Markdown parser using pulldown-cmark.

use std::path::Path;

use lunrgen_core::{content::ParsedContent, frontmatter::parse_frontmatter};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use thiserror::Error;

use crate::text::{collapse_whitespace, decode_entities, strip_tags};

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] lunrgen_core::error::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Markdown parser that reduces a document to its searchable text.
#[derive(Debug)]
pub struct MarkdownParser {
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Parse markdown content with frontmatter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let text = self.extract_text(&body);

        Ok(ParsedContent { frontmatter, text })
    }

    /// Extract the plain text of a markdown body (no frontmatter).
    ///
    /// Block boundaries become single spaces; image alt text is dropped.
    /// HTML blocks are stripped as a whole, so `<script>`, `<style>` and
    /// comment bodies spanning several lines never reach the text.
    pub fn extract_text(&self, body: &str) -> String {
        let parser = Parser::new_ext(body, self.options);
        let mut text = String::with_capacity(body.len());
        let mut image_depth = 0usize;
        let mut html_block: Option<String> = None;

        for event in parser {
            match event {
                Event::Start(Tag::HtmlBlock) => html_block = Some(String::new()),
                Event::End(TagEnd::HtmlBlock) => {
                    if let Some(raw) = html_block.take() {
                        text.push_str(&decode_entities(&strip_tags(&raw)));
                    }
                    text.push(' ');
                }
                Event::Html(raw) if html_block.is_some() => {
                    if let Some(block) = html_block.as_mut() {
                        block.push_str(&raw);
                    }
                }

                Event::Start(Tag::Image { .. }) => image_depth += 1,
                Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),

                Event::Text(_) | Event::Code(_) if image_depth > 0 => {}

                Event::Text(t) | Event::Code(t) | Event::InlineMath(t) | Event::DisplayMath(t) => {
                    text.push_str(&t);
                }

                Event::Html(raw) | Event::InlineHtml(raw) => {
                    text.push_str(&decode_entities(&strip_tags(&raw)));
                }

                Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),

                Event::End(end) if is_block_end(&end) => text.push(' '),

                _ => {}
            }
        }

        collapse_whitespace(&text)
    }
}

fn is_block_end(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::FootnoteDefinition
            | TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_markdown() {
        let parser = MarkdownParser::new();
        let content = r#"---
title: "Statistical Matching using Optimal Transport"
permalink: /matching/
---

## Introduction

In this vignette, we will explain how some functions of the package are used
to estimate a contingency table."#;

        let result = parser.parse(content, Path::new("matching.md")).unwrap();

        assert_eq!(
            result.frontmatter.title,
            "Statistical Matching using Optimal Transport"
        );
        assert_eq!(
            result.text,
            "Introduction In this vignette, we will explain how some functions of the package \
             are used to estimate a contingency table."
        );
    }

    #[test]
    fn test_inline_markup_is_flattened() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text(
            "Use **balseq** with `sampling` and [arXiv.2112.01164](https://arxiv.org/abs/2112.01164).",
        );

        assert_eq!(
            text,
            "Use balseq with sampling and arXiv.2112.01164."
        );
    }

    #[test]
    fn test_code_block_text_is_kept() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text(
            r#"Load data

```r
library(sampling)
data(belgianmunicipalities)
```"#,
        );

        assert_eq!(
            text,
            "Load data library(sampling) data(belgianmunicipalities)"
        );
    }

    #[test]
    fn test_image_alt_text_dropped() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text("Before ![a map of Belgium](map.png) after");
        assert_eq!(text, "Before after");
    }

    #[test]
    fn test_list_and_table_cells_separated() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text(
            r#"- one
- two

| a | b |
|---|---|
| c | d |"#,
        );

        assert_eq!(text, "one two a b c d");
    }

    #[test]
    fn test_raw_html_is_stripped() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text("<div class=\"notice\">Chauvet &amp; Deville</div>\n\nNext");
        assert_eq!(text, "Chauvet & Deville Next");
    }

    #[test]
    fn test_script_block_dropped() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text(
            r#"Intro

<script type="text/x-mathjax-config">
MathJax.Hub.Config({tex2jax: {inlineMath: [['$','$']]}});
</script>

After"#,
        );
        assert_eq!(text, "Intro After");
    }

    #[test]
    fn test_style_block_dropped() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text("Intro\n\n<style>\np { color: red; }\n</style>\n\nAfter");
        assert_eq!(text, "Intro After");
    }

    #[test]
    fn test_multiline_comment_dropped() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text("Intro\n\n<!--\nsecret draft note\n-->\n\nAfter");
        assert_eq!(text, "Intro After");
    }

    #[test]
    fn test_html_block_entities_decoded_once() {
        let parser = MarkdownParser::new();
        let text = parser.extract_text("<p>\nTill&#233; &amp;\nDeville\n</p>\n\nNext");
        assert_eq!(text, "Tillé & Deville Next");
    }

    #[test]
    fn test_empty_body() {
        let parser = MarkdownParser::new();
        assert_eq!(parser.extract_text(""), "");
        assert_eq!(parser.extract_text("\n\n   \n"), "");
    }

    #[test]
    fn test_no_frontmatter() {
        let parser = MarkdownParser::new();
        let content = "# Just Content\n\nNo frontmatter here.";
        let result = parser.parse(content, Path::new("test.md")).unwrap();

        assert!(result.frontmatter.title.is_empty());
        assert_eq!(result.text, "Just Content No frontmatter here.");
    }
}
