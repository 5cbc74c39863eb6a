//! Frontmatter parsing for content files.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for content files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title (required).
    pub title: String,

    /// Explicit excerpt, used instead of the page body.
    #[serde(default)]
    pub excerpt: Option<String>,

    /// Page description, used as excerpt when no `excerpt` is set.
    #[serde(default)]
    pub description: Option<String>,

    /// Categories for the page.
    #[serde(default, deserialize_with = "string_or_list")]
    pub categories: Vec<String>,

    /// Tags for the page.
    #[serde(default, deserialize_with = "string_or_list")]
    pub tags: Vec<String>,

    /// Output URL overriding the one derived from the file path.
    #[serde(default)]
    pub permalink: Option<String>,

    /// Page header settings.
    #[serde(default)]
    pub header: Header,

    /// Whether the page is listed in the search store.
    #[serde(default = "default_true")]
    pub search: bool,

    /// Whether the page is published at all.
    #[serde(default = "default_true")]
    pub published: bool,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Publication date.
    #[serde(default, deserialize_with = "flexible_date")]
    pub date: Option<DateTime<Utc>>,

    /// Custom extra fields (for extensibility).
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Header block of the frontmatter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    /// Thumbnail image shown next to search results.
    #[serde(default)]
    pub teaser: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: String::new(),
            excerpt: None,
            description: None,
            categories: Vec::new(),
            tags: Vec::new(),
            permalink: None,
            header: Header::default(),
            search: true,
            published: true,
            draft: false,
            date: None,
            extra: HashMap::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

/// Accept `tags: [a, b]`, `tags: "a b"` or `tags: ~`.
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrList::One(s)) => s.split_whitespace().map(str::to_string).collect(),
        Some(StringOrList::Many(list)) => list,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Toml(toml::value::Datetime),
}

/// Accept RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD` dates.
fn flexible_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<RawDate>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawDate::Text(s)) => s,
        Some(RawDate::Toml(dt)) => dt.to_string(),
    };

    parse_date(&text)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {text}")))
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// The opening delimiter must be the first line of the file and the closing
/// delimiter must sit on a line of its own.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_line = content.lines().next()?.trim_end();

    let format = match first_line {
        "---" => FrontmatterFormat::Yaml,
        "+++" => FrontmatterFormat::Toml,
        _ => return None,
    };
    let delimiter = format.delimiter();

    let after_first = content[first_line.len()..].trim_start_matches(['\r', '\n']);

    let mut offset = 0;
    for line in after_first.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = after_first[..offset].trim();
            let body = after_first[offset + line.len()..].trim_start();
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from a string.
///
/// Content without frontmatter yields a default (untitled) frontmatter and the full text as body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    Ok((frontmatter, body.to_string()))
}

impl Frontmatter {
    /// Validate required fields.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::frontmatter(path, "title is required"));
        }
        Ok(())
    }

    /// Explicit excerpt text, if the author supplied one.
    pub fn explicit_excerpt(&self) -> Option<&str> {
        let non_blank = |s: &&str| !s.trim().is_empty();
        self.excerpt
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.description.as_deref().filter(non_blank))
    }
}
