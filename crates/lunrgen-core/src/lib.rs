//! lunrgen Core Library
//!
//! Core types, configuration, and error handling for the lunrgen search store generator.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{ContentPath, ContentType, PageDescriptor, ParsedContent};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
