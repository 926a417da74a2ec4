//! Markdown document parsing
//!
//! Turns raw Markdown files with YAML frontmatter and inline block markers
//! into structured pages, and loads whole directories of them in a
//! deterministic order.

mod directory;
mod document;

pub use directory::{parse_directory, parse_file};
pub use document::{parse_document, ContentBlock, PageMeta, ParsedPage, Seo};

use std::path::PathBuf;

use thiserror::Error;

/// Errors from parsing a single document body.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("missing frontmatter block")]
    MissingFrontmatter,

    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}

/// Errors from loading documents off the filesystem.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

impl ParseError {
    /// Path of the file that failed to load or parse.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ParseError::Io { path, .. } => path,
            ParseError::Malformed { path, .. } => path,
        }
    }
}
