//! Import Markdown content files as CMS pages and content blocks.
//!
//! Source documents carry YAML frontmatter (title, slug, parent reference,
//! nav position, SEO fields) and inline `<!-- block: ... -->` markers that
//! split the body into typed content blocks. An import run parses a
//! directory of such documents, resolves the page hierarchy from the parent
//! references alone, transforms each block into the backend's record shape,
//! and creates everything through the [`backend::ContentBackend`]
//! collaborator in a single sequential pass.

pub mod backend;
pub mod hierarchy;
pub mod import;
pub mod parser;
pub mod transform;
