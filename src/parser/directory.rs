//! Directory loader: enumerate, parse and order Markdown documents.

use std::fs;
use std::path::{Path, PathBuf};

use super::{parse_document, ParseError, ParsedPage};

/// Parse a single Markdown file.
pub fn parse_file(path: &Path) -> Result<ParsedPage, ParseError> {
    let raw = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&raw).map_err(|source| ParseError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse all Markdown files directly inside `dir` (non-recursive).
///
/// Files are visited in lexicographic filename order, then the parsed pages
/// are re-sorted by `nav_position` ascending. The sort is stable, so pages
/// with equal or missing `nav_position` keep their filename order. A single
/// malformed file aborts the whole load. An empty directory is not an
/// error.
pub fn parse_directory(dir: &Path) -> Result<Vec<ParsedPage>, ParseError> {
    let entries = fs::read_dir(dir).map_err(|source| ParseError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ParseError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && has_markdown_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut pages = Vec::with_capacity(files.len());
    for file in &files {
        pages.push(parse_file(file)?);
    }

    pages.sort_by_key(|p| p.meta.nav_position);

    Ok(pages)
}

fn has_markdown_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref(),
        Some("md") | Some("markdown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_page(dir: &Path, name: &str, title: &str, nav_position: Option<i64>) {
        let nav = nav_position
            .map(|n| format!("nav_position: {}\n", n))
            .unwrap_or_default();
        let content = format!("---\ntitle: {}\nslug: {}\n{}---\n\nBody.\n", title, title, nav);
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn empty_directory_returns_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let pages = parse_directory(dir.path()).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn ignores_non_markdown_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not markdown").unwrap();
        write_page(dir.path(), "page.md", "Page", Some(1));

        let pages = parse_directory(dir.path()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].meta.title, "Page");
    }

    #[test]
    fn accepts_both_markdown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "a.md", "A", Some(1));
        write_page(dir.path(), "b.markdown", "B", Some(2));

        let pages = parse_directory(dir.path()).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn sorts_by_nav_position() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "a.md", "Third", Some(30));
        write_page(dir.path(), "b.md", "First", Some(1));
        write_page(dir.path(), "c.md", "Second", Some(2));

        let pages = parse_directory(dir.path()).unwrap();
        let titles: Vec<&str> = pages.iter().map(|p| p.meta.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn missing_nav_position_sorts_last_in_filename_order() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "z-first.md", "Positioned", Some(5));
        write_page(dir.path(), "b.md", "NoPosB", None);
        write_page(dir.path(), "a.md", "NoPosA", None);

        let pages = parse_directory(dir.path()).unwrap();
        let titles: Vec<&str> = pages.iter().map(|p| p.meta.title.as_str()).collect();
        // Default 999 sorts after explicit positions; ties keep filename order.
        assert_eq!(titles, vec!["Positioned", "NoPosA", "NoPosB"]);
    }

    #[test]
    fn one_malformed_file_aborts_the_load() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "good.md", "Good", Some(1));
        fs::write(dir.path().join("bad.md"), "# No frontmatter here\n").unwrap();

        let err = parse_directory(dir.path()).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
        assert!(err.path().ends_with("bad.md"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = parse_directory(Path::new("/nonexistent/content")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
