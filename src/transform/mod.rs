//! Block transformation
//!
//! Maps one typed content block plus its Markdown body onto the backend's
//! record shape. Each `(type, subtype)` pair has its own field extraction;
//! unknown types fall back to rendered rich text.

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::backend::{BlockKind, BlockRecord, MAIN_ZONE};
use crate::parser::ContentBlock;

/// First Markdown heading line: one or more `#` followed by text.
fn heading_regex() -> Regex {
    Regex::new(r"(?m)^#+\s+(.+)$").unwrap()
}

/// Bullet list item: a `-` or `*` prefixed line.
fn bullet_regex() -> Regex {
    Regex::new(r"(?m)^[-*]\s+(.+)$").unwrap()
}

/// Table separator row: pipes, dashes and whitespace only.
fn table_separator_regex() -> Regex {
    Regex::new(r"^\|[\s\-|]+\|$").unwrap()
}

/// Quote attribution: text after an em-dash or hyphen inside a quote line.
fn attribution_regex() -> Regex {
    Regex::new(r"(?m)>\s*[—-]\s*(.+)$").unwrap()
}

/// Transform one content block into its target record.
///
/// Pure and infallible: unknown or missing sub-fields default to the empty
/// string. `index` is the block's zero-based position within its page.
pub fn transform(block: &ContentBlock, index: usize) -> BlockRecord {
    let content = block.content.as_str();
    let sorting = (index as i64 + 1) * 100;

    let (kind, header, body) = match (block.block_type.as_str(), block.subtype.as_deref()) {
        ("header", _) => (BlockKind::Heading, extract_heading(content), String::new()),
        ("text", Some("bullets")) => (
            BlockKind::BulletList,
            extract_heading(content),
            extract_bullet_items(content),
        ),
        ("text", Some("table")) => (
            BlockKind::Table,
            extract_heading(content),
            extract_table_rows(content),
        ),
        ("quote", _) => (
            BlockKind::RichText,
            extract_quote_attribution(content),
            quote_body(content),
        ),
        ("textmedia", _) => (
            BlockKind::TextMedia,
            extract_heading(content),
            render_html(&strip_first_heading(content)),
        ),
        _ => (
            BlockKind::RichText,
            extract_heading(content),
            render_html(&strip_first_heading(content)),
        ),
    };

    BlockRecord {
        zone: MAIN_ZONE,
        sorting,
        kind,
        header,
        body,
    }
}

/// Text of the first Markdown heading line, or empty.
fn extract_heading(content: &str) -> String {
    heading_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Remove only the first Markdown heading line.
fn strip_first_heading(content: &str) -> String {
    heading_regex().replace(content, "").trim().to_string()
}

/// Newline-joined texts of all `-`/`*` list items.
fn extract_bullet_items(content: &str) -> String {
    bullet_regex()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pipe-row lines minus the header/body separator row, each cell trimmed
/// and re-joined with `|`.
fn extract_table_rows(content: &str) -> String {
    let separator = table_separator_regex();
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|') && !separator.is_match(line))
        .map(|line| {
            line.trim_matches(|c| c == '|' || c == ' ')
                .split('|')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quoted text from a blockquote, attribution lines excluded, leading quote
/// glyphs and surrounding quotation marks stripped, space-joined.
fn extract_quote_text(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('>'))
        .map(|line| line.trim_start_matches(|c| c == '>' || c == ' '))
        .filter(|text| !text.starts_with('\u{2014}') && !text.starts_with('-'))
        .map(|text| {
            text.trim_matches(|c| c == '"' || c == '\u{201C}' || c == '\u{201D}' || c == ' ')
                .to_string()
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attribution text following an em-dash or hyphen inside a quote line.
fn extract_quote_attribution(content: &str) -> String {
    attribution_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Quoted text wrapped as an HTML block-quote, escaped. Empty quotes yield
/// an empty body.
fn quote_body(content: &str) -> String {
    let text = extract_quote_text(content);
    if text.is_empty() {
        return String::new();
    }
    format!("<blockquote>{}</blockquote>", html_escape::encode_text(&text))
}

/// Render Markdown to HTML. Empty input never invokes the renderer.
fn render_html(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out.trim().to_string()
}
