//! Single-document parser: YAML frontmatter envelope plus block markers.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::DocumentError;

/// SEO fields nested under the `seo` frontmatter key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Page metadata parsed from the frontmatter block.
///
/// Recognized keys get typed fields; everything else is kept in `extra` so
/// a parsed page can be serialized back without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    /// Slash-prefixed reference to the parent page's slug. Empty means a
    /// root page, `/` a top-level section.
    #[serde(default)]
    pub parent: String,
    /// Sibling ordering weight; pages without one sort last.
    #[serde(default = "default_nav_position")]
    pub nav_position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

pub(crate) fn default_nav_position() -> i64 {
    999
}

impl Default for PageMeta {
    fn default() -> Self {
        PageMeta {
            title: String::new(),
            slug: String::new(),
            parent: String::new(),
            nav_position: default_nav_position(),
            seo: None,
            extra: BTreeMap::new(),
        }
    }
}

/// One marker-delimited segment of a document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    pub content: String,
}

impl ContentBlock {
    /// Look up a free-form marker attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The `image` marker attribute, if declared.
    pub fn image(&self) -> Option<&str> {
        self.attribute("image")
    }

    /// The `position` marker attribute, if declared.
    pub fn position(&self) -> Option<&str> {
        self.attribute("position")
    }
}

/// One parsed source document: metadata plus ordered content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPage {
    pub meta: PageMeta,
    pub blocks: Vec<ContentBlock>,
}

impl ParsedPage {
    /// Serialize back into the frontmatter + marker document format.
    ///
    /// Re-parsing the output yields an equal `ParsedPage`; formatting of the
    /// original input is not preserved.
    pub fn to_markdown(&self) -> Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(&self.meta)?;
        let mut out = format!("---\n{}---\n", yaml);

        for block in &self.blocks {
            let mut marker = block.block_type.clone();
            if let Some(subtype) = &block.subtype {
                marker.push_str(&format!(", subtype: {}", subtype));
            }
            for (key, value) in &block.attributes {
                marker.push_str(&format!(", {}: {}", key, value));
            }
            out.push_str(&format!("\n<!-- block: {} -->\n\n{}\n", marker, block.content));
        }

        Ok(out)
    }
}

/// Frontmatter envelope: `---`, YAML payload, `---`, remaining body.
/// The trailing newline after the closing marker is optional so that a
/// document with an empty body still parses.
fn envelope_regex() -> Regex {
    Regex::new(r"(?s)\A---\r?\n(.+?)\r?\n---(?:\r?\n(.*))?\z").unwrap()
}

/// Inline block marker: `<!-- block: TYPE[, key: value]* -->`.
fn marker_regex() -> Regex {
    Regex::new(r"<!--\s*block:\s*(.+?)\s*-->").unwrap()
}

/// Parse one document's raw text into a `ParsedPage`.
///
/// The frontmatter envelope is mandatory; a document without it is a hard
/// failure with no partial recovery.
pub fn parse_document(raw: &str) -> Result<ParsedPage, DocumentError> {
    let captures = envelope_regex()
        .captures(raw)
        .ok_or(DocumentError::MissingFrontmatter)?;

    let payload = captures.get(1).map(|m| m.as_str()).unwrap_or("");
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or("");

    let meta: PageMeta = serde_yaml::from_str(payload)?;
    let blocks = parse_blocks(body.trim());

    Ok(ParsedPage { meta, blocks })
}

/// Split a document body on block markers.
///
/// Text before the first marker is discarded; a marker with no content
/// before the next marker (or end of body) produces no block.
fn parse_blocks(body: &str) -> Vec<ContentBlock> {
    let re = marker_regex();
    let markers: Vec<(usize, usize, &str)> = re
        .captures_iter(body)
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            (whole.start(), whole.end(), caps.get(1).unwrap().as_str())
        })
        .collect();

    let mut blocks = Vec::new();
    for (i, (_, content_start, label)) in markers.iter().enumerate() {
        let content_end = markers.get(i + 1).map(|m| m.0).unwrap_or(body.len());
        let content = body[*content_start..content_end].trim();
        if content.is_empty() {
            continue;
        }

        let (block_type, subtype, attributes) = parse_marker(label);
        blocks.push(ContentBlock {
            block_type,
            subtype,
            attributes,
            content: content.to_string(),
        });
    }

    blocks
}

/// Parse a marker label like `textmedia, image: placeholder://team.jpg,
/// position: right` into type, subtype and free-form attributes.
fn parse_marker(label: &str) -> (String, Option<String>, BTreeMap<String, String>) {
    let mut parts = label.split(',');
    let block_type = parts.next().unwrap_or("").trim().to_string();

    let mut subtype = None;
    let mut attributes = BTreeMap::new();
    for part in parts {
        if let Some((key, value)) = part.split_once(':') {
            let key = key.trim();
            let value = value.trim().to_string();
            if key == "subtype" {
                subtype = Some(value);
            } else {
                attributes.insert(key.to_string(), value);
            }
        }
    }

    (block_type, subtype, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"---
title: "Über uns"
slug: ueber-uns
parent: /
nav_position: 2
seo:
  title: "Über uns - La Bella Vista"
---

Intro text before the first marker is dropped.

<!-- block: header -->

# Willkommen bei La Bella Vista

<!-- block: textmedia, image: placeholder://team.jpg, position: right -->

## Unsere Geschichte

Seit 2005 servieren wir Küche.

<!-- block: text, subtype: bullets -->

## Werte

- Qualität
- Frische

<!-- block: quote -->

> "Das beste Restaurant der Stadt!"
> — Maria S.
"#;

    #[test]
    fn parses_frontmatter_fields() {
        let page = parse_document(SAMPLE).unwrap();
        assert_eq!(page.meta.title, "Über uns");
        assert_eq!(page.meta.slug, "ueber-uns");
        assert_eq!(page.meta.parent, "/");
        assert_eq!(page.meta.nav_position, 2);
        assert_eq!(
            page.meta.seo.as_ref().unwrap().title.as_deref(),
            Some("Über uns - La Bella Vista")
        );
    }

    #[test]
    fn parses_content_blocks_in_order() {
        let page = parse_document(SAMPLE).unwrap();
        assert_eq!(page.blocks.len(), 4);

        assert_eq!(page.blocks[0].block_type, "header");
        assert!(page.blocks[0].content.contains("Willkommen bei La Bella Vista"));

        assert_eq!(page.blocks[1].block_type, "textmedia");
        assert_eq!(page.blocks[1].image(), Some("placeholder://team.jpg"));
        assert_eq!(page.blocks[1].position(), Some("right"));
        assert!(page.blocks[1].content.contains("Unsere Geschichte"));

        assert_eq!(page.blocks[2].block_type, "text");
        assert_eq!(page.blocks[2].subtype.as_deref(), Some("bullets"));

        assert_eq!(page.blocks[3].block_type, "quote");
        assert!(page.blocks[3].content.contains("beste Restaurant"));
    }

    #[test]
    fn missing_frontmatter_is_a_hard_failure() {
        let err = parse_document("# Just a heading\n\nNo envelope.").unwrap_err();
        assert!(matches!(err, DocumentError::MissingFrontmatter));
    }

    #[test]
    fn invalid_yaml_is_a_hard_failure() {
        let raw = "---\ntitle: [unclosed\n---\n\nBody\n";
        let err = parse_document(raw).unwrap_err();
        assert!(matches!(err, DocumentError::Frontmatter(_)));
    }

    #[test]
    fn missing_nav_position_defaults_to_999() {
        let raw = "---\ntitle: Page\nslug: page\n---\n";
        let page = parse_document(raw).unwrap();
        assert_eq!(page.meta.nav_position, 999);
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn unknown_frontmatter_keys_are_preserved() {
        let raw = "---\ntitle: Page\nlayout: wide\n---\n";
        let page = parse_document(raw).unwrap();
        assert_eq!(
            page.meta.extra.get("layout"),
            Some(&serde_yaml::Value::String("wide".to_string()))
        );
    }

    #[test]
    fn trailing_marker_without_content_produces_no_block() {
        let raw = "---\ntitle: Page\n---\n\n<!-- block: header -->\n\n# Hi\n\n<!-- block: text -->\n";
        let page = parse_document(raw).unwrap();
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].block_type, "header");
    }

    #[test]
    fn back_to_back_markers_produce_no_empty_block() {
        let raw = "---\ntitle: Page\n---\n\n<!-- block: header -->\n<!-- block: text -->\n\nBody.\n";
        let page = parse_document(raw).unwrap();
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].block_type, "text");
        assert_eq!(page.blocks[0].content, "Body.");
    }

    #[test]
    fn document_with_empty_body_parses() {
        let page = parse_document("---\ntitle: Page\n---").unwrap();
        assert_eq!(page.meta.title, "Page");
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn round_trips_through_marker_format() {
        let page = parse_document(SAMPLE).unwrap();
        let serialized = page.to_markdown().unwrap();
        let reparsed = parse_document(&serialized).unwrap();
        assert_eq!(page, reparsed);
    }
}
