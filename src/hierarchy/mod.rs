//! Hierarchy resolution
//!
//! Pages declare their place in the tree only through the `parent`
//! frontmatter field. This module classifies pages by that field, groups
//! them into sibling groups, and orders the groups so that every ancestor
//! is created before its descendants.

use serde::Serialize;

use crate::backend::RecordId;
use crate::parser::ParsedPage;

/// Where a new record is inserted.
///
/// Sibling chaining: the first record of a group becomes the first child of
/// its container, every following record is inserted directly after the
/// previously created sibling. Backends that address this differently (for
/// example with negative identifiers) translate behind the
/// `ContentBackend` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
    FirstChildOf(RecordId),
    After(RecordId),
}

/// Which root/section convention an import run applies.
///
/// The two conventions produce different trees for the same input, so the
/// choice is an explicit, named policy rather than a side effect of field
/// comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HierarchyPolicy {
    /// Three-tier: pages with an empty `parent` are root pages under the
    /// configured root container; pages with `parent == "/"` become
    /// children of the first root page; everything else resolves by slug.
    #[default]
    RootAnchored,
    /// Two-tier: empty and `/` parents are both top-level under the root
    /// container; everything else resolves by slug.
    FlatTopLevel,
}

/// Depth class derived from the `parent` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageClass {
    /// `parent` empty or absent.
    Root,
    /// `parent == "/"`.
    Section,
    /// Any other parent path; carries the ancestor slug with the leading
    /// slash stripped.
    SubPage(String),
}

/// Classify a page by its declared parent reference.
pub fn classify(parent: &str) -> PageClass {
    match parent {
        "" => PageClass::Root,
        "/" => PageClass::Section,
        other => PageClass::SubPage(other.trim_start_matches('/').to_string()),
    }
}

/// The container a sibling group resolves against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    /// The root container the run was started with.
    RootContainer,
    /// The first page created under the root container (three-tier policy).
    AnchorPage,
    /// A previously imported page, looked up by slug in the registry.
    Slug(String),
}

/// One group of pages sharing a resolved parent, in creation order.
#[derive(Debug)]
pub struct SiblingGroup<'a> {
    pub parent: ParentRef,
    pub pages: Vec<&'a ParsedPage>,
}

/// Partition pages into ordered sibling groups.
///
/// Group order guarantees ancestors are processed before descendants:
/// root-class pages first, section-class pages second, then sub-page groups
/// keyed by parent slug in first-appearance order. Within each group the
/// input order (already sorted by `nav_position`) is preserved.
pub fn plan(pages: &[ParsedPage], policy: HierarchyPolicy) -> Vec<SiblingGroup<'_>> {
    let mut roots: Vec<&ParsedPage> = Vec::new();
    let mut sections: Vec<&ParsedPage> = Vec::new();
    let mut sub_groups: Vec<(String, Vec<&ParsedPage>)> = Vec::new();

    for page in pages {
        match classify(&page.meta.parent) {
            PageClass::Root => roots.push(page),
            PageClass::Section => sections.push(page),
            PageClass::SubPage(slug) => {
                match sub_groups.iter_mut().find(|(s, _)| *s == slug) {
                    Some((_, group)) => group.push(page),
                    None => sub_groups.push((slug, vec![page])),
                }
            }
        }
    }

    let mut groups: Vec<SiblingGroup<'_>> = Vec::new();

    match policy {
        HierarchyPolicy::RootAnchored => {
            if !roots.is_empty() {
                groups.push(SiblingGroup {
                    parent: ParentRef::RootContainer,
                    pages: roots,
                });
            }
            if !sections.is_empty() {
                groups.push(SiblingGroup {
                    parent: ParentRef::AnchorPage,
                    pages: sections,
                });
            }
        }
        HierarchyPolicy::FlatTopLevel => {
            // Root and section pages form one top-level group, in the
            // page list's order.
            let mut top_level: Vec<&ParsedPage> = Vec::new();
            for page in pages {
                if matches!(
                    classify(&page.meta.parent),
                    PageClass::Root | PageClass::Section
                ) {
                    top_level.push(page);
                }
            }
            if !top_level.is_empty() {
                groups.push(SiblingGroup {
                    parent: ParentRef::RootContainer,
                    pages: top_level,
                });
            }
        }
    }

    for (slug, group) in sub_groups {
        groups.push(SiblingGroup {
            parent: ParentRef::Slug(slug),
            pages: group,
        });
    }

    groups
}
