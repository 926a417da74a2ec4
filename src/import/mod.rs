//! Import orchestration
//!
//! Drives the hierarchy plan and the block transformer against the backend
//! collaborator: creates pages ancestor-first, chains siblings, registers
//! slug → identifier assignments, and aggregates imported titles. Execution
//! is strictly sequential; sibling chaining needs each creation's assigned
//! identifier before the next record is created.

use std::collections::HashMap;

use crate::backend::{
    BackendError, ContentBackend, PageRecord, RecordId, DEFAULT_PAGE_TYPE,
};
use crate::hierarchy::{plan, HierarchyPolicy, ParentRef, Placement};
use crate::parser::ParsedPage;
use crate::transform::transform;

type Result<T> = std::result::Result<T, BackendError>;

/// Run-local slug → backend identifier map. First assignment wins.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    entries: HashMap<String, RecordId>,
}

impl SlugRegistry {
    pub fn register(&mut self, slug: &str, id: RecordId) {
        if slug.is_empty() {
            return;
        }
        self.entries.entry(slug.to_string()).or_insert(id);
    }

    pub fn resolve(&self, slug: &str) -> Option<RecordId> {
        self.entries.get(slug).copied()
    }
}

/// Build the backend page record for one parsed page.
pub fn page_record(page: &ParsedPage) -> PageRecord {
    let meta = &page.meta;
    PageRecord {
        title: meta.title.clone(),
        slug: format!("/{}", meta.slug.trim_start_matches('/')),
        hidden: false,
        page_type: DEFAULT_PAGE_TYPE,
        sorting: meta.nav_position * 100,
        seo_title: meta.seo.as_ref().and_then(|s| s.title.clone()),
        seo_description: meta.seo.as_ref().and_then(|s| s.description.clone()),
    }
}

/// One import run against a backend.
pub struct Importer<'a, B: ContentBackend> {
    backend: &'a mut B,
    policy: HierarchyPolicy,
    registry: SlugRegistry,
}

impl<'a, B: ContentBackend> Importer<'a, B> {
    pub fn new(backend: &'a mut B, policy: HierarchyPolicy) -> Self {
        Importer {
            backend,
            policy,
            registry: SlugRegistry::default(),
        }
    }

    /// Import all pages under the given root container.
    ///
    /// Returns the imported page titles in creation order. The first backend
    /// rejection aborts the run; already-created records are not rolled
    /// back. The backend session is released whether the run succeeds or
    /// fails.
    pub fn import_all(&mut self, pages: &[ParsedPage], root: RecordId) -> Result<Vec<String>> {
        self.backend.begin_session()?;
        let outcome = self.import_pages(pages, root);
        let released = self.backend.end_session();
        let titles = outcome?;
        released?;
        Ok(titles)
    }

    fn import_pages(&mut self, pages: &[ParsedPage], root: RecordId) -> Result<Vec<String>> {
        let mut imported = Vec::new();
        let mut anchor: Option<RecordId> = None;

        for group in plan(pages, self.policy) {
            let container = self.resolve_parent(&group.parent, root, anchor);

            let mut last_sibling: Option<RecordId> = None;
            for page in group.pages {
                let placement = match last_sibling {
                    Some(sibling) => Placement::After(sibling),
                    None => Placement::FirstChildOf(container),
                };

                let page_id = self.backend.create_page(page_record(page), placement)?;
                self.registry.register(&page.meta.slug, page_id);
                if anchor.is_none() && group.parent == ParentRef::RootContainer {
                    anchor = Some(page_id);
                }
                last_sibling = Some(page_id);

                self.create_blocks(page, page_id)?;
                imported.push(page.meta.title.clone());
            }
        }

        Ok(imported)
    }

    fn resolve_parent(
        &self,
        parent: &ParentRef,
        root: RecordId,
        anchor: Option<RecordId>,
    ) -> RecordId {
        match parent {
            ParentRef::RootContainer => root,
            ParentRef::AnchorPage => anchor.unwrap_or_else(|| {
                log::warn!("no root page to anchor sections under, using root container {root}");
                root
            }),
            ParentRef::Slug(slug) => self.registry.resolve(slug).unwrap_or_else(|| {
                log::warn!("parent slug \"{slug}\" not found, placing under root container {root}");
                root
            }),
        }
    }

    fn create_blocks(&mut self, page: &ParsedPage, page_id: RecordId) -> Result<()> {
        let mut last_block: Option<RecordId> = None;
        for (index, block) in page.blocks.iter().enumerate() {
            let placement = match last_block {
                Some(sibling) => Placement::After(sibling),
                None => Placement::FirstChildOf(page_id),
            };
            let id = self.backend.create_block(transform(block, index), placement)?;
            last_block = Some(id);
        }
        Ok(())
    }
}
