//! Backend collaborator contract
//!
//! The persistence backend is an external collaborator: it creates records,
//! returns the identifiers it assigned, and reports record-level failures.
//! Everything backend-specific (addressing, authentication) stays behind
//! this module's trait.

mod memory;

pub use memory::{CreatedBlock, CreatedPage, MemoryBackend};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hierarchy::Placement;

/// Backend-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed page-type tag assigned to every imported page.
pub const DEFAULT_PAGE_TYPE: u32 = 1;

/// Fixed content zone every block is placed into.
pub const MAIN_ZONE: u32 = 0;

/// One page record as the backend expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    /// Normalized to a single leading slash.
    pub slug: String,
    pub hidden: bool,
    pub page_type: u32,
    /// `nav_position * 100`.
    pub sorting: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
}

/// Target shape a content block is transformed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Heading,
    BulletList,
    Table,
    TextMedia,
    RichText,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::BulletList => "bullet-list",
            BlockKind::Table => "table",
            BlockKind::TextMedia => "text-media",
            BlockKind::RichText => "rich-text",
        }
    }
}

/// One content block record as the backend expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub zone: u32,
    /// 1-based block position * 100.
    pub sorting: i64,
    pub kind: BlockKind,
    pub header: String,
    pub body: String,
}

/// A record creation the backend rejected. Carries the record's title (or
/// header) for locating the offending input, plus the backend's own detail.
#[derive(Debug, Error)]
#[error("backend rejected \"{title}\": {detail}")]
pub struct BackendError {
    pub title: String,
    pub detail: String,
}

impl BackendError {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        BackendError {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// The persistence collaborator.
///
/// `begin_session` / `end_session` bracket one import run: acquire whatever
/// backend capability is needed once per run, release it after the run
/// completes or fails. Creation is strictly sequential; the identifier
/// returned by one call may be referenced by the next call's `Placement`.
pub trait ContentBackend {
    fn begin_session(&mut self) -> Result<(), BackendError>;

    fn end_session(&mut self) -> Result<(), BackendError>;

    fn create_page(
        &mut self,
        record: PageRecord,
        placement: Placement,
    ) -> Result<RecordId, BackendError>;

    fn create_block(
        &mut self,
        record: BlockRecord,
        placement: Placement,
    ) -> Result<RecordId, BackendError>;
}
