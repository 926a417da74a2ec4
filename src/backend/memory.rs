//! In-memory backend: the test double and the CLI's dry-run collaborator.

use serde::Serialize;

use crate::hierarchy::Placement;

use super::{BackendError, BlockRecord, ContentBackend, PageRecord, RecordId};

/// A page the backend created, with the placement it was created at.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPage {
    pub id: RecordId,
    pub placement: Placement,
    #[serde(flatten)]
    pub record: PageRecord,
}

/// A content block the backend created.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedBlock {
    pub id: RecordId,
    pub placement: Placement,
    #[serde(flatten)]
    pub record: BlockRecord,
}

/// Records every creation and hands out sequential identifiers starting
/// after the configured root container id.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    next_id: u64,
    session_open: bool,
    pub pages: Vec<CreatedPage>,
    pub blocks: Vec<CreatedBlock>,
    reject_title: Option<String>,
}

impl MemoryBackend {
    pub fn new(first_id: u64) -> Self {
        MemoryBackend {
            next_id: first_id,
            ..Default::default()
        }
    }

    /// Reject any page or block whose title/header matches, simulating a
    /// record-level backend failure.
    pub fn reject_title(mut self, title: &str) -> Self {
        self.reject_title = Some(title.to_string());
        self
    }

    pub fn find_page(&self, title: &str) -> Option<&CreatedPage> {
        self.pages.iter().find(|p| p.record.title == title)
    }

    /// Blocks created directly or transitively under the given page, in
    /// creation order.
    pub fn blocks_of(&self, page: RecordId) -> Vec<&CreatedBlock> {
        let mut result: Vec<&CreatedBlock> = Vec::new();
        for block in &self.blocks {
            let belongs = match block.placement {
                Placement::FirstChildOf(container) => container == page,
                Placement::After(sibling) => result.iter().any(|b| b.id == sibling),
            };
            if belongs {
                result.push(block);
            }
        }
        result
    }

    fn allocate(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    fn check(&self, title: &str) -> Result<(), BackendError> {
        if !self.session_open {
            return Err(BackendError::new(title, "no active backend session"));
        }
        if self.reject_title.as_deref() == Some(title) {
            return Err(BackendError::new(title, "record rejected by backend"));
        }
        Ok(())
    }
}

impl ContentBackend for MemoryBackend {
    fn begin_session(&mut self) -> Result<(), BackendError> {
        self.session_open = true;
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), BackendError> {
        self.session_open = false;
        Ok(())
    }

    fn create_page(
        &mut self,
        record: PageRecord,
        placement: Placement,
    ) -> Result<RecordId, BackendError> {
        self.check(&record.title)?;
        let id = self.allocate();
        self.pages.push(CreatedPage {
            id,
            placement,
            record,
        });
        Ok(id)
    }

    fn create_block(
        &mut self,
        record: BlockRecord,
        placement: Placement,
    ) -> Result<RecordId, BackendError> {
        self.check(&record.header)?;
        let id = self.allocate();
        self.blocks.push(CreatedBlock {
            id,
            placement,
            record,
        });
        Ok(id)
    }
}
