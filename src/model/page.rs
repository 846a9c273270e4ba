//! Block page types.

use super::{Block, StatusResponse};
use serde::{Deserialize, Serialize};

/// The blocks delivered by one status or page response.
///
/// A multi-page document usually arrives as several `BlockPage`s; a single
/// `BlockPage` may also carry blocks from several document pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPage {
    /// Blocks in receipt order
    pub blocks: Vec<Block>,

    /// Total document page count reported by the provider, if any
    pub page_count: Option<u32>,
}

impl BlockPage {
    /// Create a page from blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            page_count: None,
        }
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the page carries no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<StatusResponse> for BlockPage {
    fn from(response: StatusResponse) -> Self {
        Self {
            blocks: response.blocks,
            page_count: response.page_count,
        }
    }
}

/// Concatenate pages in the order given.
pub fn concat_pages(pages: Vec<BlockPage>) -> Vec<Block> {
    let total = pages.iter().map(BlockPage::block_count).sum();
    let mut blocks = Vec::with_capacity(total);
    for page in pages {
        blocks.extend(page.blocks);
    }
    blocks
}
