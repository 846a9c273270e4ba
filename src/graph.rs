//! Block graph resolution.
//!
//! [`BlockGraph`] owns every block of one job result in document order and
//! indexes them by id. Reconstructors never look ids up themselves; they go
//! through the typed accessors here.

use crate::error::GraphError;
use crate::model::{concat_pages, Block, BlockId, BlockKind, BlockPage, ReconstructionWarning, SelectionStatus};
use log::{trace, warn};
use std::collections::{HashMap, HashSet};

/// Text emitted for a selected selection element.
pub const SELECTED_MARK: &str = "X";

/// Arena of blocks indexed by id.
#[derive(Debug, Clone, Default)]
pub struct BlockGraph {
    blocks: Vec<Block>,
    index: HashMap<BlockId, usize>,
    duplicates: Vec<BlockId>,
}

impl BlockGraph {
    /// Build the graph from blocks in document order.
    ///
    /// When an id repeats, the later block replaces the earlier one and keeps
    /// its own position.
    pub fn resolve(blocks: Vec<Block>) -> Self {
        let mut index = HashMap::with_capacity(blocks.len());
        let mut duplicates = Vec::new();

        for (pos, block) in blocks.iter().enumerate() {
            if index.insert(block.id.clone(), pos).is_some() {
                warn!("Duplicate block id {}; using the later block", block.id);
                duplicates.push(block.id.clone());
            }
        }

        if duplicates.is_empty() {
            return Self {
                blocks,
                index,
                duplicates,
            };
        }

        let blocks: Vec<Block> = blocks
            .into_iter()
            .enumerate()
            .filter(|(pos, block)| index.get(&block.id) == Some(pos))
            .map(|(_, block)| block)
            .collect();
        let index = blocks
            .iter()
            .enumerate()
            .map(|(pos, block)| (block.id.clone(), pos))
            .collect();

        Self {
            blocks,
            index,
            duplicates,
        }
    }

    /// Build the graph from result pages, concatenated in receipt order.
    pub fn from_pages(pages: Vec<BlockPage>) -> Self {
        Self::resolve(concat_pages(pages))
    }

    /// All blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the graph has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look a block up by id.
    pub fn get(&self, id: &str) -> Option<&Block> {
        self.index.get(id).map(|&pos| &self.blocks[pos])
    }

    /// Resolved children of a block, in order. Dangling ids are skipped.
    pub fn children_of<'a>(&'a self, block: &'a Block) -> impl Iterator<Item = &'a Block> + 'a {
        self.resolve_ids(&block.id, &block.children)
    }

    /// Resolved explicit VALUE targets of a key block.
    pub fn value_blocks_of<'a>(&'a self, block: &'a Block) -> impl Iterator<Item = &'a Block> + 'a {
        let ids: &'a [BlockId] = match &block.kind {
            BlockKind::KeyValueSet { value_ids, .. } => value_ids,
            _ => &[],
        };
        self.resolve_ids(&block.id, ids)
    }

    fn resolve_ids<'a>(
        &'a self,
        parent: &'a BlockId,
        ids: &'a [BlockId],
    ) -> impl Iterator<Item = &'a Block> + 'a {
        ids.iter().filter_map(move |id| {
            let child = self.get(id.as_str());
            if child.is_none() {
                trace!("Skipping dangling reference {} -> {}", parent, id);
            }
            child
        })
    }

    /// Text of a block.
    ///
    /// Words and lines yield their own text, selection elements yield
    /// [`SELECTED_MARK`] when selected, and every other block yields the
    /// space-joined text of its children. Fails if the block reaches itself.
    pub fn text_of(&self, block: &Block) -> Result<String, GraphError> {
        match self.text_lossy(block) {
            (_, Some(err)) => Err(err),
            (text, None) => Ok(text),
        }
    }

    /// Best-effort variant of [`text_of`](Self::text_of).
    ///
    /// A cycle is cut at the first revisited block; the reachable text is
    /// still returned together with the cycle error.
    pub fn text_lossy(&self, block: &Block) -> (String, Option<GraphError>) {
        let mut visited = HashSet::new();
        let mut cycle = None;
        let text = self.collect_text(block, &mut visited, &mut cycle);
        (text, cycle)
    }

    fn collect_text<'a>(
        &'a self,
        block: &'a Block,
        visited: &mut HashSet<&'a str>,
        cycle: &mut Option<GraphError>,
    ) -> String {
        if !visited.insert(block.id.as_str()) {
            if cycle.is_none() {
                *cycle = Some(GraphError::Cycle(block.id.clone()));
            }
            return String::new();
        }

        let text = match &block.kind {
            BlockKind::Word { text } => text.clone(),
            BlockKind::Line { text } if !text.is_empty() || block.children.is_empty() => {
                text.clone()
            }
            BlockKind::SelectionElement { status } => match status {
                SelectionStatus::Selected => SELECTED_MARK.to_string(),
                SelectionStatus::NotSelected => String::new(),
            },
            _ => {
                let parts: Vec<String> = self
                    .children_of(block)
                    .map(|child| self.collect_text(child, visited, cycle))
                    .filter(|text| !text.is_empty())
                    .collect();
                parts.join(" ").trim().to_string()
            }
        };

        // Only the current path counts; shared descendants are not cycles.
        visited.remove(block.id.as_str());
        text
    }

    /// Ids of every block reachable from `block` through CHILD relationships,
    /// excluding `block` itself.
    pub fn descendant_ids(&self, block: &Block) -> HashSet<BlockId> {
        let mut seen: HashSet<BlockId> = HashSet::new();
        let mut stack: Vec<&Block> = self.children_of(block).collect();

        while let Some(current) = stack.pop() {
            if current.id == block.id || !seen.insert(current.id.clone()) {
                continue;
            }
            stack.extend(self.children_of(current));
        }

        seen
    }

    /// Relationships (CHILD and VALUE) that point at missing blocks.
    pub fn dangling_references(&self) -> Vec<GraphError> {
        let mut dangling = Vec::new();
        for block in &self.blocks {
            let value_ids: &[BlockId] = match &block.kind {
                BlockKind::KeyValueSet { value_ids, .. } => value_ids,
                _ => &[],
            };
            for id in block.children.iter().chain(value_ids) {
                if !self.index.contains_key(id) {
                    dangling.push(GraphError::Dangling {
                        parent: block.id.clone(),
                        child: id.clone(),
                    });
                }
            }
        }
        dangling
    }

    /// Structural warnings found while indexing.
    pub fn warnings(&self) -> Vec<ReconstructionWarning> {
        self.duplicates
            .iter()
            .map(|id| ReconstructionWarning::DuplicateBlockId { id: id.clone() })
            .chain(self.dangling_references().into_iter().map(Into::into))
            .collect()
    }
}
