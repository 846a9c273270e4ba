//! Plain text reconstruction.

use crate::model::{Block, BlockId, BlockKind};
use std::collections::HashSet;

/// Concatenate the text of every line, one line per `\n`, in document order.
///
/// A line is skipped when its id is in `excluded` or when all of its words
/// are, which is how table content shows up as loose lines. Text is passed
/// through as the provider returned it.
pub fn plain_text(blocks: &[Block], excluded: &HashSet<BlockId>) -> String {
    let mut output = String::new();

    for block in blocks {
        let BlockKind::Line { text } = &block.kind else {
            continue;
        };
        if excluded.contains(&block.id) || is_covered(block, excluded) {
            continue;
        }
        output.push_str(text);
        output.push('\n');
    }

    output
}

fn is_covered(line: &Block, excluded: &HashSet<BlockId>) -> bool {
    !line.children.is_empty() && line.children.iter().all(|id| excluded.contains(id))
}
