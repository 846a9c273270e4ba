//! Form field reconstruction.

use crate::graph::BlockGraph;
use crate::model::{Block, FormFields, ReconstructionWarning};
use log::debug;
use std::collections::HashSet;

/// Form fields found in a block graph.
#[derive(Debug, Clone, Default)]
pub struct FormExtraction {
    /// Key→value pairs, last write wins
    pub fields: FormFields,

    /// Anomalies found while pairing
    pub warnings: Vec<ReconstructionWarning>,
}

/// Pair form keys with their values.
///
/// A key carrying an explicit VALUE relationship is paired with those value
/// blocks. Keys without one fall back to document order: the next VALUE block
/// not claimed by an explicit relationship supplies the value of the most
/// recent unpaired key.
pub fn form_fields(graph: &BlockGraph) -> FormExtraction {
    let mut extraction = FormExtraction::default();

    let claimed: HashSet<&str> = graph
        .blocks()
        .iter()
        .filter(|b| b.is_key())
        .flat_map(|key| graph.value_blocks_of(key))
        .map(|value| value.id.as_str())
        .collect();

    let mut pending_key: Option<String> = None;

    for block in graph.blocks() {
        if block.is_key() {
            let key = text(graph, block, &mut extraction.warnings);
            let values: Vec<&Block> = graph.value_blocks_of(block).collect();

            if values.is_empty() {
                pending_key = Some(key);
                continue;
            }

            let value = values
                .into_iter()
                .map(|v| text(graph, v, &mut extraction.warnings))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            extraction.fields.insert(key, value);
            pending_key = None;
        } else if block.is_value() && !claimed.contains(block.id.as_str()) {
            match pending_key.take() {
                Some(key) => {
                    let value = text(graph, block, &mut extraction.warnings);
                    extraction.fields.insert(key, value);
                }
                None => debug!("Value block {} has no preceding key", block.id),
            }
        }
    }

    extraction
}

fn text(graph: &BlockGraph, block: &Block, warnings: &mut Vec<ReconstructionWarning>) -> String {
    let (text, cycle) = graph.text_lossy(block);
    if let Some(err) = cycle {
        warnings.push(err.into());
    }
    text
}
