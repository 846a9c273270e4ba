//! Reconstruction of text, tables, and form fields from a block graph.
//!
//! One [`BlockGraph`] is built per job result and shared by all three
//! reconstructors. Graph anomalies never abort reconstruction; they are
//! logged and returned as [`ReconstructionWarning`]s.

mod form;
mod table;
mod text;

pub use form::{form_fields, FormExtraction};
pub use table::{tables, TableExtraction};
pub use text::plain_text;

use crate::graph::BlockGraph;
use crate::model::{Block, BlockPage, DocumentResult, ReconstructionWarning};
use log::{debug, warn};

/// Reconstruct a document from result pages in receipt order.
pub fn reconstruct(pages: Vec<BlockPage>) -> DocumentResult {
    reconstruct_graph(&BlockGraph::from_pages(pages))
}

/// Reconstruct a document from blocks in document order.
pub fn reconstruct_blocks(blocks: Vec<Block>) -> DocumentResult {
    reconstruct_graph(&BlockGraph::resolve(blocks))
}

/// Reconstruct a document from an already resolved graph.
pub fn reconstruct_graph(graph: &BlockGraph) -> DocumentResult {
    let mut warnings: Vec<ReconstructionWarning> = graph.warnings();

    let table_extraction = tables(graph);
    warnings.extend(table_extraction.warnings);

    let form_extraction = form_fields(graph);
    warnings.extend(form_extraction.warnings);

    let text = plain_text(graph.blocks(), &table_extraction.consumed);

    for warning in &warnings {
        warn!("Reconstruction: {}", warning);
    }
    debug!(
        "Reconstructed {} blocks: {} tables, {} form fields, {} warnings",
        graph.len(),
        table_extraction.tables.len(),
        form_extraction.fields.len(),
        warnings.len()
    );

    DocumentResult::new(text, table_extraction.tables, form_extraction.fields)
        .with_warnings(warnings)
}
