//! Table reconstruction.

use crate::graph::BlockGraph;
use crate::model::{BlockId, BlockKind, ReconstructionWarning, TableGrid};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Tables found in a block graph.
#[derive(Debug, Clone, Default)]
pub struct TableExtraction {
    /// One grid per TABLE block, in first-encountered order
    pub tables: Vec<TableGrid>,

    /// Ids of table blocks, their cells, and everything below the cells
    pub consumed: HashSet<BlockId>,

    /// Anomalies found while building the grids
    pub warnings: Vec<ReconstructionWarning>,
}

/// Rebuild every table as a row/column grid.
///
/// Rows and columns are the sorted distinct indices observed among a table's
/// cells; indices need not start at 1 or be contiguous, and any missing
/// intersection is an empty string.
pub fn tables(graph: &BlockGraph) -> TableExtraction {
    let mut extraction = TableExtraction::default();

    for table in graph
        .blocks()
        .iter()
        .filter(|b| matches!(b.kind, BlockKind::Table))
    {
        extraction.consumed.insert(table.id.clone());

        let mut cells: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();
        let mut columns = BTreeSet::new();

        for cell in graph.children_of(table) {
            let Some((row, column)) = cell.cell_position() else {
                continue;
            };

            let (text, cycle) = graph.text_lossy(cell);
            if let Some(err) = cycle {
                extraction.warnings.push(err.into());
            }

            extraction.consumed.insert(cell.id.clone());
            extraction.consumed.extend(graph.descendant_ids(cell));

            columns.insert(column);
            if cells.entry(row).or_default().insert(column, text).is_some() {
                extraction.warnings.push(ReconstructionWarning::DuplicateCell {
                    table: table.id.clone(),
                    row,
                    column,
                });
            }
        }

        let rows: Vec<Vec<String>> = cells
            .into_values()
            .map(|mut row| {
                columns
                    .iter()
                    .map(|column| row.remove(column).unwrap_or_default())
                    .collect()
            })
            .collect();

        debug!(
            "Table {}: {} rows x {} columns",
            table.id,
            rows.len(),
            columns.len()
        );
        extraction.tables.push(TableGrid::from_rows(rows));
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn words(cells: &[(&str, u32, u32, &str)]) -> Vec<Block> {
        let mut blocks = vec![Block::table("t1").with_children(cells.iter().map(|c| c.0))];
        for (id, row, column, text) in cells {
            let word_id = format!("{}-w", id);
            blocks.push(Block::cell(*id, *row, *column).with_children([word_id.as_str()]));
            blocks.push(Block::word(word_id.as_str(), *text));
        }
        blocks
    }

    #[test]
    fn test_missing_cell_is_empty() {
        let graph = BlockGraph::resolve(words(&[
            ("c11", 1, 1, "A"),
            ("c12", 1, 2, "B"),
            ("c21", 2, 1, "C"),
        ]));
        let extraction = tables(&graph);

        assert_eq!(extraction.tables.len(), 1);
        assert_eq!(
            extraction.tables[0].rows(),
            &[vec!["A".to_string(), "B".to_string()], vec!["C".to_string(), String::new()]]
        );
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_sparse_indices_are_compacted() {
        let graph = BlockGraph::resolve(words(&[
            ("a", 3, 7, "x"),
            ("b", 3, 2, "y"),
            ("c", 10, 7, "z"),
        ]));
        let grid = &tables(&graph).tables[0];

        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell(0, 0), Some("y"));
        assert_eq!(grid.cell(0, 1), Some("x"));
        assert_eq!(grid.cell(1, 0), Some(""));
        assert_eq!(grid.cell(1, 1), Some("z"));
    }

    #[test]
    fn test_consumed_ids_cover_cells_and_words() {
        let graph = BlockGraph::resolve(words(&[("c11", 1, 1, "A")]));
        let consumed = tables(&graph).consumed;
        for id in ["t1", "c11", "c11-w"] {
            assert!(consumed.contains(id), "missing {}", id);
        }
    }

    #[test]
    fn test_table_without_cells() {
        let graph = BlockGraph::resolve(vec![Block::table("t1").with_children(["gone"])]);
        let extraction = tables(&graph);
        assert_eq!(extraction.tables.len(), 1);
        assert!(extraction.tables[0].is_empty());
    }

    #[test]
    fn test_duplicate_cell_position_warns() {
        let graph = BlockGraph::resolve(words(&[("a", 1, 1, "first"), ("b", 1, 1, "second")]));
        let extraction = tables(&graph);
        assert_eq!(extraction.tables[0].cell(0, 0), Some("second"));
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn test_tables_in_document_order() {
        let graph = BlockGraph::resolve(vec![
            Block::table("t2").with_children(["x"]),
            Block::cell("x", 1, 1).with_children(["wx"]),
            Block::word("wx", "second-id-first"),
            Block::table("t1").with_children(["y"]),
            Block::cell("y", 1, 1).with_children(["wy"]),
            Block::word("wy", "later"),
        ]);
        let extraction = tables(&graph);
        assert_eq!(extraction.tables[0].cell(0, 0), Some("second-id-first"));
        assert_eq!(extraction.tables[1].cell(0, 0), Some("later"));
    }
}
