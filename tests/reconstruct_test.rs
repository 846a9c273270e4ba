//! Integration tests for reconstruction from provider responses.

use std::collections::HashSet;

use untextract::model::{Block, BlockPage, ReconstructionWarning, SelectionStatus};
use untextract::{parse_response, reconstruct, reconstruct_blocks, reconstruct_json, BlockGraph};

const INVOICE: &str = r#"{
    "JobStatus": "SUCCEEDED",
    "DocumentMetadata": { "Pages": 1 },
    "Blocks": [
        { "BlockType": "PAGE", "Id": "p1", "Page": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["l1", "l2", "l3", "l4", "l5"] }] },
        { "BlockType": "LINE", "Id": "l1", "Text": "ACME Invoice", "Page": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w1", "w2"] }] },
        { "BlockType": "WORD", "Id": "w1", "Text": "ACME", "Page": 1 },
        { "BlockType": "WORD", "Id": "w2", "Text": "Invoice", "Page": 1 },
        { "BlockType": "LINE", "Id": "l2", "Text": "Item Qty", "Page": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w3", "w4"] }] },
        { "BlockType": "LINE", "Id": "l3", "Text": "Bolts 12", "Page": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w5", "w6"] }] },
        { "BlockType": "WORD", "Id": "w3", "Text": "Item", "Page": 1 },
        { "BlockType": "WORD", "Id": "w4", "Text": "Qty", "Page": 1 },
        { "BlockType": "WORD", "Id": "w5", "Text": "Bolts", "Page": 1 },
        { "BlockType": "WORD", "Id": "w6", "Text": "12", "Page": 1 },
        { "BlockType": "TABLE", "Id": "t1", "Page": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["c11", "c12", "c21", "c22"] }] },
        { "BlockType": "CELL", "Id": "c11", "RowIndex": 1, "ColumnIndex": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w3"] }] },
        { "BlockType": "CELL", "Id": "c12", "RowIndex": 1, "ColumnIndex": 2,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w4"] }] },
        { "BlockType": "CELL", "Id": "c21", "RowIndex": 2, "ColumnIndex": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w5"] }] },
        { "BlockType": "CELL", "Id": "c22", "RowIndex": 2, "ColumnIndex": 2,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w6"] }] },
        { "BlockType": "LINE", "Id": "l4", "Text": "Paid: [x]", "Page": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["w7", "s1"] }] },
        { "BlockType": "WORD", "Id": "w7", "Text": "Paid:", "Page": 1 },
        { "BlockType": "SELECTION_ELEMENT", "Id": "s1", "SelectionStatus": "SELECTED", "Page": 1 },
        { "BlockType": "KEY_VALUE_SET", "Id": "k1", "EntityTypes": ["KEY"], "Page": 1,
          "Relationships": [
              { "Type": "VALUE", "Ids": ["v1"] },
              { "Type": "CHILD", "Ids": ["w7"] }
          ] },
        { "BlockType": "KEY_VALUE_SET", "Id": "v1", "EntityTypes": ["VALUE"], "Page": 1,
          "Relationships": [{ "Type": "CHILD", "Ids": ["s1"] }] },
        { "BlockType": "LINE", "Id": "l5", "Text": "Thank you", "Page": 1 }
    ]
}"#;

#[test]
fn test_invoice_text_tables_forms() {
    let doc = reconstruct_json(INVOICE).unwrap();

    assert_eq!(doc.text(), "ACME Invoice\nPaid: [x]\nThank you\n");

    assert_eq!(doc.tables().len(), 1);
    assert_eq!(
        doc.tables()[0].rows(),
        [
            vec!["Item".to_string(), "Qty".to_string()],
            vec!["Bolts".to_string(), "12".to_string()],
        ]
    );

    assert_eq!(doc.form_fields().len(), 1);
    assert_eq!(doc.form_fields().get("Paid:"), Some("X"));
    assert!(doc.warnings().is_empty());
}

#[test]
fn test_text_never_contains_table_lines() {
    let response = parse_response(INVOICE).unwrap();
    let graph = BlockGraph::resolve(response.blocks);
    let doc = reconstruct_blocks(graph.blocks().to_vec());

    let cell_text: HashSet<String> = doc.tables()[0].rows().iter().flatten().cloned().collect();
    for line in doc.text().lines() {
        for word in line.split_whitespace() {
            assert!(!cell_text.contains(word), "table word {} leaked into text", word);
        }
    }
}

#[test]
fn test_pages_concatenate_in_receipt_order() {
    let first = BlockPage::new(vec![
        Block::line("l1", "Page one"),
        Block::key("k1").with_children(["kw1"]),
        Block::word("kw1", "Name"),
    ]);
    let second = BlockPage::new(vec![
        Block::value("v1").with_children(["vw1"]).on_page(2),
        Block::word("vw1", "Alice").on_page(2),
        Block::line("l2", "Page two").on_page(2),
    ]);
    let total = first.block_count() + second.block_count();

    let graph = BlockGraph::from_pages(vec![first.clone(), second.clone()]);
    assert_eq!(graph.len(), total);

    let doc = reconstruct(vec![first, second]);
    assert_eq!(doc.text(), "Page one\nPage two\n");
    // key on one page, value on the next
    assert_eq!(doc.form_fields().get("Name"), Some("Alice"));
}

#[test]
fn test_table_grid_with_gap() {
    let doc = reconstruct_blocks(vec![
        Block::table("t1").with_children(["a", "b", "c"]),
        Block::cell("a", 1, 1).with_children(["wa"]),
        Block::cell("b", 1, 2).with_children(["wb"]),
        Block::cell("c", 2, 1).with_children(["wc"]),
        Block::word("wa", "A"),
        Block::word("wb", "B"),
        Block::word("wc", "C"),
    ]);

    let rows = doc.tables()[0].rows();
    assert_eq!(
        rows,
        [
            vec!["A".to_string(), "B".to_string()],
            vec!["C".to_string(), String::new()],
        ]
    );
}

#[test]
fn test_scan_order_form_pairing() {
    let doc = reconstruct_blocks(vec![
        Block::key("k1").with_children(["w1"]),
        Block::word("w1", "Name"),
        Block::value("v1").with_children(["w2"]),
        Block::word("w2", "Alice"),
        Block::key("k2").with_children(["w3"]),
        Block::word("w3", "Age"),
        Block::value("v2").with_children(["w4"]),
        Block::word("w4", "30"),
    ]);

    let fields: Vec<(&str, &str)> = doc.form_fields().iter().collect();
    assert_eq!(fields, [("Name", "Alice"), ("Age", "30")]);
}

#[test]
fn test_explicit_value_wins_over_scan_order() {
    let doc = reconstruct_blocks(vec![
        Block::key("k1").with_children(["w1"]).with_values(["v2"]),
        Block::word("w1", "Name"),
        Block::value("v1").with_children(["w2"]),
        Block::word("w2", "stray"),
        Block::value("v2").with_children(["w3"]),
        Block::word("w3", "Alice"),
    ]);

    assert_eq!(doc.form_fields().len(), 1);
    assert_eq!(doc.form_fields().get("Name"), Some("Alice"));
}

#[test]
fn test_unchecked_box_is_empty_value() {
    let doc = reconstruct_blocks(vec![
        Block::key("k1").with_children(["w1"]).with_values(["v1"]),
        Block::word("w1", "Subscribe"),
        Block::value("v1").with_children(["s1"]),
        Block::selection("s1", SelectionStatus::NotSelected),
    ]);
    assert_eq!(doc.form_fields().get("Subscribe"), Some(""));
}

#[test]
fn test_dangling_reference_is_warning() {
    let doc = reconstruct_blocks(vec![
        Block::line("l1", "Hello").with_children(["w1", "gone"]),
        Block::word("w1", "Hello"),
    ]);

    assert_eq!(doc.text(), "Hello\n");
    assert_eq!(
        doc.warnings(),
        [ReconstructionWarning::DanglingReference {
            parent: "l1".into(),
            child: "gone".into(),
        }]
    );
}

#[test]
fn test_cycle_in_cell_is_warning() {
    let doc = reconstruct_blocks(vec![
        Block::table("t1").with_children(["c1"]),
        Block::cell("c1", 1, 1).with_children(["w1", "c1"]),
        Block::word("w1", "loop"),
    ]);

    assert_eq!(doc.tables()[0].cell(0, 0), Some("loop"));
    assert!(doc
        .warnings()
        .iter()
        .any(|w| matches!(w, ReconstructionWarning::Cycle { .. })));
}

#[test]
fn test_unknown_block_types_are_skipped() {
    let doc = reconstruct_json(
        r#"{
            "JobStatus": "SUCCEEDED",
            "Blocks": [
                { "BlockType": "LAYOUT_TITLE", "Id": "x1" },
                { "BlockType": "LINE", "Id": "l1", "Text": "Kept" }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(doc.text(), "Kept\n");
}

#[test]
fn test_empty_response() {
    let doc = reconstruct_json(r#"{ "JobStatus": "SUCCEEDED", "Blocks": [] }"#).unwrap();
    assert!(doc.is_empty());
}
