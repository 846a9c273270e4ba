//! Plain text rendering for reconstructed documents.

use crate::error::Result;
use crate::model::DocumentResult;

use super::RenderOptions;

/// Convert a document to plain text.
///
/// Tables are written tab-separated, form fields as `key: value` lines.
/// Sections are separated by a blank line.
pub fn to_text(doc: &DocumentResult, options: &RenderOptions) -> Result<String> {
    let mut sections: Vec<String> = Vec::new();

    if options.include_text && !doc.text().trim().is_empty() {
        sections.push(doc.text().trim_end().to_string());
    }

    if options.include_tables {
        sections.extend(
            doc.tables()
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| t.plain_text()),
        );
    }

    if options.include_forms && !doc.form_fields().is_empty() {
        let lines: Vec<String> = doc
            .form_fields()
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        sections.push(lines.join("\n"));
    }

    if options.include_warnings {
        sections.extend(doc.warnings().iter().map(|w| format!("warning: {}", w)));
    }

    Ok(sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FormFields, TableGrid};

    #[test]
    fn test_to_text() {
        let grid = TableGrid::from_rows(vec![
            vec!["A".into(), "B".into()],
            vec!["C".into(), String::new()],
        ]);
        let fields: FormFields = [("Name", "Alice")].into_iter().collect();
        let doc = DocumentResult::new("Hello, world!\nSecond line.\n".to_string(), vec![grid], fields);

        let result = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(
            result,
            "Hello, world!\nSecond line.\n\nA\tB\nC\t\n\nName: Alice"
        );
    }

    #[test]
    fn test_to_text_only() {
        let fields: FormFields = [("Name", "Alice")].into_iter().collect();
        let doc = DocumentResult::new("Hello\n".to_string(), Vec::new(), fields);

        let result = to_text(&doc, &RenderOptions::text_only()).unwrap();
        assert_eq!(result, "Hello");
    }
}
