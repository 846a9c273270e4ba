//! Markdown rendering for reconstructed documents.

use crate::error::Result;
use crate::model::{DocumentResult, FormFields, TableGrid};

use super::{ExtractionStats, RenderOptions, RenderResult};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &DocumentResult, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &DocumentResult, options: &RenderOptions) -> Result<RenderResult> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(self, doc: &DocumentResult) -> Result<String> {
        Ok(self.render_internal(doc))
    }

    /// Render a document to Markdown with extraction statistics.
    pub fn render_with_stats(self, doc: &DocumentResult) -> Result<RenderResult> {
        let content = self.render_internal(doc);
        Ok(RenderResult::new(
            content,
            doc.summary().cloned(),
            ExtractionStats::from_result(doc),
        ))
    }

    fn render_internal(&self, doc: &DocumentResult) -> String {
        let mut output = String::new();

        if self.options.include_frontmatter {
            if let Some(summary) = doc.summary() {
                output.push_str(&summary.to_yaml_frontmatter());
                output.push('\n');
            }
        }

        if self.options.include_text {
            self.render_text(&mut output, doc.text());
        }

        if self.options.include_tables {
            for table in doc.tables() {
                self.render_table(&mut output, table);
            }
        }

        if self.options.include_forms {
            self.render_form_fields(&mut output, doc.form_fields());
        }

        if self.options.include_warnings && !doc.warnings().is_empty() {
            output.push_str("## Warnings\n\n");
            for warning in doc.warnings() {
                output.push_str(&format!("- {}\n", warning));
            }
            output.push('\n');
        }

        output.trim().to_string()
    }

    // Each OCR line becomes its own paragraph.
    fn render_text(&self, output: &mut String, text: &str) {
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            output.push_str(&self.escape(line));
            output.push_str("\n\n");
        }
    }

    fn render_table(&self, output: &mut String, table: &TableGrid) {
        if table.is_empty() || table.column_count() == 0 {
            return;
        }

        for (i, row) in table.rows().iter().enumerate() {
            output.push('|');
            for cell in row {
                let content = cell.replace('\n', " ");
                output.push_str(&format!(" {} |", self.escape(content.trim())));
            }
            output.push('\n');

            // Add separator after header row
            if i == 0 {
                output.push('|');
                for _ in row {
                    output.push_str(" --- |");
                }
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_form_fields(&self, output: &mut String, fields: &FormFields) {
        if fields.is_empty() {
            return;
        }

        output.push_str("| Key | Value |\n| --- | --- |\n");
        for (key, value) in fields.iter() {
            output.push_str(&format!("| {} | {} |\n", self.escape(key), self.escape(value)));
        }
        output.push('\n');
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            // Pipes still break table rows
            text.replace('|', "\\|")
        }
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
