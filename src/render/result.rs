//! Render results and extraction statistics.

use crate::model::{DocumentResult, JobSummary};
use serde::{Deserialize, Serialize};

/// Rendered content together with job information and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Job summary, when the document came from a pipeline run
    pub summary: Option<JobSummary>,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, summary: Option<JobSummary>, stats: ExtractionStats) -> Self {
        Self {
            content,
            summary,
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            summary: None,
            stats: ExtractionStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics about a reconstructed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of text lines outside tables
    pub line_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of table cells (including empty ones)
    pub cell_count: u32,

    /// Number of form fields
    pub form_field_count: u32,

    /// Approximate word count of the text (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count of the text (excluding whitespace)
    pub char_count: u32,

    /// Number of reconstruction warnings
    pub warning_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a reconstructed document.
    pub fn from_result(doc: &DocumentResult) -> Self {
        let mut stats = Self {
            line_count: doc.text().lines().count() as u32,
            table_count: doc.tables().len() as u32,
            cell_count: doc
                .tables()
                .iter()
                .map(|t| (t.row_count() * t.column_count()) as u32)
                .sum(),
            form_field_count: doc.form_fields().len() as u32,
            warning_count: doc.warnings().len() as u32,
            ..Self::default()
        };
        stats.count_text(doc.text());
        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        // Word count: whitespace-separated tokens
        self.word_count += text.split_whitespace().count() as u32;

        // Character count: non-whitespace characters
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
