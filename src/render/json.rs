//! JSON output for reconstructed documents.
//!
//! [`to_json`] serializes the whole [`DocumentResult`]. [`to_json_with_options`]
//! writes only the sections enabled in [`RenderOptions`]; disabled sections are
//! left out of the object rather than emitted empty.

use super::RenderOptions;
use crate::error::{Error, Result};
use crate::model::{DocumentResult, FormFields, JobSummary, ReconstructionWarning, TableGrid};
use serde::Serialize;

/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Indented, one field per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Borrowed projection of a document onto the enabled sections.
#[derive(Serialize)]
struct DocumentView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a JobSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tables: Option<&'a [TableGrid]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    form_fields: Option<&'a FormFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<&'a [ReconstructionWarning]>,
}

impl<'a> DocumentView<'a> {
    fn new(doc: &'a DocumentResult, options: &RenderOptions) -> Self {
        Self {
            summary: doc.summary().filter(|_| options.include_frontmatter),
            text: options.include_text.then(|| doc.text()),
            tables: options.include_tables.then(|| doc.tables()),
            form_fields: options.include_forms.then(|| doc.form_fields()),
            warnings: options.include_warnings.then(|| doc.warnings()),
        }
    }
}

/// Serialize the full document, warnings and job summary included.
pub fn to_json(doc: &DocumentResult, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

/// Serialize only the sections enabled in `options`.
///
/// The job summary is written when `include_frontmatter` is set and the
/// document came from a pipeline run.
pub fn to_json_with_options(
    doc: &DocumentResult,
    format: JsonFormat,
    options: &RenderOptions,
) -> Result<String> {
    serialize(&DocumentView::new(doc, options), format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };
    json.map_err(|e| Error::Render(format!("cannot write document as JSON: {}", e)))
}
