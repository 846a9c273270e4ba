//! # untextract
//!
//! Reconstructs structured documents from asynchronous OCR analysis jobs.
//!
//! An analysis provider returns a flat collection of typed blocks (pages,
//! lines, words, table cells, key/value sets, selection marks) linked by id.
//! This library drives the analysis job to completion and rebuilds linear
//! text, table grids, and form fields from those blocks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use untextract::{reconstruct_file, render};
//!
//! fn main() -> untextract::Result<()> {
//!     // Reconstruct a saved provider response
//!     let doc = reconstruct_file("response.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Job polling**: capped exponential backoff, pagination, timeout, cancellation
//! - **Graph reconstruction**: text, tables, and form fields from block relationships
//! - **Tolerant**: dangling references, cycles, and duplicates become warnings
//! - **Multiple output formats**: Markdown, plain text, JSON

pub mod config;
pub mod error;
pub mod graph;
pub mod job;
pub mod model;
pub mod pipeline;
pub mod reconstruct;
pub mod render;
pub mod wire;

// Re-export commonly used types
pub use config::{Credentials, ProviderConfig};
pub use error::{Error, GraphError, JobError, ProviderError, ProviderErrorKind, Result};
pub use graph::BlockGraph;
pub use job::{CancelHandle, JobPoller, OcrProvider, PollOptions, ReplayProvider};
pub use model::{
    Block, BlockId, BlockKind, BlockPage, BlockType, DocumentResult, DocumentSource, FeatureFlags,
    FormField, FormFields, JobId, JobStatus, JobSummary, ReconstructionWarning, StatusResponse,
    TableGrid,
};
pub use pipeline::Pipeline;
pub use reconstruct::{reconstruct, reconstruct_blocks, reconstruct_graph};
pub use render::{JsonFormat, RenderOptions};
pub use wire::{parse_response, parse_response_file};

use log::debug;
use std::path::Path;

/// Reconstruct a document from one saved provider response.
///
/// # Example
///
/// ```no_run
/// use untextract::reconstruct_file;
///
/// let doc = reconstruct_file("response.json").unwrap();
/// println!("Tables: {}", doc.tables().len());
/// ```
pub fn reconstruct_file<P: AsRef<Path>>(path: P) -> Result<DocumentResult> {
    reconstruct_files(&[path])
}

/// Reconstruct a document from the saved responses of a paginated result,
/// in page order.
///
/// # Example
///
/// ```no_run
/// use untextract::reconstruct_files;
///
/// let doc = reconstruct_files(&["page-1.json", "page-2.json"]).unwrap();
/// println!("{}", doc.text());
/// ```
pub fn reconstruct_files<P: AsRef<Path>>(paths: &[P]) -> Result<DocumentResult> {
    let pages = load_pages(paths)?;
    Ok(reconstruct(pages))
}

/// Reconstruct a document from a provider response given as JSON text.
pub fn reconstruct_json(json: &str) -> Result<DocumentResult> {
    let response = parse_response(json)?;
    Ok(reconstruct(vec![BlockPage::from(response)]))
}

fn load_pages<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<BlockPage>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            debug!("Loading response {}", path.display());
            let response = parse_response_file(path)?;
            if response.status == JobStatus::Failed {
                let message = response
                    .status_message
                    .unwrap_or_else(|| JobStatus::Failed.to_string());
                return Err(JobError::Failed(message).into());
            }
            Ok(BlockPage::from(response))
        })
        .collect()
}

/// Extract linear text from a saved provider response.
///
/// # Example
///
/// ```no_run
/// use untextract::extract_text;
///
/// let text = extract_text("response.json").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = reconstruct_file(path)?;
    Ok(doc.text().to_string())
}

/// Convert a saved provider response to Markdown.
///
/// # Example
///
/// ```no_run
/// use untextract::to_markdown;
///
/// let markdown = to_markdown("response.json").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = reconstruct_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert a saved provider response to Markdown with custom options.
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = reconstruct_file(path)?;
    render::to_markdown(&doc, options)
}

/// Convert a saved provider response to plain text.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = reconstruct_file(path)?;
    render::to_text(&doc, options)
}

/// Convert a saved provider response to JSON.
///
/// # Example
///
/// ```no_run
/// use untextract::{to_json, JsonFormat};
///
/// let json = to_json("response.json", JsonFormat::Pretty).unwrap();
/// std::fs::write("output.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = reconstruct_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for reconstructing and rendering documents.
///
/// # Example
///
/// ```no_run
/// use untextract::Untextract;
///
/// let markdown = Untextract::new()
///     .with_frontmatter()
///     .without_forms()
///     .load(&["page-1.json", "page-2.json"])?
///     .to_markdown()?;
/// # Ok::<(), untextract::Error>(())
/// ```
pub struct Untextract {
    render_options: RenderOptions,
}

impl Untextract {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
        }
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Include reconstruction warnings in output.
    pub fn with_warnings(mut self) -> Self {
        self.render_options = self.render_options.with_warnings(true);
        self
    }

    /// Leave tables out of rendered output.
    pub fn without_tables(mut self) -> Self {
        self.render_options = self.render_options.with_tables(false);
        self
    }

    /// Leave form fields out of rendered output.
    pub fn without_forms(mut self) -> Self {
        self.render_options = self.render_options.with_forms(false);
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Reconstruct from saved response files, in page order.
    pub fn load<P: AsRef<Path>>(self, paths: &[P]) -> Result<UntextractResult> {
        let document = reconstruct_files(paths)?;
        Ok(self.wrap(document))
    }

    /// Reconstruct from already received pages.
    pub fn from_pages(self, pages: Vec<BlockPage>) -> UntextractResult {
        self.wrap(reconstruct(pages))
    }

    /// Wrap a document produced elsewhere, e.g. by a [`Pipeline`] run.
    pub fn wrap(self, document: DocumentResult) -> UntextractResult {
        UntextractResult {
            document,
            render_options: self.render_options,
        }
    }
}

impl Default for Untextract {
    fn default() -> Self {
        Self::new()
    }
}

/// A reconstructed document with its render options.
pub struct UntextractResult {
    /// The reconstructed document
    pub document: DocumentResult,
    /// Render options to use
    render_options: RenderOptions,
}

impl UntextractResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON, keeping only the enabled sections.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json_with_options(&self.document, format, &self.render_options)
    }

    /// Get the linear text.
    pub fn plain_text(&self) -> &str {
        self.document.text()
    }

    /// Get the document.
    pub fn document(&self) -> &DocumentResult {
        &self.document
    }
}
