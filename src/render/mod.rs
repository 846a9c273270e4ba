//! Rendering module for converting reconstructed documents to output formats.

mod json;
mod markdown;
mod options;
mod result;
mod text;

pub use json::{to_json, to_json_with_options, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::RenderOptions;
pub use result::{ExtractionStats, RenderResult};
pub use text::to_text;
