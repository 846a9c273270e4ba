//! Model types for OCR analysis output and reconstructed documents.
//!
//! The block types mirror what the provider returns: a flat collection of
//! typed blocks linked by id. The result types hold what the reconstruction
//! engine builds from them.

mod block;
mod document;
mod form;
mod job;
mod page;
mod table;

pub use block::{Block, BlockId, BlockKind, BlockType, EntityType, SelectionStatus};
pub use document::{DocumentResult, JobSummary, ReconstructionWarning};
pub use form::{FormField, FormFields};
pub use job::{DocumentSource, FeatureFlags, JobId, JobStatus, StatusResponse};
pub use page::{concat_pages, BlockPage};
pub use table::TableGrid;
