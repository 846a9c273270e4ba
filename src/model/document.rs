//! Document-level result types.

use super::{BlockId, FormFields, JobId, JobStatus, TableGrid};
use crate::error::GraphError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The structured document reconstructed from one completed job.
///
/// Built once by the reconstruction engine and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    text: String,
    tables: Vec<TableGrid>,
    form_fields: FormFields,
    warnings: Vec<ReconstructionWarning>,
    summary: Option<JobSummary>,
}

impl DocumentResult {
    /// Create a result from its reconstructed parts.
    pub fn new(text: String, tables: Vec<TableGrid>, form_fields: FormFields) -> Self {
        Self {
            text,
            tables,
            form_fields,
            warnings: Vec::new(),
            summary: None,
        }
    }

    /// Attach reconstruction warnings and return self.
    pub fn with_warnings(mut self, warnings: Vec<ReconstructionWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Attach the job summary and return self.
    pub fn with_summary(mut self, summary: JobSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Linear text of all lines outside tables, one line per `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tables in first-encountered order.
    pub fn tables(&self) -> &[TableGrid] {
        &self.tables
    }

    /// Form key/value pairs.
    pub fn form_fields(&self) -> &FormFields {
        &self.form_fields
    }

    /// Anomalies found while reconstructing.
    pub fn warnings(&self) -> &[ReconstructionWarning] {
        &self.warnings
    }

    /// Job information, when produced by the pipeline.
    pub fn summary(&self) -> Option<&JobSummary> {
        self.summary.as_ref()
    }

    /// Check if nothing was reconstructed.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tables.is_empty() && self.form_fields.is_empty()
    }
}

/// Information about the job that produced a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Provider job id
    pub job_id: JobId,

    /// Terminal status
    pub status: JobStatus,

    /// Number of status/page responses that carried results
    pub responses: usize,

    /// Total number of blocks received
    pub block_count: usize,

    /// Document page count reported by the provider
    pub page_count: Option<u32>,

    /// When the job was started
    pub started_at: DateTime<Utc>,

    /// When the last result page was received
    pub finished_at: DateTime<Utc>,
}

impl JobSummary {
    /// Wall-clock duration of the job.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Convert the summary to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("job_id: \"{}\"", escape_yaml(self.job_id.as_str())));
        lines.push(format!("status: {}", self.status));
        if let Some(pages) = self.page_count {
            lines.push(format!("pages: {}", pages));
        }
        lines.push(format!("responses: {}", self.responses));
        lines.push(format!("blocks: {}", self.block_count));
        lines.push(format!("started: {}", self.started_at.to_rfc3339()));
        lines.push(format!("finished: {}", self.finished_at.to_rfc3339()));

        lines.push("---".to_string());
        lines.push(String::new());
        lines.join("\n")
    }
}

fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A recoverable anomaly; reconstruction continued on the reachable subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconstructionWarning {
    /// A relationship points at a block missing from the result set.
    DanglingReference {
        /// Block holding the reference
        parent: BlockId,
        /// Missing id
        child: BlockId,
    },

    /// A block is reachable from itself; the cycle was cut.
    Cycle {
        /// Block where the cycle was detected
        block: BlockId,
    },

    /// Two blocks share an id; the later one is used.
    DuplicateBlockId {
        /// Repeated id
        id: BlockId,
    },

    /// Two cells of one table share coordinates; the later one is used.
    DuplicateCell {
        /// Table id
        table: BlockId,
        /// Row index (1-based)
        row: u32,
        /// Column index (1-based)
        column: u32,
    },
}

impl From<GraphError> for ReconstructionWarning {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Cycle(block) => ReconstructionWarning::Cycle { block },
            GraphError::Dangling { parent, child } => {
                ReconstructionWarning::DanglingReference { parent, child }
            }
        }
    }
}

impl fmt::Display for ReconstructionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructionWarning::DanglingReference { parent, child } => {
                write!(f, "block {} references missing block {}", parent, child)
            }
            ReconstructionWarning::Cycle { block } => {
                write!(f, "relationship cycle through block {}", block)
            }
            ReconstructionWarning::DuplicateBlockId { id } => {
                write!(f, "block id {} appears more than once", id)
            }
            ReconstructionWarning::DuplicateCell { table, row, column } => {
                write!(f, "table {} has two cells at row {}, column {}", table, row, column)
            }
        }
    }
}
