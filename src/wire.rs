//! Provider response format.
//!
//! Maps the provider's JSON (`Blocks`, `Relationships`, `JobStatus`,
//! `NextToken`, ...) onto the block model. Responses of the synchronous
//! analyze call carry no `JobStatus` and are read as succeeded.

use crate::error::{Error, Result};
use crate::model::{
    Block, BlockId, BlockKind, BlockType, EntityType, JobStatus, SelectionStatus, StatusResponse,
};
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

/// Raw status/page response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawResponse {
    /// Job status tag
    pub job_status: Option<String>,
    /// Provider explanation
    pub status_message: Option<String>,
    /// Continuation token
    pub next_token: Option<String>,
    /// Document metadata
    pub document_metadata: Option<RawDocumentMetadata>,
    /// Result blocks
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

/// Raw document metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDocumentMetadata {
    /// Number of pages in the document
    pub pages: Option<u32>,
}

/// Raw block as emitted by the provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBlock {
    /// Block type tag
    pub block_type: String,
    /// Block id
    pub id: String,
    /// Text payload
    pub text: Option<String>,
    /// Originating page
    pub page: Option<u32>,
    /// Cell row index
    pub row_index: Option<u32>,
    /// Cell column index
    pub column_index: Option<u32>,
    /// Key/value tags
    #[serde(default)]
    pub entity_types: Vec<String>,
    /// Selection state
    pub selection_status: Option<String>,
    /// Typed relationships
    #[serde(default)]
    pub relationships: Vec<RawRelationship>,
}

/// Raw relationship.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRelationship {
    /// Relationship type (`CHILD`, `VALUE`, ...)
    #[serde(rename = "Type")]
    pub kind: String,
    /// Target ids
    #[serde(default)]
    pub ids: Vec<String>,
}

impl RawBlock {
    fn relationship_ids(&self, kind: &str) -> Vec<BlockId> {
        self.relationships
            .iter()
            .filter(|r| r.kind == kind)
            .flat_map(|r| r.ids.iter().map(|id| BlockId::from(id.as_str())))
            .collect()
    }

    /// Convert to the block model.
    ///
    /// Returns `None` for block types the model does not cover and for cells
    /// without valid coordinates.
    pub fn into_block(self) -> Option<Block> {
        let block_type = match BlockType::from_tag(&self.block_type) {
            Some(block_type) => block_type,
            None => {
                debug!("Skipping unsupported block type {} ({})", self.block_type, self.id);
                return None;
            }
        };

        let kind = match block_type {
            BlockType::Page => BlockKind::Page,
            BlockType::Line => BlockKind::Line {
                text: self.text.clone().unwrap_or_default(),
            },
            BlockType::Word => BlockKind::Word {
                text: self.text.clone().unwrap_or_default(),
            },
            BlockType::Table => BlockKind::Table,
            BlockType::Cell => match (self.row_index, self.column_index) {
                (Some(row_index), Some(column_index)) if row_index >= 1 && column_index >= 1 => {
                    BlockKind::Cell {
                        row_index,
                        column_index,
                    }
                }
                (row, column) => {
                    warn!(
                        "Skipping cell {} with invalid position ({:?}, {:?})",
                        self.id, row, column
                    );
                    return None;
                }
            },
            BlockType::KeyValueSet => BlockKind::KeyValueSet {
                entity_types: self
                    .entity_types
                    .iter()
                    .filter_map(|tag| parse_entity_type(tag))
                    .collect(),
                value_ids: self.relationship_ids("VALUE"),
            },
            BlockType::SelectionElement => BlockKind::SelectionElement {
                status: match self.selection_status.as_deref() {
                    Some("SELECTED") => SelectionStatus::Selected,
                    _ => SelectionStatus::NotSelected,
                },
            },
        };

        Some(Block {
            children: self.relationship_ids("CHILD"),
            id: BlockId::from(self.id),
            page: self.page.unwrap_or(1),
            kind,
        })
    }
}

fn parse_entity_type(tag: &str) -> Option<EntityType> {
    match tag {
        "KEY" => Some(EntityType::Key),
        "VALUE" => Some(EntityType::Value),
        _ => None,
    }
}

/// Parse a job status tag.
pub fn parse_job_status(tag: &str) -> Result<JobStatus> {
    match tag {
        "IN_PROGRESS" => Ok(JobStatus::InProgress),
        "SUCCEEDED" => Ok(JobStatus::Succeeded),
        "PARTIAL_SUCCESS" => Ok(JobStatus::PartialSuccess),
        "FAILED" => Ok(JobStatus::Failed),
        other => Err(Error::Wire(format!("unknown job status: {}", other))),
    }
}

impl TryFrom<RawResponse> for StatusResponse {
    type Error = Error;

    fn try_from(raw: RawResponse) -> Result<Self> {
        let status = match raw.job_status.as_deref() {
            Some(tag) => parse_job_status(tag)?,
            None => JobStatus::Succeeded,
        };

        Ok(StatusResponse {
            status,
            status_message: raw.status_message,
            next_token: raw.next_token.filter(|t| !t.is_empty()),
            page_count: raw.document_metadata.and_then(|m| m.pages),
            blocks: raw
                .blocks
                .into_iter()
                .filter_map(RawBlock::into_block)
                .collect(),
        })
    }
}

/// Parse one provider response from JSON text.
pub fn parse_response(json: &str) -> Result<StatusResponse> {
    let raw: RawResponse = serde_json::from_str(json)?;
    raw.try_into()
}

/// Parse one provider response from a JSON file.
pub fn parse_response_file<P: AsRef<Path>>(path: P) -> Result<StatusResponse> {
    let json = std::fs::read_to_string(path)?;
    parse_response(&json)
}
