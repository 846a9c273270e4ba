//! Analysis job types.

use super::Block;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Create a job id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job status reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Still running
    InProgress,
    /// Finished; results are available
    Succeeded,
    /// Finished with some pages failing; results are available
    PartialSuccess,
    /// Finished without results
    Failed,
}

impl JobStatus {
    /// Check if the job has stopped running.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::InProgress)
    }

    /// Check if the job produced results.
    pub fn has_results(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::PartialSuccess)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::PartialSuccess => "PARTIAL_SUCCESS",
            JobStatus::Failed => "FAILED",
        };
        f.write_str(tag)
    }
}

/// One response of the provider's get-status call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Job status
    pub status: JobStatus,

    /// Provider explanation, mostly present on failure
    pub status_message: Option<String>,

    /// Blocks of this result page (empty while in progress)
    pub blocks: Vec<Block>,

    /// Continuation token when more result pages remain
    pub next_token: Option<String>,

    /// Document page count from the provider's metadata
    pub page_count: Option<u32>,
}

impl StatusResponse {
    /// A response for a job that is still running.
    pub fn in_progress() -> Self {
        Self::with_status(JobStatus::InProgress)
    }

    /// A failed response with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status_message: Some(message.into()),
            ..Self::with_status(JobStatus::Failed)
        }
    }

    /// A successful result page.
    pub fn succeeded(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::with_status(JobStatus::Succeeded)
        }
    }

    /// An empty response with the given status.
    pub fn with_status(status: JobStatus) -> Self {
        Self {
            status,
            status_message: None,
            blocks: Vec::new(),
            next_token: None,
            page_count: None,
        }
    }

    /// Set the continuation token and return self.
    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }
}

/// Analysis features to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Detect tables
    pub tables: bool,
    /// Detect form key/value pairs
    pub forms: bool,
}

impl FeatureFlags {
    /// Tables and forms.
    pub fn all() -> Self {
        Self {
            tables: true,
            forms: true,
        }
    }

    /// Tables only.
    pub fn tables() -> Self {
        Self {
            tables: true,
            forms: false,
        }
    }

    /// Forms only.
    pub fn forms() -> Self {
        Self {
            tables: false,
            forms: true,
        }
    }

    /// Check if no feature is requested.
    pub fn is_empty(&self) -> bool {
        !self.tables && !self.forms
    }

    /// Provider feature names (`TABLES`, `FORMS`).
    pub fn feature_types(&self) -> Vec<&'static str> {
        let mut types = Vec::new();
        if self.tables {
            types.push("TABLES");
        }
        if self.forms {
            types.push("FORMS");
        }
        types
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Where the document to analyze comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Raw bytes, uploaded before analysis
    Bytes {
        /// Object name used for the upload
        name: String,
        /// Document content
        data: Vec<u8>,
    },
    /// A document already in provider storage
    Location(String),
}

impl DocumentSource {
    /// Raw document bytes.
    pub fn bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        DocumentSource::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    /// An existing storage location.
    pub fn location(location: impl Into<String>) -> Self {
        DocumentSource::Location(location.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Failed.has_results());
        assert!(JobStatus::PartialSuccess.has_results());
    }

    #[test]
    fn test_feature_types() {
        assert_eq!(FeatureFlags::all().feature_types(), ["TABLES", "FORMS"]);
        assert_eq!(FeatureFlags::forms().feature_types(), ["FORMS"]);
        let none = FeatureFlags {
            tables: false,
            forms: false,
        };
        assert!(none.is_empty());
    }

    #[test]
    fn test_status_response_builders() {
        let resp = StatusResponse::succeeded(Vec::new()).with_next_token("2");
        assert_eq!(resp.status, JobStatus::Succeeded);
        assert_eq!(resp.next_token.as_deref(), Some("2"));

        let resp = StatusResponse::failed("bad document");
        assert_eq!(resp.status_message.as_deref(), Some("bad document"));
    }
}
