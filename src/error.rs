//! Error types for untextract library.

use crate::model::BlockId;
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for untextract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while driving a job or reconstructing its output.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document could not be uploaded to the provider's storage.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The provider refused to start the analysis job.
    #[error("Could not start analysis: {0}")]
    Start(String),

    /// A provider call failed outside the retried poll loop.
    #[error("Provider call failed: {0}")]
    Provider(ProviderError),

    /// The analysis job did not complete successfully.
    #[error(transparent)]
    Job(#[from] JobError),

    /// The block graph is malformed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The provider response could not be mapped to the block model.
    #[error("Invalid provider response: {0}")]
    Wire(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

/// Terminal job failures. No partial result accompanies these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The provider reported the job as failed.
    #[error("Analysis job failed: {0}")]
    Failed(String),

    /// No terminal state was reached within the allowed time.
    #[error("Analysis job did not finish within {0:?}")]
    Timeout(Duration),

    /// The caller stopped polling before the job finished.
    #[error("Polling was cancelled")]
    Cancelled,
}

/// Anomalies in the block graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A block is reachable from itself.
    #[error("Relationship cycle through block {0}")]
    Cycle(BlockId),

    /// A relationship points at a block that is not in the result set.
    #[error("Block {parent} references missing block {child}")]
    Dangling {
        /// Block holding the reference
        parent: BlockId,
        /// Referenced id that could not be resolved
        child: BlockId,
    },
}

/// Which provider operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Storing the document bytes
    Upload,
    /// Starting the analysis job
    Start,
    /// Fetching job status or a result page
    Poll,
    /// Removing the stored document
    Delete,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderErrorKind::Upload => "upload",
            ProviderErrorKind::Start => "start",
            ProviderErrorKind::Poll => "poll",
            ProviderErrorKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Error returned by an [`OcrProvider`](crate::job::OcrProvider) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct ProviderError {
    /// Operation that failed
    pub kind: ProviderErrorKind,
    /// Provider-supplied description
    pub message: String,
}

impl ProviderError {
    /// Create a provider error of the given kind.
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Upload failure.
    pub fn upload(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Upload, message)
    }

    /// Start failure.
    pub fn start(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Start, message)
    }

    /// Transient status/page fetch failure.
    pub fn poll(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Poll, message)
    }

    /// Cleanup failure.
    pub fn delete(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Delete, message)
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        match err.kind {
            ProviderErrorKind::Upload => Error::Upload(err.message),
            ProviderErrorKind::Start => Error::Start(err.message),
            ProviderErrorKind::Poll | ProviderErrorKind::Delete => Error::Provider(err),
        }
    }
}
