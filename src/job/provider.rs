//! OCR provider interface.

use crate::error::{ProviderError, Result};
use crate::model::{FeatureFlags, JobId, JobStatus, StatusResponse};
use crate::wire;
use async_trait::async_trait;
use log::debug;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Operations the engine needs from a cloud OCR service.
///
/// Implement this trait over the provider's SDK or HTTP API. Network
/// transport, authentication, and retries below this interface are the
/// implementation's concern.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Store document bytes and return their location.
    async fn upload(&self, data: &[u8], destination: &str) -> std::result::Result<String, ProviderError>;

    /// Start an asynchronous analysis of a stored document.
    async fn start_analysis(
        &self,
        location: &str,
        features: FeatureFlags,
    ) -> std::result::Result<JobId, ProviderError>;

    /// Get the job status, or the result page named by `next_token`.
    async fn get_status(
        &self,
        job_id: &JobId,
        next_token: Option<&str>,
    ) -> std::result::Result<StatusResponse, ProviderError>;

    /// Remove a stored document.
    async fn delete(&self, _location: &str) -> std::result::Result<(), ProviderError> {
        Ok(())
    }
}

/// Provider that replays recorded status responses.
///
/// The first status call returns the first recording (after `in_progress`
/// calls that report `IN_PROGRESS`); each recording's continuation token is
/// rewritten to the index of the next one, so recorded tokens need not match.
#[derive(Debug)]
pub struct ReplayProvider {
    responses: Vec<StatusResponse>,
    in_progress: usize,
    status_calls: AtomicUsize,
    uploads: Mutex<Vec<String>>,
}

impl ReplayProvider {
    /// Replay the given responses in order.
    pub fn new(responses: Vec<StatusResponse>) -> Self {
        let count = responses.len();
        let responses = responses
            .into_iter()
            .enumerate()
            .map(|(i, mut resp)| {
                resp.next_token = (i + 1 < count).then(|| (i + 1).to_string());
                resp
            })
            .collect();

        Self {
            responses,
            in_progress: 0,
            status_calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Load recordings from provider JSON files.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let responses = paths
            .iter()
            .map(wire::parse_response_file)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(responses))
    }

    /// Report `IN_PROGRESS` for the first `polls` status calls.
    pub fn with_in_progress(mut self, polls: usize) -> Self {
        self.in_progress = polls;
        self
    }

    /// Number of get-status calls served so far.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Locations uploaded and not yet deleted.
    pub fn stored(&self) -> Vec<String> {
        self.uploads
            .lock()
            .map(|uploads| uploads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OcrProvider for ReplayProvider {
    async fn upload(&self, data: &[u8], destination: &str) -> std::result::Result<String, ProviderError> {
        let location = format!("replay://{}", destination);
        debug!("Replay upload of {} bytes to {}", data.len(), location);
        self.uploads
            .lock()
            .map_err(|_| ProviderError::upload("storage lock poisoned"))?
            .push(location.clone());
        Ok(location)
    }

    async fn start_analysis(
        &self,
        location: &str,
        features: FeatureFlags,
    ) -> std::result::Result<JobId, ProviderError> {
        if features.is_empty() {
            return Err(ProviderError::start("no analysis feature requested"));
        }
        Ok(JobId::new(format!("replay-{}", location.len())))
    }

    async fn get_status(
        &self,
        _job_id: &JobId,
        next_token: Option<&str>,
    ) -> std::result::Result<StatusResponse, ProviderError> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst);

        let index = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ProviderError::poll(format!("unknown continuation token {}", token)))?,
            None if call < self.in_progress => return Ok(StatusResponse::in_progress()),
            None => 0,
        };

        match self.responses.get(index) {
            Some(resp) => Ok(resp.clone()),
            None if index == 0 => Ok(StatusResponse::with_status(JobStatus::Succeeded)),
            None => Err(ProviderError::poll(format!("no recorded page {}", index))),
        }
    }

    async fn delete(&self, location: &str) -> std::result::Result<(), ProviderError> {
        let mut uploads = self
            .uploads
            .lock()
            .map_err(|_| ProviderError::delete("storage lock poisoned"))?;
        uploads.retain(|stored| stored != location);
        Ok(())
    }
}
