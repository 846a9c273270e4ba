//! End-to-end analysis: upload, start, poll, reconstruct.

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::job::{CancelHandle, JobPoller, OcrProvider, PollOptions};
use crate::model::{DocumentResult, DocumentSource, FeatureFlags, JobSummary};
use crate::reconstruct::reconstruct;
use chrono::Utc;
use log::{info, warn};

/// Runs analysis jobs against one provider.
///
/// # Example
///
/// ```no_run
/// use untextract::{DocumentSource, FeatureFlags, Pipeline, ProviderConfig, ReplayProvider};
///
/// # async fn demo() -> untextract::Result<()> {
/// let config = ProviderConfig::from_env()?;
/// let provider = ReplayProvider::from_files(&["response.json"])?;
/// let result = Pipeline::new(&provider, &config)
///     .run(DocumentSource::location("bucket/scan.pdf"), FeatureFlags::all())
///     .await?;
/// println!("{}", result.text());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<'a> {
    provider: &'a dyn OcrProvider,
    config: &'a ProviderConfig,
    poller: JobPoller,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with default poll options.
    pub fn new(provider: &'a dyn OcrProvider, config: &'a ProviderConfig) -> Self {
        Self {
            provider,
            config,
            poller: JobPoller::default(),
        }
    }

    /// Set poll options.
    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.poller = JobPoller::new(options);
        self
    }

    /// Handle for abandoning a running job.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.poller.cancel_handle()
    }

    /// Analyze a document and reconstruct its text, tables, and form fields.
    ///
    /// Upload and start failures are returned immediately; transient poll
    /// failures are retried until the poll budget runs out. No partial result
    /// is returned when the job fails, times out, or is cancelled.
    pub async fn run(&self, source: DocumentSource, features: FeatureFlags) -> Result<DocumentResult> {
        if features.is_empty() {
            return Err(Error::Start("no analysis feature requested".to_string()));
        }

        let (location, uploaded) = match source {
            DocumentSource::Bytes { name, data } => {
                let destination = self.config.destination(&name);
                let location = self
                    .provider
                    .upload(&data, &destination)
                    .await
                    .map_err(|e| Error::Upload(e.message))?;
                info!("Uploaded {} bytes to {}", data.len(), location);
                (location, true)
            }
            DocumentSource::Location(location) => (location, false),
        };

        let job_id = self
            .provider
            .start_analysis(&location, features)
            .await
            .map_err(|e| Error::Start(e.message))?;
        let started_at = Utc::now();
        info!(
            "Started analysis job {} for {} ({})",
            job_id,
            location,
            features.feature_types().join(", ")
        );

        let (status, pages) = self.poller.poll_with_status(self.provider, &job_id).await?;

        let summary = JobSummary {
            job_id,
            status,
            responses: pages.len(),
            block_count: pages.iter().map(|p| p.block_count()).sum(),
            page_count: pages.iter().find_map(|p| p.page_count),
            started_at,
            finished_at: Utc::now(),
        };
        let result = reconstruct(pages).with_summary(summary);

        if uploaded && self.config.cleanup_uploads {
            if let Err(e) = self.provider.delete(&location).await {
                warn!("Could not delete {}: {}", location, e);
            }
        }

        Ok(result)
    }
}
