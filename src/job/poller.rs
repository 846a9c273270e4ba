//! Async poll driver.

use super::{OcrProvider, PollAction, PollMachine, PollOptions};
use crate::error::JobError;
use crate::model::{BlockPage, JobId, JobStatus};
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Stops a [`JobPoller`] at its next suspension point.
///
/// The remote job keeps running; cancelling only stops local polling.
/// Cancellation is sticky: every later poll on the same poller returns
/// [`JobError::Cancelled`] immediately.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Drives an analysis job to a terminal state and collects its result pages.
///
/// A poller can run any number of jobs until it is cancelled. After
/// [`CancelHandle::cancel`] it is spent; create a new one to poll again.
#[derive(Debug)]
pub struct JobPoller {
    options: PollOptions,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: watch::Receiver<bool>,
}

impl JobPoller {
    /// Create a poller with the given options.
    pub fn new(options: PollOptions) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            options,
            cancel_tx: Arc::new(tx),
            cancel_rx: rx,
        }
    }

    /// Get the poll options.
    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    /// Handle for cancelling polls run by this poller.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    /// Poll until the job finishes and return its result pages in receipt order.
    pub async fn poll(
        &self,
        provider: &dyn OcrProvider,
        job_id: &JobId,
    ) -> Result<Vec<BlockPage>, JobError> {
        self.poll_with_status(provider, job_id)
            .await
            .map(|(_, pages)| pages)
    }

    /// Like [`poll`](Self::poll), also returning the terminal status.
    pub async fn poll_with_status(
        &self,
        provider: &dyn OcrProvider,
        job_id: &JobId,
    ) -> Result<(JobStatus, Vec<BlockPage>), JobError> {
        let started = Instant::now();
        let deadline = started + self.options.max_wait;
        let mut cancel = self.cancel_rx.clone();
        let mut machine = PollMachine::new(&self.options);
        let mut action = machine.start();

        loop {
            match action {
                PollAction::Complete => {
                    let status = machine.status().unwrap_or(JobStatus::Succeeded);
                    let pages = machine.into_pages();
                    debug!("Job {} complete with {} result pages", job_id, pages.len());
                    return Ok((status, pages));
                }
                PollAction::Fail(err) => return Err(err),
                PollAction::Fetch { token, delay } => {
                    if !delay.is_zero() {
                        debug!("Job {}: next status call in {:?}", job_id, delay);
                    }
                    wait(delay, &mut cancel).await?;

                    let result = tokio::select! {
                        biased;
                        result = provider.get_status(job_id, token.as_deref()) => result,
                        _ = cancelled(&mut cancel) => return Err(JobError::Cancelled),
                        _ = tokio::time::sleep_until(deadline) => {
                            debug!("Job {}: status call still pending at deadline", job_id);
                            return Err(JobError::Timeout(self.options.max_wait));
                        }
                    };

                    let elapsed = started.elapsed();
                    action = match result {
                        Ok(response) => machine.on_response(response, elapsed),
                        Err(err) => machine.on_error(&err, elapsed),
                    };
                }
            }
        }
    }
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new(PollOptions::default())
    }
}

async fn wait(delay: Duration, cancel: &mut watch::Receiver<bool>) -> Result<(), JobError> {
    if *cancel.borrow() {
        return Err(JobError::Cancelled);
    }
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = cancelled(cancel) => Err(JobError::Cancelled),
    }
}

/// Resolves once cancellation is requested; never if the sender is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
