//! Poll state machine.
//!
//! [`PollMachine`] decides what to do next from each provider response and
//! the time elapsed since polling started. It never sleeps or performs I/O,
//! so every transition can be tested without real time passing; the
//! [`JobPoller`](super::JobPoller) executes the actions it returns.

use super::{Backoff, PollOptions};
use crate::error::{JobError, ProviderError};
use crate::model::{BlockPage, JobStatus, StatusResponse};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Duration;

/// Next step for the poll driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollAction {
    /// Wait `delay`, then call get-status with `token`.
    Fetch {
        /// Continuation token, `None` for a plain status call
        token: Option<String>,
        /// Time to wait before the call
        delay: Duration,
    },
    /// All result pages have been received.
    Complete,
    /// Stop with an error; no pages are kept.
    Fail(JobError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Paginating,
    Done,
}

/// Transition logic for one job.
#[derive(Debug)]
pub struct PollMachine {
    backoff: Backoff,
    max_wait: Duration,
    phase: Phase,
    pending: Option<String>,
    seen_tokens: HashSet<String>,
    pages: Vec<BlockPage>,
    status: Option<JobStatus>,
}

impl PollMachine {
    /// Create a machine for one job.
    pub fn new(options: &PollOptions) -> Self {
        Self {
            backoff: Backoff::new(options),
            max_wait: options.max_wait,
            phase: Phase::Waiting,
            pending: None,
            seen_tokens: HashSet::new(),
            pages: Vec::new(),
            status: None,
        }
    }

    /// First action: an immediate status call.
    pub fn start(&mut self) -> PollAction {
        PollAction::Fetch {
            token: None,
            delay: Duration::ZERO,
        }
    }

    /// Transition on a provider response.
    pub fn on_response(&mut self, mut response: StatusResponse, elapsed: Duration) -> PollAction {
        if self.phase == Phase::Done {
            return PollAction::Complete;
        }

        match response.status {
            JobStatus::Failed => {
                let message = response
                    .status_message
                    .unwrap_or_else(|| JobStatus::Failed.to_string());
                info!("Analysis job failed: {}", message);
                self.fail(JobError::Failed(message))
            }
            JobStatus::InProgress => {
                if self.phase == Phase::Paginating {
                    warn!("Result page reported IN_PROGRESS; retrying");
                }
                debug!("Job in progress after {:?}", elapsed);
                self.retry(elapsed)
            }
            status @ (JobStatus::Succeeded | JobStatus::PartialSuccess) => {
                if self.phase == Phase::Waiting {
                    if status == JobStatus::PartialSuccess {
                        warn!(
                            "Analysis job partially succeeded: {}",
                            response.status_message.as_deref().unwrap_or("no message")
                        );
                    } else {
                        info!("Analysis job succeeded after {:?}", elapsed);
                    }
                }
                self.phase = Phase::Paginating;
                self.status = Some(status);
                let next_token = response.next_token.take();
                self.pages.push(BlockPage::from(response));

                match next_token {
                    Some(token) if self.seen_tokens.insert(token.clone()) => {
                        debug!("Fetching result page {}", self.pages.len() + 1);
                        self.pending = Some(token.clone());
                        PollAction::Fetch {
                            token: Some(token),
                            delay: Duration::ZERO,
                        }
                    }
                    Some(token) => {
                        warn!("Continuation token {} repeated; stopping pagination", token);
                        self.complete()
                    }
                    None => self.complete(),
                }
            }
        }
    }

    /// Transition on a failed get-status call. Poll errors are transient.
    pub fn on_error(&mut self, error: &ProviderError, elapsed: Duration) -> PollAction {
        if self.phase == Phase::Done {
            return PollAction::Complete;
        }
        warn!("Status call failed after {:?}: {}", elapsed, error);
        self.retry(elapsed)
    }

    /// Terminal status, once one was seen.
    pub fn status(&self) -> Option<JobStatus> {
        self.status
    }

    /// Check if the machine reached a final action.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Result pages received so far, in receipt order.
    pub fn pages(&self) -> &[BlockPage] {
        &self.pages
    }

    /// Consume the machine and return the result pages.
    pub fn into_pages(self) -> Vec<BlockPage> {
        self.pages
    }

    fn retry(&mut self, elapsed: Duration) -> PollAction {
        if elapsed >= self.max_wait {
            info!("Analysis job timed out after {:?}", elapsed);
            return self.fail(JobError::Timeout(self.max_wait));
        }
        let remaining = self.max_wait - elapsed;
        let delay = self.backoff.next().unwrap_or(remaining).min(remaining);
        PollAction::Fetch {
            token: self.pending.clone(),
            delay,
        }
    }

    fn complete(&mut self) -> PollAction {
        self.phase = Phase::Done;
        self.pending = None;
        PollAction::Complete
    }

    fn fail(&mut self, error: JobError) -> PollAction {
        self.phase = Phase::Done;
        self.pending = None;
        self.pages.clear();
        PollAction::Fail(error)
    }
}
