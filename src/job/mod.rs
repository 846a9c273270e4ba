//! Analysis job lifecycle: starting, polling with backoff, and pagination.

mod backoff;
mod machine;
mod options;
mod poller;
mod provider;

pub use backoff::Backoff;
pub use machine::{PollAction, PollMachine};
pub use options::{PollOptions, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_WAIT};
pub use poller::{CancelHandle, JobPoller};
pub use provider::{OcrProvider, ReplayProvider};
