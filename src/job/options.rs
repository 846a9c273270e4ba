//! Polling options and configuration.

use std::time::Duration;

/// Default delay before the second status call.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);

/// Default upper bound for a single delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Default overall time budget, measured from the start of polling.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60 * 60);

/// Options for polling an analysis job.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOptions {
    /// Delay after the first non-terminal response
    pub initial_delay: Duration,

    /// Cap for any single delay
    pub max_delay: Duration,

    /// Growth factor applied after each non-terminal response
    pub multiplier: u32,

    /// Overall time budget
    pub max_wait: Duration,
}

impl PollOptions {
    /// Create new poll options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the growth factor (values below 1 are treated as 1).
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier.max(1);
        self
    }

    /// Set the overall time budget.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: 2,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}
