//! Exponential backoff schedule.

use super::PollOptions;
use std::time::Duration;

/// Capped exponential delay sequence: `5, 10, 20, 40, 60, 60, ...` seconds
/// with default options.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
    multiplier: u32,
}

impl Backoff {
    /// Create a schedule from poll options.
    pub fn new(options: &PollOptions) -> Self {
        Self {
            next: options.initial_delay.min(options.max_delay),
            max: options.max_delay,
            multiplier: options.multiplier.max(1),
        }
    }

    /// Peek at the next delay without advancing.
    pub fn peek(&self) -> Duration {
        self.next
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = current
            .checked_mul(self.multiplier)
            .map_or(self.max, |d| d.min(self.max));
        Some(current)
    }
}
