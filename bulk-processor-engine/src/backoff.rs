//! Retry policies for failed bulk commits.

use std::fmt::Debug;
use std::time::Duration;

/// Decides how long to wait before retrying a failed commit.
///
/// `retry` is the 1-based number of the retry about to be attempted.
/// Returning `None` stops retrying and the last error is reported.
pub trait Backoff: Debug + Send + Sync {
    fn next(&self, retry: u32) -> Option<Duration>;
}

/// Never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopBackoff;

impl Backoff for StopBackoff {
    fn next(&self, _retry: u32) -> Option<Duration> {
        None
    }
}

/// Waits the same interval before every retry.
#[derive(Debug, Clone)]
pub struct ConstantBackoff {
    interval: Duration,
    max_retries: Option<u32>,
}

impl ConstantBackoff {
    /// Retry forever with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_retries: None,
        }
    }

    /// Give up after `max_retries` retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }
}

impl Backoff for ConstantBackoff {
    fn next(&self, retry: u32) -> Option<Duration> {
        match self.max_retries {
            Some(max) if retry > max => None,
            _ => Some(self.interval),
        }
    }
}

/// Doubles the delay on each retry, starting from `initial`.
///
/// Retrying stops as soon as the computed delay reaches `max`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), Duration::from_secs(10))
    }
}

impl Backoff for ExponentialBackoff {
    fn next(&self, retry: u32) -> Option<Duration> {
        let factor = 1u32.checked_shl(retry.saturating_sub(1))?;
        let delay = self.initial.checked_mul(factor)?;
        (delay < self.max).then_some(delay)
    }
}
