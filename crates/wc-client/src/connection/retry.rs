//! Bounded reconnect attempts

use wc_core::config::RetryConfig;

/// What to do after recording a reconnect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Keep trying on the next liveness tick
    Continue,
    /// Attempts exhausted; the client must shut down
    Unrecoverable,
}

/// Counts reconnect attempts against a fixed ceiling.
///
/// There is no delay logic here: attempts are paced by the liveness
/// check period.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts recorded so far
    attempts: u32,
    /// Attempts allowed before giving up
    max_attempts: u32,
}

impl RetryPolicy {
    /// Create a policy from configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts)
    }

    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
        }
    }

    /// Record one attempt and decide whether another is allowed
    pub fn record_attempt(&mut self) -> RetryDecision {
        self.attempts = self.attempts.saturating_add(1);

        if self.attempts > self.max_attempts {
            RetryDecision::Unrecoverable
        } else {
            RetryDecision::Continue
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Forget previous attempts
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
