//! Reconnection policy.
//!
//! The runner feeds every failed session into [`ReconnectPolicy::on_failure`]
//! and follows the returned [`ReconnectDecision`].

use std::time::Duration;

use crate::error::ClientError;

/// Consecutive failed attempts tolerated before giving up
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
/// Pause before each reconnect attempt
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// What the runner does after a session fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Wait `delay`, then make attempt number `attempt`
    Retry { attempt: u32, delay: Duration },
    /// The attempt budget is spent
    GiveUp,
    /// Retrying cannot succeed (the `client_id` is taken)
    Exit,
}

#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    max_attempts: u32,
    interval: Duration,
    failures: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(MAX_RECONNECT_ATTEMPTS, RECONNECT_INTERVAL)
    }
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            failures: 0,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Record a failed session and decide whether to try again.
    ///
    /// A lost connection means the previous attempt did connect, so the
    /// failure count starts over from that loss.
    pub fn on_failure(&mut self, error: &ClientError) -> ReconnectDecision {
        match error {
            ClientError::ClientIdInUse(_) => return ReconnectDecision::Exit,
            ClientError::ConnectionLost => self.failures = 1,
            ClientError::Unreachable { .. } | ClientError::InvalidStateFrame(_) => {
                self.failures += 1
            }
        }

        if self.failures >= self.max_attempts {
            ReconnectDecision::GiveUp
        } else {
            ReconnectDecision::Retry {
                attempt: self.failures + 1,
                delay: self.interval,
            }
        }
    }
}
