//! Countdown timer state machine.
//!
//! While running, the remaining time is derived from `end_at - now`; the stored
//! `remaining` is only a cache refreshed on every tick or query. While stopped,
//! the stored `remaining` is authoritative and `end_at` is unused.

use crate::domain::{
    error::ClockError,
    value_object::{DurationMs, Timestamp},
};

/// Default countdown length: six hours
pub const DEFAULT_DURATION_MS: u64 = 6 * 60 * 60 * 1000;

/// Result of one periodic re-evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down
    Running,
    /// Reached zero during this tick and stopped itself
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    remaining: DurationMs,
    running: bool,
    end_at: Option<Timestamp>,
    default_duration: DurationMs,
}

impl Countdown {
    /// Create a stopped countdown holding `default_duration`
    pub fn new(default_duration: DurationMs) -> Self {
        Self {
            remaining: default_duration,
            running: false,
            end_at: None,
            default_duration,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn default_duration(&self) -> DurationMs {
        self.default_duration
    }

    /// Remaining time as of `now`
    pub fn remaining_at(&self, now: Timestamp) -> DurationMs {
        match (self.running, self.end_at) {
            (true, Some(end_at)) => end_at.remaining_from(now),
            _ => self.remaining,
        }
    }

    pub fn start(&mut self, now: Timestamp) -> Result<(), ClockError> {
        if self.running {
            return Err(ClockError::AlreadyRunning);
        }
        if self.remaining == DurationMs::ZERO {
            return Err(ClockError::NothingRemaining);
        }
        self.running = true;
        self.end_at = Some(now.after(self.remaining));
        Ok(())
    }

    pub fn pause(&mut self, now: Timestamp) -> Result<(), ClockError> {
        if !self.running {
            return Err(ClockError::NotRunning);
        }
        self.remaining = self.remaining_at(now);
        self.running = false;
        self.end_at = None;
        Ok(())
    }

    /// Stop and load `duration`, or the default duration when `None`
    pub fn reset(&mut self, duration: Option<DurationMs>) {
        self.remaining = duration.unwrap_or(self.default_duration);
        self.running = false;
        self.end_at = None;
    }

    /// Replace the remaining time, re-anchoring `end_at` if running
    pub fn set_remaining(&mut self, duration: DurationMs, now: Timestamp) {
        self.remaining = duration;
        if self.running {
            self.end_at = Some(now.after(duration));
        }
    }

    pub fn tick(&mut self, now: Timestamp) -> Result<TickOutcome, ClockError> {
        if !self.running {
            return Err(ClockError::NotRunning);
        }
        self.remaining = self.remaining_at(now);
        if self.remaining == DurationMs::ZERO {
            self.running = false;
            self.end_at = None;
            return Ok(TickOutcome::Expired);
        }
        Ok(TickOutcome::Running)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DurationMs::new(DEFAULT_DURATION_MS))
    }
}
