//! Debounced auto-save.
//!
//! A clock-agnostic state machine: callers pass the current [`Instant`] in, so
//! the host decides how it is driven (a UI tick, a timer thread) and tests
//! never sleep.

use std::time::{Duration, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// At most one pending save; each edit pushes the deadline back.
#[derive(Debug, Clone)]
pub struct AutoSave {
    enabled: bool,
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(true, DEFAULT_DELAY)
    }
}

impl AutoSave {
    pub fn new(enabled: bool, delay: Duration) -> Self {
        Self { enabled, delay, deadline: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Turns auto-save on or off. Disabling drops any pending save.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.deadline = None;
        }
    }

    /// Records an edit at `now`, (re)scheduling the save one delay later.
    /// Does nothing while disabled.
    pub fn touch(&mut self, now: Instant) {
        if self.enabled {
            self.deadline = Some(now + self.delay);
        }
    }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
