//! Tick arithmetic
//!
//! All scheduling uses one monotonically increasing millisecond counter.
//! Zero doubles as the "unset" sentinel for absolute ticks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Milliseconds, absolute (ticks) or relative (durations)
pub type Millis = u32;

/// Unset absolute tick
pub const UNSET: Millis = 0;

/// `timer` is set and `now` has reached it
///
/// Keeps unsigned subtraction from underflowing at call sites.
pub fn tick_has_happened(timer: Millis, now: Millis) -> bool {
    timer != UNSET && now >= timer
}

/// A restartable stopwatch over the tick counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timer {
    started_at: Option<Millis>,
}

impl Timer {
    /// A stopped timer
    pub const fn new() -> Self {
        Self { started_at: None }
    }

    /// A timer already running since `now`
    pub const fn started(now: Millis) -> Self {
        Self {
            started_at: Some(now),
        }
    }

    /// Start (or restart) the timer at `now`
    pub fn start(&mut self, now: Millis) {
        self.started_at = Some(now);
    }

    /// Alias for [`Timer::start`] on a running timer
    pub fn restart(&mut self, now: Millis) {
        self.start(now);
    }

    /// Stop the timer
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Start when `on` and stopped, stop when not `on`
    pub fn toggle_based_on(&mut self, on: bool, now: Millis) {
        match (on, self.started_at) {
            (true, None) => self.started_at = Some(now),
            (false, Some(_)) => self.started_at = None,
            _ => {}
        }
    }

    /// Timer is running
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since start, zero if stopped
    pub fn elapsed(&self, now: Millis) -> Millis {
        self.started_at
            .map(|start| now.saturating_sub(start))
            .unwrap_or(0)
    }

    /// Timer is running and at least `duration` has passed
    pub fn has_elapsed(&self, duration: Millis, now: Millis) -> bool {
        self.is_active() && self.elapsed(now) >= duration
    }
}
