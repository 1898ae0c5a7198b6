//! Steps and the collision predicate

use heapless::String;

use cadence_protocol::StepDescription;

use crate::time::{Millis, UNSET};
use crate::MAX_ACTION_LEN;

/// Opaque command text handed to the executor
pub type Action = String<MAX_ACTION_LEN>;

/// Time occupied by one pour on the shared timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Span {
    pub start: Millis,
    pub end: Millis,
}

impl Span {
    pub const fn new(start: Millis, duration: Millis) -> Self {
        Self {
            start,
            end: start.saturating_add(duration),
        }
    }

    /// Two pours cannot both be served by one spout
    ///
    /// They collide when they share a start or an end, overlap, or leave
    /// less than `travel_margin` between the end of one and the start of
    /// the other. A gap of exactly `travel_margin` is allowed.
    pub fn collides_with(&self, other: &Span, travel_margin: Millis) -> bool {
        self.collides_one_way(other, travel_margin) || other.collides_one_way(self, travel_margin)
    }

    // Only looks at `other` starting at or after `self`
    fn collides_one_way(&self, other: &Span, travel_margin: Millis) -> bool {
        if self.start == other.start || self.end == other.end {
            return true;
        }
        if self.start <= other.start && self.end >= other.start {
            return true;
        }
        self.end < other.start && other.start - self.end < travel_margin
    }
}

/// Smallest schedulable unit of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Absolute start, [`UNSET`] while unmapped
    pub start_tick: Millis,
    /// Pour duration
    pub duration: Millis,
    /// Rest before the next step, zero for the last one
    pub interval: Millis,
    pub action: Action,
}

impl Step {
    pub fn new(duration: Millis, interval: Millis, action: Action) -> Self {
        Self {
            start_tick: UNSET,
            duration,
            interval,
            action,
        }
    }

    pub fn from_description(description: &StepDescription) -> Self {
        Self::new(
            description.duration_ms,
            description.interval_ms,
            description.action.clone(),
        )
    }

    pub fn is_mapped(&self) -> bool {
        self.start_tick != UNSET
    }

    /// End of the pour, [`UNSET`] while unmapped
    pub fn end_tick(&self) -> Millis {
        if self.is_mapped() {
            self.start_tick.saturating_add(self.duration)
        } else {
            UNSET
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_tick, self.duration)
    }

    pub fn collides_with(&self, other: &Step, travel_margin: Millis) -> bool {
        self.span().collides_with(&other.span(), travel_margin)
    }
}
