//! Station button handling

use crate::config::InputConfig;
use crate::time::{Millis, Timer};

/// What a button did during one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Pressed and released before the cancel hold time
    Click,
    /// Held for the cancel hold time (once per press)
    LongHold,
}

/// Click and long-hold detection for one button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    held: Timer,
    last_click: Option<Millis>,
    long_hold_fired: bool,
}

impl Button {
    pub const fn new() -> Self {
        Self {
            held: Timer::new(),
            last_click: None,
            long_hold_fired: false,
        }
    }

    /// Feed the current button level
    pub fn update(&mut self, held: bool, now: Millis, config: &InputConfig) -> Option<ButtonAction> {
        // a release after a long hold is not a click
        let released = !held && self.held.is_active();
        let clicked = released && self.held.elapsed(now) < config.cancel_hold_ms;

        let mut action = None;
        if clicked && self.debounced(now, config.debounce_ms) {
            self.last_click = Some(now);
            action = Some(ButtonAction::Click);
        }

        self.held.toggle_based_on(held, now);

        if !held {
            self.long_hold_fired = false;
        } else if !self.long_hold_fired && self.held.has_elapsed(config.cancel_hold_ms, now) {
            self.long_hold_fired = true;
            action = Some(ButtonAction::LongHold);
        }

        action
    }

    fn debounced(&self, now: Millis, debounce: Millis) -> bool {
        self.last_click
            .map(|last| now.saturating_sub(last) >= debounce)
            .unwrap_or(true)
    }
}
