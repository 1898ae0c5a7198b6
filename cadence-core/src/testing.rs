//! Simulated machine for unit tests

use std::string::String;
use std::vec::Vec;

use cadence_protocol::{StatusEvent, StepDescription};

use crate::time::Millis;
use crate::traits::{
    Clock, CommandExecutor, FlowController, Inbox, Motion, Reporter, Signal, Spout,
    StationInputs,
};
use crate::MAX_STATIONS;

/// Clock advances on travel and on every executed action
///
/// Actions end with their pour time in ms (`"POUR 6000"`).
pub struct TestBoard {
    pub now: Millis,
    pub travel_ms: Millis,
    pub events: Vec<StatusEvent>,
    pub travels: Vec<usize>,
    pub executed: Vec<String>,
    pub cancel_during_next: Option<usize>,
    pub confirm_during_next: Option<usize>,
    pub pouring: bool,
    pub homed: u32,
    pub at_waste: u32,
    pub invalidations: u32,
    pub buttons: [bool; MAX_STATIONS],
    location: Option<usize>,
}

impl TestBoard {
    pub fn new(now: Millis) -> Self {
        Self {
            now,
            travel_ms: 0,
            events: Vec::new(),
            travels: Vec::new(),
            executed: Vec::new(),
            cancel_during_next: None,
            confirm_during_next: None,
            pouring: false,
            homed: 0,
            at_waste: 0,
            invalidations: 0,
            buttons: [false; MAX_STATIONS],
            location: None,
        }
    }
}

pub fn pour(duration: Millis, interval: Millis) -> StepDescription {
    let action = std::format!("POUR {}", duration);
    StepDescription::new(duration, interval, &action).unwrap()
}

impl Clock for TestBoard {
    fn now_ms(&self) -> Millis {
        self.now
    }
}

impl Motion for TestBoard {
    fn travel_to_station(&mut self, index: usize, _offset: f32) {
        if self.location != Some(index) {
            self.now += self.travel_ms;
            self.location = Some(index);
        }
        self.travels.push(index);
    }

    fn travel_to_waste(&mut self) {
        self.location = None;
        self.at_waste += 1;
    }

    fn home(&mut self) {
        self.homed += 1;
    }

    fn finish_pending_motion(&mut self) {}

    fn invalidate_location(&mut self) {
        self.location = None;
        self.invalidations += 1;
    }
}

impl CommandExecutor for TestBoard {
    fn execute(&mut self, action: &str, inbox: &mut Inbox) {
        let duration: Millis = action
            .rsplit(' ')
            .next()
            .and_then(|text| text.parse().ok())
            .unwrap_or(0);
        self.now += duration;
        self.executed.push(action.into());

        if let Some(station) = self.cancel_during_next.take() {
            inbox.request_cancel(station);
        }
        if let Some(station) = self.confirm_during_next.take() {
            inbox.request_confirm(station);
        }
    }
}

impl Spout for TestBoard {
    fn pour(&mut self, _duration_ms: u32, _signal: Signal) {
        self.pouring = true;
    }

    fn end_pour(&mut self) {
        self.pouring = false;
    }

    fn is_pouring(&self) -> bool {
        self.pouring
    }
}

impl FlowController for TestBoard {
    fn best_signal_for_rate(&self, rate_ml_per_s: f32) -> Signal {
        (rate_ml_per_s * 100.0) as Signal
    }
}

impl Reporter for TestBoard {
    fn report(&mut self, event: &StatusEvent) {
        self.events.push(event.clone());
    }
}

impl StationInputs for TestBoard {
    fn is_button_held(&self, index: usize) -> bool {
        self.buttons[index]
    }
}
