//! Idle hose warming
//!
//! After a long idle period the water left in the hose has cooled and the
//! first pour comes out wrong. The spout is sent to the waste position
//! and pours for a while to warm it back up. A recipe being mapped ends
//! the pour early.

use cadence_protocol::{MaintenanceUpdate, StatusEvent};

use crate::config::MaintenanceConfig;
use crate::time::{Millis, Timer};
use crate::traits::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    #[default]
    Waiting,
    Pouring,
}

/// Maintenance pour state plus the queue's inactivity timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoseWarmer {
    state: State,
    /// Time since the last activity while waiting, pour time while pouring
    timer: Timer,
}

impl HoseWarmer {
    pub const fn new() -> Self {
        Self {
            state: State::Waiting,
            timer: Timer::new(),
        }
    }

    pub fn is_pouring(&self) -> bool {
        self.state == State::Pouring
    }

    /// Something happened on the timeline
    pub fn note_activity(&mut self, now: Millis) {
        if self.state == State::Waiting {
            self.timer.restart(now);
        }
    }

    pub fn tick<B>(&mut self, board: &mut B, idle: bool, config: &MaintenanceConfig)
    where
        B: Board + ?Sized,
    {
        let now = board.now_ms();
        match self.state {
            State::Waiting => {
                if !idle || !self.timer.is_active() {
                    self.timer.restart(now);
                    return;
                }
                if config.enabled && self.timer.has_elapsed(config.inactivity_threshold_ms, now) {
                    self.start(board, config);
                }
            }
            State::Pouring => {
                if self.timer.has_elapsed(config.pour_duration_ms, now) {
                    info!("hose warmed");
                    self.finish(board);
                }
            }
        }
    }

    /// Stop the pour if one is running
    pub fn abort<B>(&mut self, board: &mut B)
    where
        B: Board + ?Sized,
    {
        if self.state != State::Pouring {
            return;
        }
        if board.is_pouring() {
            board.end_pour();
        }
        debug!("hose warming interrupted");
        self.finish(board);
    }

    fn start<B>(&mut self, board: &mut B, config: &MaintenanceConfig)
    where
        B: Board + ?Sized,
    {
        info!("warming hose after inactivity");
        board.report(&StatusEvent::Maintenance(MaintenanceUpdate { heating_hose: true }));
        self.state = State::Pouring;

        board.home();
        board.travel_to_waste();
        let signal = board.best_signal_for_rate(config.pour_rate_ml_per_s);
        board.pour(config.pour_duration_ms, signal);

        self.timer.restart(board.now_ms());
    }

    fn finish<B>(&mut self, board: &mut B)
    where
        B: Board + ?Sized,
    {
        board.report(&StatusEvent::Maintenance(MaintenanceUpdate { heating_hose: false }));
        self.state = State::Waiting;
        self.timer.restart(board.now_ms());
    }
}
