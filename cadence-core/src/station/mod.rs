//! Stations
//!
//! A station is a physical brewing slot. It owns no scheduling logic: it
//! holds the user-facing status, the blocked flag and its button state,
//! and reports every status change to the host.

pub mod button;
pub mod events;

pub use button::{Button, ButtonAction};
pub use events::{next_status, StationEvent};

use cadence_protocol::{StationStatus, StationUpdate, StatusEvent};

use crate::config::InputConfig;
use crate::error::RequestError;
use crate::time::Millis;
use crate::traits::Reporter;
use crate::MAX_STATIONS;

/// One brewing slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Station {
    index: usize,
    status: StationStatus,
    blocked: bool,
    button: Button,
}

impl Station {
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            status: StationStatus::Free,
            blocked: false,
            button: Button::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn status(&self) -> StationStatus {
        self.status
    }

    pub fn is_free(&self) -> bool {
        self.status == StationStatus::Free
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        if self.blocked == blocked {
            return;
        }
        self.blocked = blocked;
        debug!("station {} blocked: {}", self.index, blocked);
    }

    /// Waiting for the user to confirm the soak or the attacks
    pub fn awaits_confirmation(&self) -> bool {
        self.status.is_confirming()
    }

    /// Drive the status machine, reporting the new status
    ///
    /// Returns `false` (and changes nothing) if `event` is not valid in the
    /// current status.
    pub fn apply<R>(&mut self, event: StationEvent, recipe_id: Option<u32>, reporter: &mut R) -> bool
    where
        R: Reporter + ?Sized,
    {
        let Some(next) = next_status(self.status, event) else {
            warn!(
                "station {}: {} not valid in status {}",
                self.index,
                event,
                self.status
            );
            return false;
        };

        if next != self.status {
            self.status = next;
            trace!("station {} -> {}", self.index, next);
            reporter.report(&StatusEvent::Station(StationUpdate {
                station: self.index as u8,
                status: next,
                recipe_id,
            }));
        }
        true
    }

    /// Poll the button
    pub fn update_button(&mut self, held: bool, now: Millis, config: &InputConfig) -> Option<ButtonAction> {
        self.button.update(held, now, config)
    }
}

/// The fixed set of stations on the machine
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stations {
    list: [Station; MAX_STATIONS],
    count: usize,
}

impl Default for Stations {
    fn default() -> Self {
        Self::new()
    }
}

impl Stations {
    /// No stations until [`Stations::initialize`] is called
    pub const fn new() -> Self {
        Self {
            list: [
                Station::new(0),
                Station::new(1),
                Station::new(2),
                Station::new(3),
                Station::new(4),
            ],
            count: 0,
        }
    }

    /// Set how many stations the machine has
    ///
    /// Allowed again later only while every station is Free.
    pub fn initialize(&mut self, count: usize) -> Result<(), RequestError> {
        if count == 0 || count > MAX_STATIONS {
            return Err(RequestError::InvalidStationCount(count));
        }
        if self.iter().any(|station| !station.is_free()) {
            return Err(RequestError::AlreadyInitialized);
        }

        for (index, station) in self.list.iter_mut().enumerate() {
            *station = Station::new(index);
        }
        self.count = count;
        info!("machine uses {} stations", count);
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn get(&self, index: usize) -> Result<&Station, RequestError> {
        self.list[..self.count]
            .get(index)
            .ok_or(RequestError::InvalidStation(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Station, RequestError> {
        self.list[..self.count]
            .get_mut(index)
            .ok_or(RequestError::InvalidStation(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.list[..self.count].iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Station> {
        self.list[..self.count].iter_mut()
    }

    /// Block every station whose bit in `available_mask` is clear
    pub fn set_availability(&mut self, available_mask: u8) {
        for station in self.iter_mut() {
            let available = available_mask & (1 << station.index()) != 0;
            station.set_blocked(!available);
        }
    }
}
