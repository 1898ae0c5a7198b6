//! Step command execution

use heapless::Vec;

use crate::MAX_STATIONS;

/// Runs a step's action
pub trait CommandExecutor {
    /// Perform `action`, blocking until it has finished
    ///
    /// The queue cannot be re-entered while an action runs. Requests that
    /// arrive in the meantime (a cancel button, a host command) are posted
    /// to `inbox` and applied as soon as this call returns.
    fn execute(&mut self, action: &str, inbox: &mut Inbox);
}

/// Requests collected while a step is being dispatched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inbox {
    cancels: Vec<usize, MAX_STATIONS>,
    confirms: Vec<usize, MAX_STATIONS>,
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            cancels: Vec::new(),
            confirms: Vec::new(),
        }
    }

    /// Ask for the recipe of `station` to be cancelled
    ///
    /// Returns `false` if the request was already posted or is out of range.
    pub fn request_cancel(&mut self, station: usize) -> bool {
        Self::post(&mut self.cancels, station)
    }

    /// Ask for the pending confirmation of `station` to be accepted
    pub fn request_confirm(&mut self, station: usize) -> bool {
        Self::post(&mut self.confirms, station)
    }

    pub fn cancels(&self) -> &[usize] {
        &self.cancels
    }

    pub fn confirms(&self) -> &[usize] {
        &self.confirms
    }

    pub fn is_empty(&self) -> bool {
        self.cancels.is_empty() && self.confirms.is_empty()
    }

    fn post(list: &mut Vec<usize, MAX_STATIONS>, station: usize) -> bool {
        if station >= MAX_STATIONS || list.contains(&station) {
            return false;
        }
        list.push(station).is_ok()
    }
}
