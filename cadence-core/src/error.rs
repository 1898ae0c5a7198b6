//! Request errors
//!
//! Every request that is dropped leaves the queue and stations untouched.

use cadence_protocol::{RecipeError, RejectReason};

/// Why a scheduling request was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Station index outside the initialized range
    InvalidStation(usize),
    /// Station is not Free
    StationBusy(usize),
    /// Station was administratively disabled
    StationBlocked(usize),
    /// Station already holds a queued recipe
    AlreadyQueued(usize),
    /// Station has no active recipe
    NotQueued(usize),
    /// Station is not waiting for a confirmation
    NotAwaitingConfirmation(usize),
    /// Remaining steps already have start ticks
    AlreadyMapped(usize),
    /// Every slot is taken
    QueueFull,
    /// Host description cannot be run
    InvalidRecipe(RecipeError),
    /// Safety interlock is latched
    Faulted,
    /// Station count outside `1..=MAX_STATIONS`
    InvalidStationCount(usize),
    /// Stations cannot be re-initialized while in use
    AlreadyInitialized,
}

impl RequestError {
    /// Station the request targeted, if any
    pub fn station(&self) -> Option<usize> {
        match *self {
            RequestError::InvalidStation(index)
            | RequestError::StationBusy(index)
            | RequestError::StationBlocked(index)
            | RequestError::AlreadyQueued(index)
            | RequestError::NotQueued(index)
            | RequestError::NotAwaitingConfirmation(index)
            | RequestError::AlreadyMapped(index) => Some(index),
            _ => None,
        }
    }

    /// Host-facing reason code
    pub fn reason(&self) -> RejectReason {
        match self {
            RequestError::InvalidStation(_) => RejectReason::InvalidStation,
            RequestError::StationBusy(_) => RejectReason::StationBusy,
            RequestError::StationBlocked(_) => RejectReason::StationBlocked,
            RequestError::AlreadyQueued(_) => RejectReason::AlreadyQueued,
            RequestError::NotQueued(_) => RejectReason::NotQueued,
            RequestError::NotAwaitingConfirmation(_) => RejectReason::NotAwaitingConfirmation,
            RequestError::AlreadyMapped(_) => RejectReason::AlreadyMapped,
            RequestError::QueueFull => RejectReason::QueueFull,
            RequestError::InvalidRecipe(_) => RejectReason::InvalidRecipe,
            RequestError::Faulted => RejectReason::Faulted,
            RequestError::InvalidStationCount(_) => RejectReason::InvalidStationCount,
            RequestError::AlreadyInitialized => RejectReason::AlreadyInitialized,
        }
    }
}

impl From<RecipeError> for RequestError {
    fn from(error: RecipeError) -> Self {
        RequestError::InvalidRecipe(error)
    }
}
