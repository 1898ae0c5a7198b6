//! Message types exchanged with the host
//!
//! Message types are divided into two categories:
//! - Host → Core: [`HostCommand`]
//! - Core → Host: [`StatusEvent`]

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::recipe::RecipeDescription;
use crate::status::StationStatus;
use crate::MAX_STATIONS;

/// A list of station indices
pub type StationList = Vec<u8, MAX_STATIONS>;

/// Commands accepted from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand {
    /// Set up the number of stations the machine has
    Initialize { station_count: u8 },
    /// Bit `i` set means station `i` accepts recipes
    SetAvailability { available_mask: u8 },
    /// Queue a recipe for a station
    Schedule {
        station: u8,
        recipe: RecipeDescription,
    },
    /// Queue the standard recipe for every listed station
    ScheduleStandard { stations: StationList },
    /// The user confirmed the next phase of a station
    Confirm { station: u8 },
    /// Cancel the recipes of every listed station
    Cancel { stations: StationList },
    /// Cancel every active recipe
    CancelAll,
    /// Ask for a queue snapshot of the listed stations
    QueryStatus { stations: StationList },
    /// Set or clear the fixed recipe a station runs on a button press
    SetFixedRecipe {
        station: u8,
        recipe: Option<RecipeDescription>,
    },
}

/// Reasons the safety interlock can trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmReason {
    /// Reservoir below the minimum level
    WaterLevelLow,
    /// Boiler exceeded its safe temperature
    BoilerOverTemperature,
    /// Temperature sensor open or shorted
    SensorFault,
}

impl AlarmReason {
    /// Number of alarm reasons
    pub const COUNT: usize = 3;

    /// All reasons, in index order
    pub const ALL: [AlarmReason; Self::COUNT] = [
        AlarmReason::WaterLevelLow,
        AlarmReason::BoilerOverTemperature,
        AlarmReason::SensorFault,
    ];

    /// Stable index of this reason
    pub fn index(self) -> usize {
        match self {
            AlarmReason::WaterLevelLow => 0,
            AlarmReason::BoilerOverTemperature => 1,
            AlarmReason::SensorFault => 2,
        }
    }
}

/// Why a host request was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectReason {
    InvalidStation,
    StationBusy,
    StationBlocked,
    AlreadyQueued,
    NotQueued,
    NotAwaitingConfirmation,
    AlreadyMapped,
    QueueFull,
    InvalidRecipe,
    Faulted,
    InvalidStationCount,
    AlreadyInitialized,
}

/// A station changed status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationUpdate {
    pub station: u8,
    pub status: StationStatus,
    pub recipe_id: Option<u32>,
}

/// A step is about to be dispatched (`done == false`) or just finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepProgress {
    pub station: u8,
    pub step: u8,
    pub done: bool,
    /// Time since the first attack started, once it has
    pub elapsed_attacks_ms: Option<u32>,
}

/// Progress of one station in a queue snapshot
///
/// Fields past `status` are only present while the station holds a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationInfo {
    pub index: u8,
    pub status: StationStatus,
    pub recipe_id: Option<u32>,
    /// Time since the first step started
    pub elapsed_total_ms: Option<u32>,
    /// Time since the first attack started
    pub elapsed_attacks_ms: Option<u32>,
    /// Time spent finalizing
    pub elapsed_finalization_ms: Option<u32>,
    /// Step being poured, or whose rest interval is running
    pub step: Option<u8>,
    /// Time since `step` started pouring
    pub elapsed_step_ms: Option<u32>,
    /// Time since `step` finished pouring
    pub elapsed_interval_ms: Option<u32>,
}

/// Snapshot of the queue
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueInfo {
    /// Station holding the spout, if any
    pub active_station: Option<u8>,
    pub stations: Vec<StationInfo, MAX_STATIONS>,
}

/// Idle maintenance pour started or finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MaintenanceUpdate {
    pub heating_hose: bool,
}

/// Safety interlock raised or released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafetyUpdate {
    pub reason: AlarmReason,
    pub active: bool,
}

/// A host request was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RequestRejected {
    pub station: Option<u8>,
    pub reason: RejectReason,
}

/// Events reported to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusEvent {
    Station(StationUpdate),
    Step(StepProgress),
    Queue(QueueInfo),
    Maintenance(MaintenanceUpdate),
    Safety(SafetyUpdate),
    Rejected(RequestRejected),
}

impl StatusEvent {
    /// Station this event concerns, if any
    pub fn station(&self) -> Option<u8> {
        match self {
            StatusEvent::Station(update) => Some(update.station),
            StatusEvent::Step(progress) => Some(progress.station),
            StatusEvent::Rejected(rejected) => rejected.station,
            StatusEvent::Queue(_) | StatusEvent::Maintenance(_) | StatusEvent::Safety(_) => None,
        }
    }
}
