//! Station status as seen by the host

use serde::{Deserialize, Serialize};

/// User-facing status of a station
///
/// The numeric codes are part of the host contract and must stay in sync
/// with the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StationStatus {
    /// No recipe, ready to accept one
    #[default]
    Free,
    /// Recipe queued, waiting for the user to confirm the soak
    ConfirmingSoak,
    /// Soak step mapped or pouring
    Soaking,
    /// Waiting for the user to confirm the attacks
    ConfirmingAttacks,
    /// Attack steps mapped or pouring
    Attacking,
    /// All pours done, waiting for the finalization period
    Finalizing,
    /// Coffee is ready to be collected
    Ready,
}

// Wire format values
const STATUS_FREE: u8 = 0;
const STATUS_CONFIRMING_SOAK: u8 = 1;
const STATUS_SOAKING: u8 = 2;
const STATUS_CONFIRMING_ATTACKS: u8 = 3;
const STATUS_ATTACKING: u8 = 4;
const STATUS_FINALIZING: u8 = 5;
const STATUS_READY: u8 = 6;

impl StationStatus {
    /// Parse a status from its wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            STATUS_FREE => Some(StationStatus::Free),
            STATUS_CONFIRMING_SOAK => Some(StationStatus::ConfirmingSoak),
            STATUS_SOAKING => Some(StationStatus::Soaking),
            STATUS_CONFIRMING_ATTACKS => Some(StationStatus::ConfirmingAttacks),
            STATUS_ATTACKING => Some(StationStatus::Attacking),
            STATUS_FINALIZING => Some(StationStatus::Finalizing),
            STATUS_READY => Some(StationStatus::Ready),
            _ => None,
        }
    }

    /// Convert to wire code
    pub fn to_code(self) -> u8 {
        match self {
            StationStatus::Free => STATUS_FREE,
            StationStatus::ConfirmingSoak => STATUS_CONFIRMING_SOAK,
            StationStatus::Soaking => STATUS_SOAKING,
            StationStatus::ConfirmingAttacks => STATUS_CONFIRMING_ATTACKS,
            StationStatus::Attacking => STATUS_ATTACKING,
            StationStatus::Finalizing => STATUS_FINALIZING,
            StationStatus::Ready => STATUS_READY,
        }
    }

    /// Station is waiting for the user to confirm the next phase
    pub fn is_confirming(&self) -> bool {
        matches!(
            self,
            StationStatus::ConfirmingSoak | StationStatus::ConfirmingAttacks
        )
    }

    /// Station is waiting for any kind of user input
    pub fn awaits_user(&self) -> bool {
        self.is_confirming() || *self == StationStatus::Ready
    }

    /// Station has pours mapped on the shared timeline
    pub fn is_pouring_phase(&self) -> bool {
        matches!(self, StationStatus::Soaking | StationStatus::Attacking)
    }
}
