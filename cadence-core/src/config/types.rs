//! Configuration type definitions

use crate::time::Millis;
use crate::MAX_STATIONS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default minimum time the spout needs to move between stations
pub const DEFAULT_TRAVEL_MARGIN_MS: Millis = 1000;

/// Errors loading or storing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Document could not be parsed
    Parse,
    /// Station count outside `1..=MAX_STATIONS`
    InvalidStationCount,
    /// Travel margin must be non-zero
    InvalidTravelMargin,
    /// Buffer too small to hold the encoded configuration
    BufferTooSmall,
}

/// Timeline mapping parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Minimum separation between steps of different stations (ms)
    pub travel_margin_ms: Millis,
    /// Delay added when a recipe starts on an empty timeline (ms)
    pub computation_margin_ms: Millis,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            travel_margin_ms: DEFAULT_TRAVEL_MARGIN_MS,
            computation_margin_ms: 0,
        }
    }
}

/// Idle maintenance pour (keeps the hose warm)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaintenanceConfig {
    /// Run the maintenance pour at all
    pub enabled: bool,
    /// Idle time before the pour starts (ms)
    pub inactivity_threshold_ms: Millis,
    /// Pour duration (ms)
    pub pour_duration_ms: Millis,
    /// Target flow during the pour (ml/s)
    pub pour_rate_ml_per_s: f32,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inactivity_threshold_ms: 5 * 60 * 1000,
            pour_duration_ms: 60 * 1000,
            pour_rate_ml_per_s: 10.0,
        }
    }
}

/// Station button timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Hold time that cancels a station's recipe (ms)
    pub cancel_hold_ms: Millis,
    /// Minimum time between two accepted clicks (ms)
    pub debounce_ms: Millis,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            cancel_hold_ms: 3000,
            debounce_ms: 1000,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineConfig {
    /// Number of stations installed
    pub station_count: u8,
    pub scheduler: SchedulerConfig,
    pub maintenance: MaintenanceConfig,
    pub input: InputConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            station_count: 3,
            scheduler: SchedulerConfig::default(),
            maintenance: MaintenanceConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Check values the scheduler depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.station_count as usize;
        if count == 0 || count > MAX_STATIONS {
            return Err(ConfigError::InvalidStationCount);
        }
        if self.scheduler.travel_margin_ms == 0 {
            return Err(ConfigError::InvalidTravelMargin);
        }
        Ok(())
    }

    /// Encode for storage as postcard binary data
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::BufferTooSmall)
    }

    /// Decode from postcard binary data
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}
