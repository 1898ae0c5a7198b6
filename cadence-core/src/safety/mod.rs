//! Safety interlock
//!
//! Alarm sources (level sensor, boiler supervision) raise flags from any
//! context; the monitor consumes them on the next tick.

pub mod flags;
pub mod monitor;

pub use flags::AlarmFlags;
pub use monitor::{SafetyMonitor, SafetyStatus};
