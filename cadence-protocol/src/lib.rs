//! Host communication vocabulary
//!
//! This crate defines the messages exchanged between the brewer core and
//! the remote host (app or serial console):
//!
//! - Host → Core: [`HostCommand`]s (schedule, confirm, cancel, query...)
//! - Core → Host: [`StatusEvent`]s (station status, step progress, queue info)
//!
//! Messages are plain serde types. [`codec`] frames them with postcard's
//! COBS flavor so any byte transport can carry them:
//! ```text
//! ┌──────────────────────────────┬──────┐
//! │ COBS(postcard(message))      │ 0x00 │
//! └──────────────────────────────┴──────┘
//! ```
//!
//! The transport itself is not part of this crate.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod codec;
pub mod messages;
pub mod recipe;
pub mod status;

pub use codec::{decode_command, decode_event, encode_command, encode_event, CodecError};
pub use messages::{
    AlarmReason, HostCommand, MaintenanceUpdate, QueueInfo, RejectReason, RequestRejected,
    SafetyUpdate, StationInfo, StationList, StationUpdate, StatusEvent, StepProgress,
};
pub use recipe::{RecipeDescription, RecipeError, StepDescription};
pub use status::StationStatus;

/// Maximum number of stations a machine can have
pub const MAX_STATIONS: usize = 5;

/// Maximum attack (pour) steps per recipe
pub const MAX_ATTACKS: usize = 10;

/// Maximum length of a step's action text
pub const MAX_ACTION_LEN: usize = 48;
