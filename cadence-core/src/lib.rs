//! Board-agnostic recipe scheduling core for multi-station brewers
//!
//! Several brewing stations share one motorized spout. This crate keeps
//! every station's recipe on a single collision-free timeline and
//! arbitrates the spout between them:
//!
//! - Recipe data model (steps, soak/attack progression)
//! - Station status machine and button input
//! - Recipe queue: timeline mapping, single-flight execution,
//!   missed-deadline compensation, post-cancellation re-optimization
//! - Idle maintenance pour
//! - Safety interlock
//! - Configuration type definitions
//!
//! Hardware (motion, spout, command execution, host link) is reached
//! only through the traits in [`traits`].

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "toml")]
extern crate alloc;
#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod error;
pub mod queue;
pub mod recipe;
pub mod safety;
pub mod station;
pub mod time;
pub mod traits;

#[cfg(test)]
mod testing;

pub use cadence_protocol as protocol;
pub use cadence_protocol::{StationStatus, MAX_ACTION_LEN, MAX_ATTACKS, MAX_STATIONS};
pub use controller::Controller;
pub use error::RequestError;
pub use queue::RecipeQueue;
pub use recipe::{Recipe, Step};
pub use station::{Station, Stations};
pub use time::Millis;
