//! Collaborator traits
//!
//! These traits define the interface between the scheduling core and the
//! machine around it. Every call is synchronous: blocking operations
//! (travel, step dispatch) return only once they have physically finished.

pub mod executor;
pub mod host;
pub mod motion;
pub mod spout;

pub use executor::{CommandExecutor, Inbox};
pub use host::{Clock, Reporter, StationInputs};
pub use motion::Motion;
pub use spout::{FlowController, Signal, Spout};

/// Everything the controller needs from the machine
///
/// Implemented automatically for any type providing all collaborators.
pub trait Board:
    Clock + Motion + CommandExecutor + Spout + FlowController + Reporter + StationInputs
{
}

impl<T> Board for T where
    T: Clock + Motion + CommandExecutor + Spout + FlowController + Reporter + StationInputs
{
}
