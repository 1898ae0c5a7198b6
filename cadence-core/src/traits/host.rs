//! Time source, host reporting and station inputs

use cadence_protocol::StatusEvent;

use crate::time::Millis;

/// Monotonic millisecond clock
///
/// Must never return [`UNSET`](crate::time::UNSET) once the machine is running.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Sink for status events sent to the host
pub trait Reporter {
    fn report(&mut self, event: &StatusEvent);
}

/// Station buttons
pub trait StationInputs {
    /// The button of station `index` is currently pressed
    fn is_button_held(&self, index: usize) -> bool;
}
