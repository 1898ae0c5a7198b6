//! Spout positioning

/// Moves the shared spout between stations
///
/// All travel is blocking.
pub trait Motion {
    /// Travel to a station, `offset` in mm from its centre
    fn travel_to_station(&mut self, index: usize, offset: f32);

    /// Travel to the waste (purge) position
    fn travel_to_waste(&mut self);

    /// Run the homing sequence
    fn home(&mut self);

    /// Block until any queued movement has completed
    fn finish_pending_motion(&mut self);

    /// Forget the cached position so the next travel cannot be skipped
    ///
    /// Used when a step is abandoned mid-pour and the spout may have
    /// been left anywhere.
    fn invalidate_location(&mut self);
}
