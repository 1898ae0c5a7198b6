//! Spout flow control

/// Drive signal for the pump or valve behind the spout
pub type Signal = u16;

/// Non-blocking pour control
///
/// Used by the idle maintenance pour; steps pour through their
/// [`CommandExecutor`](super::CommandExecutor) action instead.
pub trait Spout {
    /// Start pouring with `signal` for `duration_ms`
    fn pour(&mut self, duration_ms: u32, signal: Signal);

    /// Stop any running pour
    fn end_pour(&mut self);

    /// A pour is running
    fn is_pouring(&self) -> bool;
}

/// Converts a desired flow rate into a drive signal
pub trait FlowController {
    /// Best signal for `rate` in ml/s, from the calibration table
    fn best_signal_for_rate(&self, rate_ml_per_s: f32) -> Signal;
}
