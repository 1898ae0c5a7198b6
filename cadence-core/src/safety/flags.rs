//! Interrupt-safe alarm flags

use core::sync::atomic::{AtomicBool, Ordering};

use cadence_protocol::AlarmReason;

/// One flag per [`AlarmReason`]
///
/// Only plain loads and stores are used, so this works on cores without
/// compare-and-swap.
#[derive(Debug, Default)]
pub struct AlarmFlags {
    raised: [AtomicBool; AlarmReason::COUNT],
}

impl AlarmFlags {
    pub const fn new() -> Self {
        Self {
            raised: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    pub fn raise(&self, reason: AlarmReason) {
        self.raised[reason.index()].store(true, Ordering::Release);
    }

    pub fn clear(&self, reason: AlarmReason) {
        self.raised[reason.index()].store(false, Ordering::Release);
    }

    pub fn is_raised(&self, reason: AlarmReason) -> bool {
        self.raised[reason.index()].load(Ordering::Acquire)
    }
}
