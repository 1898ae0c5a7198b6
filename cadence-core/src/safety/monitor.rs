//! Safety monitor implementation
//!
//! Tracks which alarm reasons are active and reports transitions.

use heapless::Vec;

use cadence_protocol::{AlarmReason, SafetyUpdate};

use super::AlarmFlags;

/// Overall interlock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// No alarm active
    Ok,
    /// At least one alarm active; the first in index order
    Fault(AlarmReason),
}

/// Changes observed by one [`SafetyMonitor::poll`]
pub type SafetyTransitions = Vec<SafetyUpdate, { AlarmReason::COUNT }>;

/// Latches raised alarms until their flag clears
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafetyMonitor {
    active: [bool; AlarmReason::COUNT],
    enabled: [bool; AlarmReason::COUNT],
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyMonitor {
    /// Every reason enabled, none active
    pub const fn new() -> Self {
        Self {
            active: [false; AlarmReason::COUNT],
            enabled: [true; AlarmReason::COUNT],
        }
    }

    /// Ignore or honour a reason
    ///
    /// Disabling an active reason releases it on the next poll.
    pub fn set_enabled(&mut self, reason: AlarmReason, enabled: bool) {
        self.enabled[reason.index()] = enabled;
    }

    pub fn is_enabled(&self, reason: AlarmReason) -> bool {
        self.enabled[reason.index()]
    }

    /// Read the flags and return every reason that changed state
    pub fn poll(&mut self, flags: &AlarmFlags) -> SafetyTransitions {
        let mut transitions = SafetyTransitions::new();
        for reason in AlarmReason::ALL {
            let index = reason.index();
            let raised = self.enabled[index] && flags.is_raised(reason);
            if raised == self.active[index] {
                continue;
            }

            self.active[index] = raised;
            if raised {
                error!("safety alarm raised: {}", reason);
            } else {
                info!("safety alarm released: {}", reason);
            }
            // one entry per reason, capacity always suffices
            let _ = transitions.push(SafetyUpdate {
                reason,
                active: raised,
            });
        }
        transitions
    }

    pub fn check(&self) -> SafetyStatus {
        AlarmReason::ALL
            .into_iter()
            .find(|reason| self.active[reason.index()])
            .map(SafetyStatus::Fault)
            .unwrap_or(SafetyStatus::Ok)
    }

    pub fn is_faulted(&self) -> bool {
        self.check() != SafetyStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_operation() {
        let flags = AlarmFlags::new();
        let mut monitor = SafetyMonitor::new();
        assert!(monitor.poll(&flags).is_empty());
        assert_eq!(monitor.check(), SafetyStatus::Ok);
    }

    #[test]
    fn test_raise_reports_once() {
        let flags = AlarmFlags::new();
        let mut monitor = SafetyMonitor::new();

        flags.raise(AlarmReason::BoilerOverTemperature);
        let transitions = monitor.poll(&flags);
        assert_eq!(
            transitions.as_slice(),
            &[SafetyUpdate {
                reason: AlarmReason::BoilerOverTemperature,
                active: true,
            }]
        );
        assert!(monitor.poll(&flags).is_empty());
        assert_eq!(
            monitor.check(),
            SafetyStatus::Fault(AlarmReason::BoilerOverTemperature)
        );
    }

    #[test]
    fn test_clear_releases() {
        let flags = AlarmFlags::new();
        let mut monitor = SafetyMonitor::new();

        flags.raise(AlarmReason::WaterLevelLow);
        monitor.poll(&flags);
        flags.clear(AlarmReason::WaterLevelLow);

        let transitions = monitor.poll(&flags);
        assert_eq!(transitions.len(), 1);
        assert!(!transitions[0].active);
        assert!(!monitor.is_faulted());
    }

    #[test]
    fn test_disabled_reason_is_ignored() {
        let flags = AlarmFlags::new();
        let mut monitor = SafetyMonitor::new();
        monitor.set_enabled(AlarmReason::SensorFault, false);
        assert!(!monitor.is_enabled(AlarmReason::SensorFault));
        assert!(monitor.is_enabled(AlarmReason::WaterLevelLow));

        flags.raise(AlarmReason::SensorFault);
        assert!(monitor.poll(&flags).is_empty());
        assert!(!monitor.is_faulted());
    }
}
