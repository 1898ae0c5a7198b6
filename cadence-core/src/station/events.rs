//! Station status transitions

use cadence_protocol::StationStatus;

/// Something that happened to a station's recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StationEvent {
    /// A recipe was queued and waits for the user
    Queued { soak: bool },
    /// A fixed recipe was started without confirmation
    StartedDirectly { soak: bool },
    /// The user confirmed the pending phase
    Confirmed,
    /// The soak step has been poured
    SoakFinished,
    /// The last step has been poured
    AttacksFinished { finalize: bool },
    /// The finalization grace period is over
    FinalizationElapsed,
    /// The user took the cup
    Collected,
    /// The recipe was cancelled
    Cancelled,
}

/// Status after `event`, or `None` if the event is not valid in `status`
pub fn next_status(status: StationStatus, event: StationEvent) -> Option<StationStatus> {
    use StationEvent as E;
    use StationStatus as S;

    let next = match (status, event) {
        (S::Free, E::Queued { soak: true }) => S::ConfirmingSoak,
        (S::Free, E::Queued { soak: false }) => S::ConfirmingAttacks,
        (S::Free, E::StartedDirectly { soak: true }) => S::Soaking,
        (S::Free, E::StartedDirectly { soak: false }) => S::Attacking,

        (S::ConfirmingSoak, E::Confirmed) => S::Soaking,
        (S::ConfirmingAttacks, E::Confirmed) => S::Attacking,

        (S::Soaking, E::SoakFinished) => S::ConfirmingAttacks,

        (S::Soaking | S::Attacking, E::AttacksFinished { finalize: true }) => S::Finalizing,
        (S::Soaking | S::Attacking, E::AttacksFinished { finalize: false }) => S::Ready,

        (S::Finalizing, E::FinalizationElapsed) => S::Ready,

        (S::Ready, E::Collected) => S::Free,

        (S::Free, E::Cancelled) => return None,
        (_, E::Cancelled) => S::Free,

        _ => return None,
    };
    Some(next)
}
