//! Error type for starting the countdown.

/// The countdown cannot be started right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotReady {
    /// Some players have not seen their role yet.
    #[error("timer cannot start until every player has seen their role")]
    RevealsPending,

    /// The countdown has already been started this round.
    #[error("timer is already running")]
    AlreadyRunning,

    /// The countdown already reached zero (or was stopped). Reset it first.
    #[error("timer has expired, reset it to start again")]
    Expired,
}
