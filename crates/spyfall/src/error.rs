//! Unified error type for the Spyfall crates.

use spyfall_roles::AssignmentError;
use spyfall_session::SessionError;
use spyfall_timer::NotReady;
use spyfall_types::{InvalidTransition, RosterError};

/// Top-level error that wraps every crate-specific error.
///
/// A [`SessionError`] that merely carries one of the other kinds is
/// flattened into that kind, so callers match on one level only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpyfallError {
    /// The roster could not be built or is outside the table limits.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// The dealer refused to deal (too few roles, too few players).
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// An operation was called in the wrong state.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The countdown cannot start yet.
    #[error(transparent)]
    NotReady(#[from] NotReady),

    /// The session itself is gone or was never there.
    #[error(transparent)]
    Session(SessionError),
}

impl From<SessionError> for SpyfallError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Roster(e) => Self::Roster(e),
            SessionError::Assignment(e) => Self::Assignment(e),
            SessionError::InvalidTransition(e) => Self::InvalidTransition(e),
            SessionError::NotReady(e) => Self::NotReady(e),
            other => Self::Session(other),
        }
    }
}
