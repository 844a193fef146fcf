//! Error types for the session layer.

use spyfall_roles::AssignmentError;
use spyfall_timer::NotReady;
use spyfall_types::{InvalidTransition, RosterError, SessionId};

/// Errors that can occur during session operations.
///
/// Each lower-layer error is carried through unchanged (`transparent`),
/// so callers can match on the original value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The roster is unusable (too small, too large, bad names).
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// Roles could not be dealt for this scenario and table size.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// The operation is not allowed in the current state.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The timer cannot be started yet.
    #[error(transparent)]
    NotReady(#[from] NotReady),

    /// The session actor has shut down or its command channel is closed.
    #[error("session {0} is unavailable")]
    Unavailable(SessionId),

    /// No session with this ID is being hosted.
    #[error("session {0} not found")]
    NotFound(SessionId),
}
