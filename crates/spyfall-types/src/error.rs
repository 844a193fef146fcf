//! Error types shared across crates.

/// Errors raised while building a roster of players.
///
/// All of these are recoverable: the caller corrects the input and tries
/// again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// The name was empty (or only whitespace) after trimming.
    #[error("player name must not be empty")]
    EmptyName,

    /// Another player in the roster already uses this name.
    #[error("player {0} is already in the roster")]
    DuplicateName(String),

    /// The player is not in the roster.
    #[error("player {0} is not in the roster")]
    UnknownPlayer(String),

    /// Not enough players to start a round.
    #[error("a round needs at least {min} players, roster has {count}")]
    TooFewPlayers { count: usize, min: usize },

    /// The roster exceeds the configured table size.
    #[error("a round allows at most {max} players, roster has {count}")]
    TooManyPlayers { count: usize, max: usize },
}

/// An operation was called in a state that does not allow it.
///
/// Returned instead of changing anything: the state machine is left
/// exactly as it was. This is a sequencing bug in the caller (a button
/// that should have been disabled), never a user input problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {operation} while {state}")]
pub struct InvalidTransition {
    /// The operation that was attempted.
    pub operation: &'static str,
    /// The state it was attempted in, as displayed.
    pub state: String,
}

impl InvalidTransition {
    /// Records that `operation` was attempted while in `state`.
    pub fn new(operation: &'static str, state: impl ToString) -> Self {
        Self {
            operation,
            state: state.to_string(),
        }
    }
}
