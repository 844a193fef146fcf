//! The reveal state machine.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use spyfall_types::InvalidTransition;

// ---------------------------------------------------------------------------
// RevealState
// ---------------------------------------------------------------------------

/// Where the table is in the reveal sequence.
///
/// Transitions only move forward:
///
/// ```text
/// AwaitingReveal(0) → Exposed(0) → AwaitingReveal(1) → Exposed(1) → … → AllSeen
///        reveal()        advance()        reveal()        advance()
/// ```
///
/// - **AwaitingReveal(i)**: player `i` holds the device, role hidden.
/// - **Exposed(i)**: player `i`'s role is on screen. Nobody else's is.
/// - **AllSeen**: everyone has looked; every role is hidden again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum RevealState {
    AwaitingReveal(usize),
    Exposed(usize),
    AllSeen,
}

impl fmt::Display for RevealState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingReveal(i) => write!(f, "AwaitingReveal({i})"),
            Self::Exposed(i) => write!(f, "Exposed({i})"),
            Self::AllSeen => write!(f, "AllSeen"),
        }
    }
}

/// Whether one player's role is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    Exposed,
}

/// Outcome of a successful [`RevealSequencer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The device passes to this player.
    Next(usize),
    /// That was the last player. The timer may now be started.
    AllSeen,
}

/// Read-only summary of reveal progress for a view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealProgress {
    pub state: RevealState,
    /// Seat holding the device; equals `total` once everyone has looked.
    pub active_index: usize,
    /// Players who have finished their turn.
    pub seen: usize,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// RevealSequencer
// ---------------------------------------------------------------------------

/// Walks the table one seat at a time, exposing at most one role.
///
/// The active index never goes backwards, and there is no call that
/// re-exposes a seat once [`advance`](Self::advance) has moved past it.
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    player_count: usize,
    state: RevealState,
}

impl RevealSequencer {
    /// Starts at `AwaitingReveal(0)`. An empty table starts at `AllSeen`.
    pub fn new(player_count: usize) -> Self {
        let state = if player_count == 0 {
            RevealState::AllSeen
        } else {
            RevealState::AwaitingReveal(0)
        };
        Self {
            player_count,
            state,
        }
    }

    /// Exposes the current player's role and returns their seat.
    ///
    /// # Errors
    /// [`InvalidTransition`] unless in `AwaitingReveal`. Nothing changes.
    pub fn reveal(&mut self) -> Result<usize, InvalidTransition> {
        match self.state {
            RevealState::AwaitingReveal(i) => {
                self.state = RevealState::Exposed(i);
                trace!(seat = i, "role exposed");
                Ok(i)
            }
            other => Err(InvalidTransition::new("reveal", other)),
        }
    }

    /// Hides the exposed role and passes the device on.
    ///
    /// # Errors
    /// [`InvalidTransition`] unless in `Exposed`. Nothing changes.
    pub fn advance(&mut self) -> Result<Advance, InvalidTransition> {
        let RevealState::Exposed(i) = self.state else {
            return Err(InvalidTransition::new("advance", self.state));
        };

        if i + 1 < self.player_count {
            self.state = RevealState::AwaitingReveal(i + 1);
            trace!(seat = i + 1, "device passed");
            Ok(Advance::Next(i + 1))
        } else {
            self.state = RevealState::AllSeen;
            debug!(players = self.player_count, "all players have seen their role");
            Ok(Advance::AllSeen)
        }
    }

    /// Current state.
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Number of seats in the rotation.
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Seat holding the device, or `player_count` once all have looked.
    pub fn active_index(&self) -> usize {
        match self.state {
            RevealState::AwaitingReveal(i) | RevealState::Exposed(i) => i,
            RevealState::AllSeen => self.player_count,
        }
    }

    /// Seat whose role is on screen right now, if any.
    pub fn exposed_index(&self) -> Option<usize> {
        match self.state {
            RevealState::Exposed(i) => Some(i),
            _ => None,
        }
    }

    /// `true` once every player has finished their turn.
    pub fn is_all_seen(&self) -> bool {
        self.state == RevealState::AllSeen
    }

    /// Whether `seat`'s role is on screen right now.
    pub fn visibility(&self, seat: usize) -> Visibility {
        if self.exposed_index() == Some(seat) {
            Visibility::Exposed
        } else {
            Visibility::Hidden
        }
    }

    /// Progress summary for a snapshot.
    pub fn progress(&self) -> RevealProgress {
        RevealProgress {
            state: self.state,
            active_index: self.active_index(),
            seen: self.active_index(),
            total: self.player_count,
        }
    }
}
