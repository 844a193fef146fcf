//! The read-only projection a view layer renders from.

use serde::{Deserialize, Serialize};
use spyfall_reveal::RevealProgress;
use spyfall_timer::TimerSnapshot;
use spyfall_types::{PlayerName, RoundId};

use crate::SessionPhase;

/// Everything a view layer may know about a session at one instant.
///
/// Never contains a role. The only ways to see roles are
/// [`SessionController::current_role`](crate::SessionController::current_role)
/// during a reveal turn, and the identity map once the round has ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// `None` in Setup.
    pub round: Option<RoundId>,
    pub scenario: Option<String>,
    /// Seating order. Empty in Setup.
    pub players: Vec<PlayerName>,
    /// Player holding the device during reveal turns.
    pub active_player: Option<PlayerName>,
    /// Impostor seats dealt this round.
    pub impostor_count: usize,
    /// Impostor seats the round was started with, before clamping.
    pub requested_impostors: usize,
    /// `true` when `impostor_count` differs from what was requested.
    pub impostors_clamped: bool,
    pub reveal: Option<RevealProgress>,
    pub timer: Option<TimerSnapshot>,
}

impl SessionSnapshot {
    pub(crate) fn setup() -> Self {
        Self {
            phase: SessionPhase::Setup,
            round: None,
            scenario: None,
            players: Vec::new(),
            active_player: None,
            impostor_count: 0,
            requested_impostors: 0,
            impostors_clamped: false,
            reveal: None,
            timer: None,
        }
    }
}
