//! Session configuration and the session phase machine.

use serde::{Deserialize, Serialize};
use spyfall_timer::TickerConfig;
use tracing::warn;

// ---------------------------------------------------------------------------
// SessionLimits / SessionConfig
// ---------------------------------------------------------------------------

/// Table size limits checked when a round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLimits {
    /// Minimum players required to start a round. Never below 2.
    pub min_players: usize,
    /// Maximum players allowed at one table.
    pub max_players: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 32,
        }
    }
}

impl SessionLimits {
    /// Clamp out-of-range values. Rules:
    /// - `min_players` raised to at least 2.
    /// - `max_players` raised to at least `min_players`.
    pub fn validated(mut self) -> Self {
        if self.min_players < 2 {
            warn!(min_players = self.min_players, "min_players below 2, clamping");
            self.min_players = 2;
        }
        if self.max_players < self.min_players {
            warn!(
                max_players = self.max_players,
                min_players = self.min_players,
                "max_players below min_players, clamping"
            );
            self.max_players = self.min_players;
        }
        self
    }
}

/// Everything needed to host one session as an actor.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub limits: SessionLimits,
    /// Tick source settings; the default ticks once per second.
    pub ticker: TickerConfig,
    /// Command channel capacity. Senders wait when it is full.
    pub channel_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            limits: SessionLimits::default(),
            ticker: TickerConfig::default(),
            channel_size: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a session.
///
/// ```text
/// Setup → RoundInProgress → RoundEnded
///   ↑                           │
///   └──────── reset() ──────────┘   (reset is allowed from any phase)
/// ```
///
/// - **Setup**: no round. The roster is being assembled elsewhere.
/// - **RoundInProgress**: roles are dealt; reveal turns and the countdown
///   run here.
/// - **RoundEnded**: the countdown expired or the round was stopped. The
///   identity map is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Setup,
    RoundInProgress,
    RoundEnded,
}

impl SessionPhase {
    /// Returns `true` if a new round may be started.
    pub fn can_start_round(&self) -> bool {
        matches!(self, Self::Setup)
    }

    /// Returns `true` while reveal turns or the countdown are running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::RoundInProgress)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "Setup"),
            Self::RoundInProgress => write!(f, "RoundInProgress"),
            Self::RoundEnded => write!(f, "RoundEnded"),
        }
    }
}
