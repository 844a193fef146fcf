//! Core value types: player names, role labels, and identifiers.
//!
//! Every type here is a small newtype around a primitive. The wrappers keep
//! a `RoleLabel` from being passed where a `PlayerName` is expected, and
//! they serialize transparently so a view layer sees plain strings and
//! numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RosterError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's display name, unique within one roster.
///
/// Always trimmed and never empty. The only way to build one is
/// [`PlayerName::new`], so every `PlayerName` in the system already
/// satisfies those rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Trims `name` and wraps it.
    ///
    /// # Errors
    /// Returns [`RosterError::EmptyName`] if nothing is left after trimming.
    pub fn new(name: impl AsRef<str>) -> Result<Self, RosterError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RosterError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one round. Increases every time a round is started, so a
/// tick or callback carrying an old `RoundId` can be recognized as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RD-{}", self.0)
    }
}

/// Identifies one table (session) when several are hosted side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The label dealt to impostors. Players holding it do not know the
/// scenario's setting.
pub const IMPOSTOR_LABEL: &str = "Spia";

/// A role dealt to a player: either a scenario role or the impostor label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleLabel(String);

impl RoleLabel {
    /// Wraps a label as given.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The reserved impostor label.
    pub fn impostor() -> Self {
        Self(IMPOSTOR_LABEL.to_string())
    }

    /// Case-insensitive match against [`IMPOSTOR_LABEL`].
    pub fn is_impostor(&self) -> bool {
        is_impostor_label(&self.0)
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn is_impostor_label(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case(IMPOSTOR_LABEL)
}

// ---------------------------------------------------------------------------
// IdentityMap — the final reveal
// ---------------------------------------------------------------------------

/// One row of the final reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEntry {
    pub player: PlayerName,
    pub role: RoleLabel,
}

/// Player name → role, in roster order.
///
/// Produced only when a round has ended. Kept as an ordered list rather
/// than a hash map so the reveal reads in seating order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityMap {
    entries: Vec<IdentityEntry>,
}

impl IdentityMap {
    /// Zips players with their roles. Both slices are positionally aligned.
    pub fn from_aligned(players: &[PlayerName], roles: &[RoleLabel]) -> Self {
        let entries = players
            .iter()
            .zip(roles)
            .map(|(player, role)| IdentityEntry {
                player: player.clone(),
                role: role.clone(),
            })
            .collect();
        Self { entries }
    }

    /// The role dealt to `player`, if they were in the round.
    pub fn get(&self, player: &str) -> Option<&RoleLabel> {
        self.entries
            .iter()
            .find(|e| e.player.as_str() == player)
            .map(|e| &e.role)
    }

    /// Names of every player who held the impostor label.
    pub fn impostors(&self) -> impl Iterator<Item = &PlayerName> {
        self.entries
            .iter()
            .filter(|e| e.role.is_impostor())
            .map(|e| &e.player)
    }

    /// Entries in seating order.
    pub fn iter(&self) -> impl Iterator<Item = &IdentityEntry> {
        self.entries.iter()
    }

    /// Number of players in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the round had no players.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
