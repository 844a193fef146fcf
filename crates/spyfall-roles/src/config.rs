//! Per-round settings.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Settings chosen before a round starts.
///
/// `impostor_count` is a request: the dealer clamps it into
/// `1..=player_count - 1` because rounds with no impostor, or with nobody
/// but impostors, are not playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Requested number of impostor seats.
    pub impostor_count: usize,
    /// Countdown length once every player has seen their role.
    pub duration_seconds: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            impostor_count: 1,
            duration_seconds: 60,
        }
    }
}

impl RoundConfig {
    /// Longest countdown accepted: 24 hours.
    pub const MAX_DURATION_SECONDS: u64 = 24 * 60 * 60;

    /// A config with an explicit impostor request and countdown in seconds.
    pub fn new(impostor_count: usize, duration_seconds: u64) -> Self {
        Self {
            impostor_count,
            duration_seconds,
        }
    }

    /// Builds a config with the countdown given in whole minutes.
    pub fn from_minutes(impostor_count: usize, minutes: u64) -> Self {
        Self::new(impostor_count, minutes.saturating_mul(60))
    }

    /// Caps the countdown at [`Self::MAX_DURATION_SECONDS`].
    ///
    /// The impostor count is left alone here; it can only be clamped once
    /// the table size is known (see [`Self::effective_impostors`]).
    pub fn validated(mut self) -> Self {
        if self.duration_seconds > Self::MAX_DURATION_SECONDS {
            warn!(
                duration = self.duration_seconds,
                max = Self::MAX_DURATION_SECONDS,
                "round duration exceeds maximum, clamping"
            );
            self.duration_seconds = Self::MAX_DURATION_SECONDS;
        }
        self
    }

    /// The impostor count actually dealt to a table of `player_count`.
    ///
    /// Returns `None` when fewer than two players are seated.
    pub fn effective_impostors(&self, player_count: usize) -> Option<usize> {
        clamp_impostors(self.impostor_count, player_count)
    }
}

pub(crate) fn clamp_impostors(requested: usize, player_count: usize) -> Option<usize> {
    if player_count < 2 {
        return None;
    }
    Some(requested.clamp(1, player_count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_impostor_one_minute() {
        let cfg = RoundConfig::default();
        assert_eq!(cfg.impostor_count, 1);
        assert_eq!(cfg.duration_seconds, 60);
    }

    #[test]
    fn test_from_minutes_converts() {
        assert_eq!(RoundConfig::from_minutes(2, 5).duration_seconds, 300);
    }

    #[test]
    fn test_validated_caps_duration() {
        let cfg = RoundConfig::new(1, u64::MAX).validated();
        assert_eq!(cfg.duration_seconds, RoundConfig::MAX_DURATION_SECONDS);
        let cfg = RoundConfig::new(1, 0).validated();
        assert_eq!(cfg.duration_seconds, 0);
    }

    #[test]
    fn test_effective_impostors_clamps_both_ends() {
        assert_eq!(RoundConfig::new(0, 60).effective_impostors(5), Some(1));
        assert_eq!(RoundConfig::new(5, 60).effective_impostors(5), Some(4));
        assert_eq!(RoundConfig::new(2, 60).effective_impostors(5), Some(2));
        assert_eq!(RoundConfig::new(1, 60).effective_impostors(1), None);
        assert_eq!(RoundConfig::new(1, 60).effective_impostors(0), None);
    }

    #[test]
    fn test_config_deserializes_from_settings_json() {
        let cfg: RoundConfig =
            serde_json::from_str(r#"{"impostor_count": 2, "duration_seconds": 480}"#).unwrap();
        assert_eq!(cfg, RoundConfig::from_minutes(2, 8));
    }
}
