//! `TableBuilder`: one-stop setup for a hosted session.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use spyfall_session::{SessionConfig, SessionController, SessionHandle, SessionLimits};
use spyfall_timer::TickerConfig;
use spyfall_types::SessionId;

/// Builder for configuring and spawning a session actor.
///
/// # Example
///
/// ```rust,ignore
/// use spyfall::prelude::*;
///
/// let table = TableBuilder::new()
///     .players(3, 8)
///     .seed(42)
///     .spawn(SessionId(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    config: SessionConfig,
    seed: Option<u64>,
}

impl TableBuilder {
    /// A builder with default limits, a one-second tick, and an OS-seeded dealer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table size limits checked when a round starts.
    pub fn players(mut self, min: usize, max: usize) -> Self {
        self.config.limits = SessionLimits {
            min_players: min,
            max_players: max,
        };
        self
    }

    /// Sets the countdown tick period. One second unless you are testing.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.config.ticker = TickerConfig::with_period(period);
        self
    }

    /// Sets the command channel capacity.
    pub fn channel_size(mut self, size: usize) -> Self {
        self.config.channel_size = size;
        self
    }

    /// Seeds the dealer so role deals can be replayed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The session configuration this builder would spawn with.
    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            limits: self.config.limits.validated(),
            ticker: self.config.ticker.clone().validated(),
            channel_size: self.config.channel_size.max(1),
        }
    }

    /// A synchronous controller with the configured limits and seed, for
    /// hosts that drive the clock themselves.
    pub fn controller(&self) -> SessionController {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        SessionController::with_rng(self.config.limits, rng)
    }

    /// Spawns the session actor. Must be called inside a Tokio runtime.
    pub fn spawn(self, session_id: SessionId) -> SessionHandle {
        let controller = self.controller();
        let config = self.config();
        tracing::debug!(%session_id, seeded = self.seed.is_some(), "spawning table");
        SessionHandle::spawn_with(session_id, controller, config)
    }
}

#[cfg(test)]
mod tests {
    use spyfall_roles::RoundConfig;
    use spyfall_session::SessionPhase;
    use spyfall_types::{Roster, Scenario};

    use super::*;

    fn scenario() -> Scenario {
        Scenario::new("Ristorante", ["Cameriere", "Cuoco", "Cliente", "Manager"])
    }

    #[test]
    fn test_config_is_validated() {
        let config = TableBuilder::new()
            .players(0, 1)
            .tick_period(Duration::ZERO)
            .channel_size(0)
            .config();
        assert_eq!(config.limits.min_players, 2);
        assert_eq!(config.limits.max_players, 2);
        assert_eq!(config.ticker.period, TickerConfig::MIN_PERIOD);
        assert_eq!(config.channel_size, 1);
    }

    #[test]
    fn test_seeded_controllers_deal_alike() {
        let deal = || {
            let mut ctl = TableBuilder::new().seed(11).controller();
            ctl.start_round(
                Roster::from_names(["A", "B", "C", "D"]).unwrap(),
                &scenario(),
                RoundConfig::default(),
            )
            .unwrap();
            ctl.terminate_round().unwrap()
        };
        assert_eq!(deal(), deal());
    }

    #[tokio::test]
    async fn test_spawned_table_starts_in_setup() {
        let table = TableBuilder::new().seed(1).spawn(SessionId(9));
        assert_eq!(table.session_id(), SessionId(9));
        let snap = table.snapshot().await.unwrap();
        assert_eq!(snap.phase, SessionPhase::Setup);
    }
}
