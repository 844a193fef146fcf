//! The session controller: the only object a view layer talks to.
//!
//! It owns one round at a time and composes the dealer, the reveal
//! sequencer, and the countdown into a single state machine. Roles never
//! leave it except through [`current_role`](SessionController::current_role)
//! during a reveal turn and the identity map after the round ends.
//!
//! # Concurrency note
//!
//! `SessionController` is plain synchronous state, like every other piece
//! of this crate below the actor. To drive it from several tasks (a UI and
//! a clock), run it inside a [`SessionHandle`](crate::SessionHandle), which
//! serializes every call through one channel.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spyfall_reveal::{Advance, RevealProgress, RevealSequencer};
use spyfall_roles::{RoleAssignment, RoundConfig, assign};
use spyfall_timer::{NotReady, RoundTimer, TimerEvent, TimerPhase, TimerSnapshot};
use spyfall_types::{
    IdentityMap, InvalidTransition, PlayerName, RoleLabel, Roster, RosterError, RoundId, Scenario,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{SessionError, SessionLimits, SessionPhase, SessionSnapshot};

/// Callback invoked with every countdown event.
pub type TickObserver = Box<dyn FnMut(&TimerEvent) + Send + 'static>;

/// One round's worth of state. Replaced wholesale on reset.
struct Round {
    id: RoundId,
    scenario_name: String,
    roster: Roster,
    assignment: RoleAssignment,
    reveal: RevealSequencer,
    timer: RoundTimer,
    /// Set when the round ends; its presence is what makes the phase
    /// `RoundEnded`.
    identities: Option<IdentityMap>,
}

impl Round {
    fn phase(&self) -> SessionPhase {
        if self.identities.is_some() {
            SessionPhase::RoundEnded
        } else {
            SessionPhase::RoundInProgress
        }
    }
}

/// Drives one table through Setup → RoundInProgress → RoundEnded.
///
/// Generic over the random source so tests can inject a seeded one; the
/// default is an OS-seeded [`StdRng`].
pub struct SessionController<R = StdRng> {
    limits: SessionLimits,
    rng: R,
    round: Option<Round>,
    next_round: u64,
    observers: Vec<TickObserver>,
    /// Channel subscribers; dropped once their receiver is gone.
    subscribers: Vec<mpsc::UnboundedSender<TimerEvent>>,
}

impl SessionController<StdRng> {
    /// A controller with default limits and an OS-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(SessionLimits::default(), StdRng::from_os_rng())
    }
}

impl Default for SessionController<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SessionController<R> {
    /// A controller with the given limits, dealing from `rng`.
    pub fn with_rng(limits: SessionLimits, rng: R) -> Self {
        Self {
            limits: limits.validated(),
            rng,
            round: None,
            next_round: 1,
            observers: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Round lifecycle
    // -----------------------------------------------------------------------

    /// Deals roles and begins reveal turns at the first seat.
    ///
    /// The scenario is only read; nothing borrowed from it outlives this
    /// call.
    ///
    /// # Errors
    /// - [`SessionError::InvalidTransition`] — not in Setup
    /// - [`SessionError::Roster`] — roster outside [`SessionLimits`]
    /// - [`SessionError::Assignment`] — the dealer refused, passed through
    ///   unchanged
    ///
    /// On any error the session stays in Setup.
    pub fn start_round(
        &mut self,
        roster: Roster,
        scenario: &Scenario,
        config: RoundConfig,
    ) -> Result<SessionSnapshot, SessionError> {
        let phase = self.phase();
        if !phase.can_start_round() {
            return Err(InvalidTransition::new("start a round", phase).into());
        }

        let count = roster.len();
        if count < self.limits.min_players {
            return Err(RosterError::TooFewPlayers {
                count,
                min: self.limits.min_players,
            }
            .into());
        }
        if count > self.limits.max_players {
            return Err(RosterError::TooManyPlayers {
                count,
                max: self.limits.max_players,
            }
            .into());
        }

        let config = config.validated();
        let assignment = assign(scenario, count, config.impostor_count, &mut self.rng)?;

        let id = RoundId(self.next_round);
        self.next_round += 1;

        // Info output may share the screen with the players, so the
        // scenario name stays at debug.
        info!(
            round = %id,
            players = count,
            impostors = assignment.impostor_count(),
            duration = config.duration_seconds,
            "round started"
        );
        debug!(round = %id, scenario = scenario.name(), "round scenario");

        self.round = Some(Round {
            id,
            scenario_name: scenario.name().to_string(),
            roster,
            assignment,
            reveal: RevealSequencer::new(count),
            timer: RoundTimer::new(config.duration_seconds),
            identities: None,
        });

        Ok(self.snapshot())
    }

    /// Shows the current player's role. One time per turn.
    pub fn reveal_current(&mut self) -> Result<RoleLabel, InvalidTransition> {
        let round = self.active_round_mut("reveal a role")?;
        let seat = round.reveal.reveal()?;
        round
            .assignment
            .role(seat)
            .cloned()
            .ok_or_else(|| InvalidTransition::new("reveal a role", round.reveal.state()))
    }

    /// Hides the exposed role and passes the device to the next seat.
    ///
    /// After the last seat, every role is hidden and the timer unlocks.
    pub fn acknowledge_and_advance(&mut self) -> Result<SessionSnapshot, InvalidTransition> {
        let round = self.active_round_mut("pass the device")?;
        if round.reveal.advance()? == Advance::AllSeen {
            round.timer.unlock();
            info!(round = %round.id, "all roles seen, timer unlocked");
        }
        Ok(self.snapshot())
    }

    /// Starts the countdown.
    ///
    /// # Errors
    /// [`NotReady`] before the last reveal turn has been acknowledged, or if
    /// the countdown has already been started this round.
    pub fn start_timer(&mut self) -> Result<(), NotReady> {
        let Some(round) = self.round.as_mut() else {
            return Err(NotReady::RevealsPending);
        };
        if round.identities.is_some() {
            return Err(NotReady::Expired);
        }
        round.timer.start()?;
        info!(round = %round.id, remaining = round.timer.remaining_seconds(), "countdown started");
        Ok(())
    }

    /// Registers a callback for every countdown event.
    ///
    /// Observers stay registered across rounds and resets.
    pub fn on_tick(&mut self, observer: impl FnMut(&TimerEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Forwards every countdown event into a channel.
    ///
    /// Unlike [`on_tick`](Self::on_tick) callbacks, a subscription ends when
    /// its receiver is dropped.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TimerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.add_subscriber(tx);
        rx
    }

    /// Registers the sending half of a subscription made elsewhere.
    pub fn add_subscriber(&mut self, sender: mpsc::UnboundedSender<TimerEvent>) {
        self.subscribers.retain(|tx| !tx.is_closed());
        self.subscribers.push(sender);
    }

    /// Callbacks plus live channel subscriptions.
    pub fn observer_count(&self) -> usize {
        self.observers.len() + self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }

    /// One elapsed second for the current round.
    ///
    /// Delivers the resulting events to observers and returns them. When
    /// the countdown reaches zero the round ends. Outside a running
    /// countdown this is a no-op.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        let events = round.timer.tick();
        if events.contains(&TimerEvent::Expired) {
            Self::freeze(round);
        }
        self.dispatch(&events);
        events
    }

    /// Like [`tick`](Self::tick), but only if `round` is still the current
    /// round. A tick scheduled for a round that has since been reset is
    /// silently dropped.
    pub fn tick_round(&mut self, round: RoundId) -> Vec<TimerEvent> {
        if self.round_id() != Some(round) {
            debug!(stale = %round, current = ?self.round_id(), "stale tick ignored");
            return Vec::new();
        }
        self.tick()
    }

    /// Ends the round now and freezes the identity map.
    ///
    /// A running countdown is stopped and observers receive the terminal
    /// event.
    pub fn end_round(&mut self) -> Result<&IdentityMap, InvalidTransition> {
        let phase = self.phase();
        let Some(round) = self.round.as_mut().filter(|_| phase.is_active()) else {
            return Err(InvalidTransition::new("end the round", phase));
        };

        let terminal = if round.timer.phase() == TimerPhase::Running {
            round.timer.terminate_manually().ok()
        } else {
            None
        };
        Self::freeze(round);
        if let Some(event) = terminal {
            self.dispatch(&[event]);
        }

        self.identity_map()
            .ok_or_else(|| InvalidTransition::new("end the round", phase))
    }

    /// Moderator stop: ends the round if it is still running, then returns
    /// the final identity map. Calling it again after the round ended
    /// returns the same map.
    pub fn terminate_round(&mut self) -> Result<IdentityMap, InvalidTransition> {
        if self.phase().is_active() {
            self.end_round()?;
        }
        self.identity_map()
            .cloned()
            .ok_or_else(|| InvalidTransition::new("terminate the round", self.phase()))
    }

    /// Drops the round (roster, roles, reveal and timer state) and returns
    /// to Setup. Valid from any phase.
    pub fn reset(&mut self) {
        if let Some(round) = self.round.take() {
            info!(round = %round.id, "session reset");
        }
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.round
            .as_ref()
            .map_or(SessionPhase::Setup, Round::phase)
    }

    /// ID of the round in play, `None` in Setup.
    pub fn round_id(&self) -> Option<RoundId> {
        self.round.as_ref().map(|r| r.id)
    }

    /// The exposed player's role. `None` unless a role is on screen.
    pub fn current_role(&self) -> Option<&RoleLabel> {
        let round = self.round.as_ref().filter(|r| r.identities.is_none())?;
        let seat = round.reveal.exposed_index()?;
        round.assignment.role(seat)
    }

    /// The final identity map. `None` until the round has ended.
    pub fn identity_map(&self) -> Option<&IdentityMap> {
        self.round.as_ref()?.identities.as_ref()
    }

    /// Countdown state, `None` in Setup.
    pub fn timer(&self) -> Option<TimerSnapshot> {
        self.round.as_ref().map(|r| r.timer.snapshot())
    }

    /// Reveal turn progress, `None` in Setup.
    pub fn reveal_progress(&self) -> Option<RevealProgress> {
        self.round.as_ref().map(|r| r.reveal.progress())
    }

    /// The validated table limits.
    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Everything a view layer may render right now. Never includes roles.
    pub fn snapshot(&self) -> SessionSnapshot {
        let Some(round) = self.round.as_ref() else {
            return SessionSnapshot::setup();
        };

        let active_player = if round.identities.is_none() {
            round.roster.get(round.reveal.active_index()).cloned()
        } else {
            None
        };

        SessionSnapshot {
            phase: round.phase(),
            round: Some(round.id),
            scenario: Some(round.scenario_name.clone()),
            players: round.roster.players().to_vec(),
            active_player,
            impostor_count: round.assignment.impostor_count(),
            requested_impostors: round.assignment.requested_impostors(),
            impostors_clamped: round.assignment.was_clamped(),
            reveal: Some(round.reveal.progress()),
            timer: Some(round.timer.snapshot()),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn active_round_mut(&mut self, operation: &'static str) -> Result<&mut Round, InvalidTransition> {
        let phase = self.phase();
        self.round
            .as_mut()
            .filter(|_| phase.is_active())
            .ok_or_else(|| InvalidTransition::new(operation, phase))
    }

    fn freeze(round: &mut Round) {
        if round.identities.is_none() {
            let players: &[PlayerName] = round.roster.players();
            round.identities = Some(round.assignment.identity_map(players));
            info!(round = %round.id, "round ended");
        }
    }

    fn dispatch(&mut self, events: &[TimerEvent]) {
        for event in events {
            for observer in &mut self.observers {
                observer(event);
            }
        }
        if !events.is_empty() {
            self.subscribers
                .retain(|tx| events.iter().all(|event| tx.send(*event).is_ok()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn controller() -> SessionController {
        SessionController::with_rng(SessionLimits::default(), StdRng::seed_from_u64(8))
    }

    fn kitchen() -> Scenario {
        Scenario::new("Kitchen", ["Chef", "Waiter", "Guest"])
    }

    fn roster(names: &[&str]) -> Roster {
        Roster::from_names(names).unwrap()
    }

    fn walk_reveals(ctl: &mut SessionController, players: usize) {
        for _ in 0..players {
            ctl.reveal_current().unwrap();
            ctl.acknowledge_and_advance().unwrap();
        }
    }

    #[test]
    fn test_new_controller_is_in_setup() {
        let ctl = controller();
        assert_eq!(ctl.phase(), SessionPhase::Setup);
        assert_eq!(ctl.snapshot(), SessionSnapshot::setup());
        assert!(ctl.current_role().is_none());
        assert!(ctl.identity_map().is_none());
    }

    #[test]
    fn test_start_round_rejects_single_player() {
        let mut ctl = controller();
        let err = ctl
            .start_round(roster(&["A"]), &kitchen(), RoundConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Roster(RosterError::TooFewPlayers { count: 1, min: 2 })
        );
        assert_eq!(ctl.phase(), SessionPhase::Setup);
    }

    #[test]
    fn test_start_round_twice_rejected() {
        let mut ctl = controller();
        ctl.start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::default())
            .unwrap();
        let err = ctl
            .start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition(_)));
        assert_eq!(ctl.round_id(), Some(RoundId(1)));
    }

    #[test]
    fn test_current_role_only_while_exposed() {
        let mut ctl = controller();
        ctl.start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::default())
            .unwrap();
        assert!(ctl.current_role().is_none());

        let role = ctl.reveal_current().unwrap();
        assert_eq!(ctl.current_role(), Some(&role));

        ctl.acknowledge_and_advance().unwrap();
        assert!(ctl.current_role().is_none());
    }

    #[test]
    fn test_observers_see_terminal_event_on_manual_stop() {
        let mut ctl = controller();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ctl.on_tick(move |e| sink.lock().unwrap().push(*e));

        ctl.start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::new(1, 10))
            .unwrap();
        walk_reveals(&mut ctl, 2);
        ctl.start_timer().unwrap();
        ctl.tick();
        let map = ctl.terminate_round().unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![TimerEvent::Tick { remaining_seconds: 9 }, TimerEvent::Expired]
        );
    }

    #[test]
    fn test_end_round_during_reveals_emits_no_timer_event() {
        let mut ctl = controller();
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        ctl.on_tick(move |_| *sink.lock().unwrap() += 1);

        ctl.start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::default())
            .unwrap();
        ctl.end_round().unwrap();

        assert_eq!(ctl.phase(), SessionPhase::RoundEnded);
        assert_eq!(*seen.lock().unwrap(), 0);
        assert!(ctl.end_round().is_err());
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_info_log_never_names_the_scenario() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut ctl = controller();
            let beach = Scenario::new("Spiaggia", ["Bagnino", "Turista", "Surfista"]);
            ctl.start_round(roster(&["A", "B", "C"]), &beach, RoundConfig::default())
                .unwrap();
            walk_reveals(&mut ctl, 3);
        });

        let log = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("round started"), "{log}");
        assert!(!log.contains("Spiaggia"), "{log}");
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let mut ctl = controller();
        let mut kept = ctl.subscribe();
        let dropped = ctl.subscribe();
        assert_eq!(ctl.observer_count(), 2);
        drop(dropped);

        ctl.start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::new(1, 5))
            .unwrap();
        walk_reveals(&mut ctl, 2);
        ctl.start_timer().unwrap();
        ctl.tick();

        assert_eq!(ctl.subscribers.len(), 1);
        assert_eq!(ctl.observer_count(), 1);
        assert_eq!(kept.try_recv(), Ok(TimerEvent::Tick { remaining_seconds: 4 }));
    }

    #[test]
    fn test_new_subscription_prunes_closed_ones() {
        let mut ctl = controller();
        drop(ctl.subscribe());
        drop(ctl.subscribe());
        let _live = ctl.subscribe();
        assert_eq!(ctl.subscribers.len(), 1);
    }

    #[test]
    fn test_tick_round_ignores_stale_round() {
        let mut ctl = controller();
        ctl.start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::new(1, 5))
            .unwrap();
        walk_reveals(&mut ctl, 2);
        ctl.start_timer().unwrap();
        let old = ctl.round_id().unwrap();

        ctl.reset();
        ctl.start_round(roster(&["A", "B"]), &kitchen(), RoundConfig::new(1, 5))
            .unwrap();
        walk_reveals(&mut ctl, 2);
        ctl.start_timer().unwrap();

        assert!(ctl.tick_round(old).is_empty());
        assert_eq!(ctl.timer().unwrap().remaining_seconds, 5);
    }
}
