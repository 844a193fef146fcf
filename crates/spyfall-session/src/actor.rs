//! Session actor: a Tokio task that owns a [`SessionController`] and its
//! one-second tick source.
//!
//! UI commands and clock ticks both arrive at the same `select!` loop, so
//! they are applied strictly one after another. A tick can never land in
//! the middle of a reveal, and once a reset has been processed the ticker
//! is disarmed before the loop polls it again.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spyfall_roles::RoundConfig;
use spyfall_timer::{NotReady, SecondTicker, TimerEvent, TimerPhase};
use spyfall_types::{IdentityMap, InvalidTransition, RoleLabel, Roster, RoundId, Scenario, SessionId};
use tokio::sync::{mpsc, oneshot};

use crate::controller::TickObserver;
use crate::{SessionConfig, SessionController, SessionError, SessionSnapshot};

/// Commands sent to a session actor through its channel.
///
/// The `oneshot::Sender` in each variant is the reply channel.
enum SessionCommand {
    StartRound {
        roster: Roster,
        scenario: Scenario,
        config: RoundConfig,
        reply: oneshot::Sender<Result<SessionSnapshot, SessionError>>,
    },
    Reveal {
        reply: oneshot::Sender<Result<RoleLabel, InvalidTransition>>,
    },
    Advance {
        reply: oneshot::Sender<Result<SessionSnapshot, InvalidTransition>>,
    },
    StartTimer {
        reply: oneshot::Sender<Result<(), NotReady>>,
    },
    OnTick {
        observer: TickObserver,
    },
    Subscribe {
        sender: mpsc::UnboundedSender<TimerEvent>,
    },
    Terminate {
        reply: oneshot::Sender<Result<IdentityMap, InvalidTransition>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}

/// Handle to a running session actor.
///
/// Cheap to clone: it is just an `mpsc::Sender` wrapper.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// The ID this session was spawned with.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// See [`SessionController::start_round`]. The scenario is copied into
    /// the actor; the caller's catalog is not referenced afterwards.
    pub async fn start_round(
        &self,
        roster: Roster,
        scenario: &Scenario,
        config: RoundConfig,
    ) -> Result<SessionSnapshot, SessionError> {
        let scenario = scenario.clone();
        self.request(|reply| SessionCommand::StartRound {
            roster,
            scenario,
            config,
            reply,
        })
        .await?
    }

    /// See [`SessionController::reveal_current`].
    pub async fn reveal_current(&self) -> Result<RoleLabel, SessionError> {
        Ok(self.request(|reply| SessionCommand::Reveal { reply }).await??)
    }

    /// See [`SessionController::acknowledge_and_advance`].
    pub async fn acknowledge_and_advance(&self) -> Result<SessionSnapshot, SessionError> {
        Ok(self.request(|reply| SessionCommand::Advance { reply }).await??)
    }

    /// Starts the countdown; the actor then ticks it once per second.
    pub async fn start_timer(&self) -> Result<(), SessionError> {
        Ok(self.request(|reply| SessionCommand::StartTimer { reply }).await??)
    }

    /// Registers a callback for every countdown event. It runs on the
    /// actor task.
    pub async fn on_tick(
        &self,
        observer: impl FnMut(&TimerEvent) + Send + 'static,
    ) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::OnTick {
                observer: Box::new(observer),
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }

    /// Forwards every countdown event into a channel. Dropping the
    /// receiver ends the subscription.
    pub async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<TimerEvent>, SessionError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sender
            .send(SessionCommand::Subscribe { sender: tx })
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        Ok(rx)
    }

    /// See [`SessionController::terminate_round`].
    pub async fn terminate_round(&self) -> Result<IdentityMap, SessionError> {
        Ok(self.request(|reply| SessionCommand::Terminate { reply }).await??)
    }

    /// Returns the session to Setup and stops the clock.
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Reset { reply }).await
    }

    /// The current role-free snapshot.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Tells the actor to stop. Pending commands behind it are dropped.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct SessionActor<R> {
    session_id: SessionId,
    controller: SessionController<R>,
    ticker: SecondTicker,
    /// Round the armed ticker belongs to.
    ticking_round: Option<RoundId>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<R: Rng + Send + 'static> SessionActor<R> {
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::info!(session = %self.session_id, "session actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle(cmd) {
                        break;
                    }
                }
                _ = self.ticker.wait_for_tick() => {
                    if let Some(round) = self.ticking_round {
                        self.controller.tick_round(round);
                    }
                    self.sync_ticker();
                }
            }
        }

        tracing::info!(session = %self.session_id, "session actor stopped");
    }

    /// Applies one command. Returns `false` on shutdown.
    fn handle(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::StartRound {
                roster,
                scenario,
                config,
                reply,
            } => {
                let result = self.controller.start_round(roster, &scenario, config);
                let _ = reply.send(result);
            }
            SessionCommand::Reveal { reply } => {
                let _ = reply.send(self.controller.reveal_current());
            }
            SessionCommand::Advance { reply } => {
                let _ = reply.send(self.controller.acknowledge_and_advance());
            }
            SessionCommand::StartTimer { reply } => {
                let result = self.controller.start_timer();
                self.sync_ticker();
                let _ = reply.send(result);
            }
            SessionCommand::OnTick { observer } => {
                self.controller.on_tick(observer);
            }
            SessionCommand::Subscribe { sender } => {
                self.controller.add_subscriber(sender);
            }
            SessionCommand::Terminate { reply } => {
                let result = self.controller.terminate_round();
                self.sync_ticker();
                let _ = reply.send(result);
            }
            SessionCommand::Reset { reply } => {
                self.controller.reset();
                self.sync_ticker();
                let _ = reply.send(());
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.controller.snapshot());
            }
            SessionCommand::Shutdown => {
                tracing::info!(session = %self.session_id, "session shutting down");
                return false;
            }
        }
        true
    }

    /// Arms the ticker exactly while the current round's countdown runs.
    fn sync_ticker(&mut self) {
        let running = self
            .controller
            .timer()
            .is_some_and(|t| t.phase == TimerPhase::Running);
        let round = self.controller.round_id();

        if running && (self.ticking_round != round || !self.ticker.is_armed()) {
            self.ticker.arm();
            self.ticking_round = round;
        } else if !running && self.ticker.is_armed() {
            self.ticker.disarm();
            self.ticking_round = None;
        }
    }
}

/// Spawns a session actor and returns a handle to it.
pub(crate) fn spawn_session<R>(
    session_id: SessionId,
    controller: SessionController<R>,
    config: &SessionConfig,
) -> SessionHandle
where
    R: Rng + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = SessionActor {
        session_id,
        controller,
        ticker: SecondTicker::new(config.ticker.clone()),
        ticking_round: None,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}

impl SessionHandle {
    /// Spawns a standalone session with an OS-seeded random source.
    pub fn spawn(session_id: SessionId, config: SessionConfig) -> Self {
        let controller = SessionController::with_rng(config.limits, StdRng::from_os_rng());
        spawn_session(session_id, controller, &config)
    }

    /// Spawns a standalone session around an existing controller, e.g. one
    /// built with a seeded random source.
    pub fn spawn_with<R>(
        session_id: SessionId,
        controller: SessionController<R>,
        config: SessionConfig,
    ) -> Self
    where
        R: Rng + Send + 'static,
    {
        spawn_session(session_id, controller, &config)
    }
}
