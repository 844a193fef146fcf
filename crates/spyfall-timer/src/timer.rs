//! The countdown state machine.

use std::fmt;

use serde::{Deserialize, Serialize};
use spyfall_types::InvalidTransition;
use tracing::{debug, trace};

use crate::NotReady;

// ---------------------------------------------------------------------------
// TimerPhase / TimerEvent
// ---------------------------------------------------------------------------

/// Lifecycle of the countdown.
///
/// ```text
/// Idle ──start()──→ Running ──tick() to 0 / terminate_manually()──→ Expired
///   ↑                  │                                               │
///   └──────────────────┴──────────────── reset() ──────────────────────┘
/// ```
///
/// There is no pause: once started, the countdown runs until it expires,
/// is terminated, or is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    Running,
    Expired,
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

/// Something observers of the countdown are told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// One second elapsed; this many are left.
    Tick { remaining_seconds: u64 },
    /// The round is over. Emitted exactly once per start.
    Expired,
}

/// Read-only view of the countdown.
///
/// Displays as `m:ss`, e.g. `1:05`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub remaining_seconds: u64,
    pub duration_seconds: u64,
    pub phase: TimerPhase,
}

impl fmt::Display for TimerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        write!(f, "{minutes}:{seconds:02}")
    }
}

// ---------------------------------------------------------------------------
// RoundTimer
// ---------------------------------------------------------------------------

/// Countdown for one round.
///
/// Starts locked: [`start`](Self::start) refuses until [`unlock`](Self::unlock)
/// has been called, which the session does once every player has seen
/// their role.
#[derive(Debug, Clone)]
pub struct RoundTimer {
    duration_seconds: u64,
    remaining_seconds: u64,
    phase: TimerPhase,
    unlocked: bool,
}

impl RoundTimer {
    /// A locked, idle countdown of `duration_seconds`.
    pub fn new(duration_seconds: u64) -> Self {
        Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            phase: TimerPhase::Idle,
            unlocked: false,
        }
    }

    /// Allows [`start`](Self::start). Idempotent.
    pub fn unlock(&mut self) {
        if !self.unlocked {
            self.unlocked = true;
            debug!(duration = self.duration_seconds, "round timer unlocked");
        }
    }

    /// `true` once [`unlock`](Self::unlock) has been called.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Begins the countdown.
    ///
    /// # Errors
    /// - [`NotReady::RevealsPending`] — not unlocked yet
    /// - [`NotReady::AlreadyRunning`] / [`NotReady::Expired`] — not Idle
    pub fn start(&mut self) -> Result<(), NotReady> {
        match self.phase {
            TimerPhase::Running => return Err(NotReady::AlreadyRunning),
            TimerPhase::Expired => return Err(NotReady::Expired),
            TimerPhase::Idle => {}
        }
        if !self.unlocked {
            return Err(NotReady::RevealsPending);
        }
        self.phase = TimerPhase::Running;
        debug!(remaining = self.remaining_seconds, "round timer started");
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Returns the events to deliver: a `Tick`, plus `Expired` on the tick
    /// that reaches zero. Outside `Running` nothing happens and nothing is
    /// returned, so extra ticks after expiry are harmless.
    ///
    /// A zero-length countdown expires on its first tick.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            events.push(TimerEvent::Tick {
                remaining_seconds: self.remaining_seconds,
            });
            trace!(remaining = self.remaining_seconds, "round timer tick");
        }
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Expired;
            events.push(TimerEvent::Expired);
            debug!("round timer expired");
        }
        events
    }

    /// Stops a running countdown early.
    ///
    /// # Errors
    /// [`InvalidTransition`] unless Running.
    pub fn terminate_manually(&mut self) -> Result<TimerEvent, InvalidTransition> {
        if self.phase != TimerPhase::Running {
            return Err(InvalidTransition::new("terminate the timer", self.phase));
        }
        self.phase = TimerPhase::Expired;
        debug!(remaining = self.remaining_seconds, "round timer terminated early");
        Ok(TimerEvent::Expired)
    }

    /// Back to a locked Idle countdown of `duration_seconds`. Valid anywhere.
    pub fn reset(&mut self, duration_seconds: u64) {
        *self = Self::new(duration_seconds);
    }

    /// Current phase.
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Seconds left on the clock.
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Read-only copy of the countdown state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining_seconds: self.remaining_seconds,
            duration_seconds: self.duration_seconds,
            phase: self.phase,
        }
    }
}
