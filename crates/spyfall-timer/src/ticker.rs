//! Fixed-period tick source for driving a [`RoundTimer`](crate::RoundTimer).
//!
//! The ticker never fires more than once per period. If the caller falls
//! behind (a long pause between polls), the missed ticks are skipped and
//! counted rather than delivered in a burst; a countdown that suddenly
//! drops several seconds at once reads as a glitch.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the tick source.
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Time between ticks. Default: one second.
    pub period: Duration,
    /// Random delay (0–max) added to the *first* tick after arming, to
    /// desynchronize many tables armed at the same instant. Default: none,
    /// since a single table's countdown should not drift.
    pub initial_jitter: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            initial_jitter: Duration::ZERO,
        }
    }
}

impl TickerConfig {
    /// Shortest accepted period.
    pub const MIN_PERIOD: Duration = Duration::from_millis(10);

    /// A config with the given period and no jitter.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`SecondTicker::new`]. Rules:
    /// - `period` raised to at least [`Self::MIN_PERIOD`].
    /// - `initial_jitter` capped to one `period`.
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_ms = self.period.as_secs_f64() * 1000.0,
                min_ms = Self::MIN_PERIOD.as_secs_f64() * 1000.0,
                "tick period below minimum, clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        if self.initial_jitter > self.period {
            self.initial_jitter = self.period;
        }
        self
    }
}

/// Information about one delivered tick.
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Monotonically increasing tick number since creation (starts at 1).
    pub tick: u64,
    /// Ticks dropped because the caller fell behind (0 in normal operation).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// SecondTicker
// ---------------------------------------------------------------------------

/// Cancelable fixed-period tick source.
///
/// Starts disarmed. While disarmed, [`wait_for_tick`](Self::wait_for_tick)
/// pends forever, so a `tokio::select!` branch on it simply never fires.
pub struct SecondTicker {
    config: TickerConfig,
    /// When the next tick is due; `None` while disarmed.
    next_tick: Option<Instant>,
    tick_count: u64,
    total_skipped: u64,
}

impl SecondTicker {
    /// Creates a disarmed ticker. The config is validated first.
    pub fn new(config: TickerConfig) -> Self {
        let config = config.validated();
        debug!(
            period_ms = config.period.as_secs_f64() * 1000.0,
            "ticker created"
        );
        Self {
            config,
            next_tick: None,
            tick_count: 0,
            total_skipped: 0,
        }
    }

    /// A ticker with the default one-second period.
    pub fn every_second() -> Self {
        Self::new(TickerConfig::default())
    }

    /// Schedules the first tick one period (plus jitter) from now.
    ///
    /// Re-arming an armed ticker restarts the period from now.
    pub fn arm(&mut self) {
        let jitter = if self.config.initial_jitter > Duration::ZERO {
            let max = self.config.initial_jitter.as_micros() as u64;
            Duration::from_micros(rand::rng().random_range(0..=max))
        } else {
            Duration::ZERO
        };
        self.next_tick = Some(Instant::now() + self.config.period + jitter);
        debug!(tick = self.tick_count, "ticker armed");
    }

    /// Stops delivery. No tick fires until [`arm`](Self::arm) is called
    /// again. Idempotent.
    pub fn disarm(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(tick = self.tick_count, "ticker disarmed");
        }
    }

    /// `true` while a tick is scheduled.
    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Waits until the next tick is due.
    ///
    /// Cancel-safe: dropping the future (e.g. when another `select!`
    /// branch wins) loses nothing, since no state changes until the
    /// deadline has passed.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            return std::future::pending().await;
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        let period = self.config.period;
        let mut ticks_skipped = 0u64;
        let mut following = next + period;
        if following <= now {
            let behind = now.saturating_duration_since(next);
            ticks_skipped = (behind.as_nanos() / period.as_nanos()) as u64;
            following = now + period;
            warn!(
                tick = self.tick_count + 1,
                skipped = ticks_skipped,
                late_ms = behind.as_secs_f64() * 1000.0,
                "ticker fell behind, skipping ahead"
            );
        }
        self.next_tick = Some(following);
        self.tick_count += 1;
        self.total_skipped += ticks_skipped;

        trace!(tick = self.tick_count, "tick fired");

        TickInfo {
            tick: self.tick_count,
            ticks_skipped,
        }
    }

    /// Ticks delivered since creation.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Periods skipped because the caller fell behind.
    pub fn total_skipped(&self) -> u64 {
        self.total_skipped
    }

    /// The validated tick period.
    pub fn period(&self) -> Duration {
        self.config.period
    }
}
