//! Round countdown for Spyfall.
//!
//! Two halves:
//!
//! - [`RoundTimer`] — a plain state machine (`Idle → Running → Expired`).
//!   It has no clock; something else calls [`RoundTimer::tick`] once per
//!   elapsed second.
//! - [`SecondTicker`] — a cancelable fixed-period tick source built on
//!   `tokio::time`, for callers that want the engine to keep time itself.
//!
//! # Integration
//!
//! The ticker sits inside a session actor's `tokio::select!`
//! loop, armed only while the countdown is running:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         _ = ticker.wait_for_tick() => {
//!             let events = timer.tick();
//!             if timer.phase() != TimerPhase::Running {
//!                 ticker.disarm();
//!             }
//!         }
//!     }
//! }
//! ```

mod error;
mod ticker;
mod timer;

pub use error::NotReady;
pub use ticker::{SecondTicker, TickInfo, TickerConfig};
pub use timer::{RoundTimer, TimerEvent, TimerPhase, TimerSnapshot};
