//! Session management for Spyfall.
//!
//! A session is one table playing rounds: deal roles, pass the device
//! around for reveal turns, run the countdown, show who was who.
//!
//! # Key types
//!
//! - [`SessionController`] — the synchronous state machine a view layer drives
//! - [`SessionSnapshot`] — what a view layer may render at any instant
//! - [`SessionHandle`] — the controller running as an actor with its own clock
//! - [`SessionManager`] — hosts several sessions keyed by ID
//! - [`SessionPhase`] — Setup → RoundInProgress → RoundEnded
//!
//! # How it fits in the stack
//!
//! ```text
//! View layer (above)  ← renders snapshots, forwards button presses
//!     ↕
//! Session layer (this crate)  ← owns the one round in play
//!     ↕
//! spyfall-roles / spyfall-reveal / spyfall-timer  ← the three state machines
//! ```

mod actor;
mod config;
mod controller;
mod error;
mod manager;
mod snapshot;

pub use actor::SessionHandle;
pub use config::{SessionConfig, SessionLimits, SessionPhase};
pub use controller::{SessionController, TickObserver};
pub use error::SessionError;
pub use manager::SessionManager;
pub use snapshot::SessionSnapshot;
