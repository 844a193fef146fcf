//! Shared vocabulary for Spyfall.
//!
//! This crate defines the values every other layer passes around:
//!
//! - **Identity** ([`PlayerName`], [`RoundId`], [`SessionId`]) — who is
//!   playing and which round/table an event belongs to.
//! - **Roles** ([`RoleLabel`], [`IdentityMap`]) — what a player was dealt,
//!   and the final reveal once a round is over.
//! - **Setup** ([`Roster`], [`Scenario`], [`ScenarioCatalog`]) — the inputs
//!   a round is started from.
//!
//! # Architecture
//!
//! Nothing here knows about turns, timers, or sessions. The engine crates
//! build on these types:
//!
//! ```text
//! spyfall-types → spyfall-roles / spyfall-reveal / spyfall-timer → spyfall-session
//! ```

mod error;
mod roster;
mod scenario;
mod types;

pub use error::{InvalidTransition, RosterError};
pub use roster::Roster;
pub use scenario::{Scenario, ScenarioCatalog, choose_random};
pub use types::{IMPOSTOR_LABEL, IdentityEntry, IdentityMap, PlayerName, RoleLabel, RoundId, SessionId};
