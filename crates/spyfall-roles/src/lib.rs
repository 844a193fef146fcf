//! Role dealing for Spyfall.
//!
//! Turns a scenario and a table size into one shuffled role per seat:
//! a set of distinct scenario roles plus a number of impostor labels.
//!
//! # Key types
//!
//! - [`assign`] — the dealer; pure apart from the random source it is given
//! - [`RoleAssignment`] — the dealt roles, aligned to seating order
//! - [`RoundConfig`] — impostor count and timer length for a round
//! - [`AssignmentError`] — why a deal could not be made

mod assign;
mod config;
mod error;

pub use assign::{RoleAssignment, assign};
pub use config::RoundConfig;
pub use error::AssignmentError;
