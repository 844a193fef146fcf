//! Reveal turns for Spyfall.
//!
//! The device is passed around the table; each player in turn looks at
//! their role once, then hides it and passes on. [`RevealSequencer`]
//! enforces that order and makes sure no earlier role can be shown again.

mod sequencer;

pub use sequencer::{Advance, RevealProgress, RevealSequencer, RevealState, Visibility};
pub use spyfall_types::InvalidTransition;
