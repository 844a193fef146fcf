//! # Spyfall
//!
//! Core of a pass-and-play social deduction game. One device goes around
//! the table: each player privately looks at a dealt role (a location role,
//! or "Spia" for the impostors), hands the device on, and once everybody
//! has looked a round countdown starts.
//!
//! The building blocks live in their own crates and are re-exported here:
//!
//! - [`spyfall_types`]: player names, rosters, scenarios, identity maps
//! - [`spyfall_roles`]: the dealer
//! - [`spyfall_reveal`]: the reveal turn state machine
//! - [`spyfall_timer`]: the countdown and its one-second ticker
//! - [`spyfall_session`]: the session controller, its actor, and a manager
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spyfall::prelude::*;
//!
//! # async fn run() -> Result<(), SpyfallError> {
//! let table = TableBuilder::new().seed(7).spawn(SessionId(1));
//! let scenario = Scenario::new("Ristorante", ["Cameriere", "Cuoco", "Cliente"]);
//! let roster = Roster::from_names(["Anna", "Bruno", "Carla"])?;
//!
//! table.start_round(roster, &scenario, RoundConfig::default()).await?;
//! // reveal_current / acknowledge_and_advance once per player, then:
//! // table.start_timer().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod table;
pub mod telemetry;

pub use error::SpyfallError;
pub use table::TableBuilder;

pub mod prelude {
    pub use crate::{SpyfallError, TableBuilder};

    pub use spyfall_reveal::{Advance, RevealProgress, RevealSequencer, RevealState, Visibility};
    pub use spyfall_roles::{AssignmentError, RoleAssignment, RoundConfig, assign};
    pub use spyfall_session::{
        SessionConfig, SessionController, SessionError, SessionHandle, SessionLimits,
        SessionManager, SessionPhase, SessionSnapshot,
    };
    pub use spyfall_timer::{
        NotReady, RoundTimer, SecondTicker, TickerConfig, TimerEvent, TimerPhase, TimerSnapshot,
    };
    pub use spyfall_types::{
        IMPOSTOR_LABEL, IdentityEntry, IdentityMap, InvalidTransition, PlayerName, RoleLabel,
        Roster, RosterError, RoundId, Scenario, ScenarioCatalog, SessionId, choose_random,
    };
}
