//! Error types for role dealing.

/// Errors that can occur while dealing roles.
///
/// No partial assignment is ever produced alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    /// The scenario does not have enough distinct roles for every
    /// non-impostor seat. The caller must pick a larger scenario, fewer
    /// players, or more impostors.
    #[error(
        "scenario {scenario_name} has {available} roles but {required} non-impostor players need one each"
    )]
    InsufficientRoles {
        required: usize,
        available: usize,
        scenario_name: String,
    },

    /// At least two seats are needed so that a round has an impostor and
    /// somebody to find them.
    #[error("cannot deal roles to {player_count} players, at least 2 are required")]
    TooFewPlayers { player_count: usize },
}
