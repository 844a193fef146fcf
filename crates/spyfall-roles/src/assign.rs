//! The role dealer.
//!
//! Dealing happens in two shuffles:
//!
//! 1. Shuffle a copy of the scenario pool and keep the first
//!    `players - impostors` entries. Every role is equally likely to be
//!    kept and none can repeat.
//! 2. Append the impostor labels and shuffle the combined list, so the
//!    impostor seats are independent of pool order.
//!
//! Both shuffles are Fisher–Yates via [`SliceRandom::shuffle`] over the
//! caller's random source. The same seeded source always yields the same
//! deal.

use rand::Rng;
use rand::seq::SliceRandom;
use spyfall_types::{IdentityMap, PlayerName, RoleLabel, Scenario};
use tracing::debug;

use crate::AssignmentError;
use crate::config::clamp_impostors;

/// Roles dealt for one round, one per seat in seating order.
///
/// Immutable once built. Exactly [`impostor_count`](Self::impostor_count)
/// entries are the impostor label; the rest are distinct scenario roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    roles: Vec<RoleLabel>,
    impostor_count: usize,
    requested_impostors: usize,
}

impl RoleAssignment {
    /// The role at seat `index`.
    pub fn role(&self, index: usize) -> Option<&RoleLabel> {
        self.roles.get(index)
    }

    /// All dealt roles in seating order.
    pub fn roles(&self) -> &[RoleLabel] {
        &self.roles
    }

    /// Number of seats dealt.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// `true` if no seat was dealt.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Impostor seats actually dealt.
    pub fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    /// Impostor seats the caller asked for, before clamping.
    pub fn requested_impostors(&self) -> usize {
        self.requested_impostors
    }

    /// `true` if the requested impostor count was out of range and had to
    /// be adjusted.
    pub fn was_clamped(&self) -> bool {
        self.impostor_count != self.requested_impostors
    }

    /// Pairs each seat's role with the player sitting there.
    pub fn identity_map(&self, players: &[PlayerName]) -> IdentityMap {
        IdentityMap::from_aligned(players, &self.roles)
    }
}

/// Deals roles for `player_count` seats from `scenario`.
///
/// `requested_impostors` is clamped into `1..=player_count - 1` before
/// anything else is checked.
///
/// # Errors
/// - [`AssignmentError::TooFewPlayers`] — fewer than two seats
/// - [`AssignmentError::InsufficientRoles`] — the pool is smaller than
///   the number of non-impostor seats
pub fn assign<R>(
    scenario: &Scenario,
    player_count: usize,
    requested_impostors: usize,
    rng: &mut R,
) -> Result<RoleAssignment, AssignmentError>
where
    R: Rng + ?Sized,
{
    let impostor_count = clamp_impostors(requested_impostors, player_count)
        .ok_or(AssignmentError::TooFewPlayers { player_count })?;

    let required = player_count - impostor_count;
    let available = scenario.base_pool().len();
    if required > available {
        return Err(AssignmentError::InsufficientRoles {
            required,
            available,
            scenario_name: scenario.name().to_string(),
        });
    }

    let mut roles = scenario.base_pool().to_vec();
    roles.shuffle(rng);
    roles.truncate(required);
    roles.extend(std::iter::repeat_n(RoleLabel::impostor(), impostor_count));
    roles.shuffle(rng);

    debug!(
        scenario = scenario.name(),
        players = player_count,
        impostors = impostor_count,
        requested = requested_impostors,
        "roles dealt"
    );

    Ok(RoleAssignment {
        roles,
        impostor_count,
        requested_impostors,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn restaurant() -> Scenario {
        Scenario::new("Ristorante", ["Cameriere", "Cuoco", "Cliente", "Manager"])
    }

    #[test]
    fn test_exact_fit_uses_whole_pool() {
        let scenario = Scenario::new("Kitchen", ["Chef", "Waiter"]);
        let mut rng = StdRng::seed_from_u64(7);
        let deal = assign(&scenario, 3, 1, &mut rng).unwrap();

        assert_eq!(deal.len(), 3);
        assert_eq!(deal.roles().iter().filter(|r| r.is_impostor()).count(), 1);
        let others: HashSet<_> = deal
            .roles()
            .iter()
            .filter(|r| !r.is_impostor())
            .map(|r| r.as_str())
            .collect();
        assert_eq!(others, HashSet::from(["Chef", "Waiter"]));
    }

    #[test]
    fn test_insufficient_roles_reports_counts() {
        let scenario = Scenario::new("Kitchen", ["Chef", "Waiter"]);
        let mut rng = StdRng::seed_from_u64(7);
        let err = assign(&scenario, 5, 1, &mut rng).unwrap_err();
        assert_eq!(
            err,
            AssignmentError::InsufficientRoles {
                required: 4,
                available: 2,
                scenario_name: "Kitchen".into(),
            }
        );
    }

    #[test]
    fn test_too_few_players() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            assign(&restaurant(), 1, 1, &mut rng),
            Err(AssignmentError::TooFewPlayers { player_count: 1 })
        );
        assert_eq!(
            assign(&restaurant(), 0, 1, &mut rng),
            Err(AssignmentError::TooFewPlayers { player_count: 0 })
        );
    }

    #[test]
    fn test_zero_impostors_clamped_up() {
        let mut rng = StdRng::seed_from_u64(1);
        let deal = assign(&restaurant(), 4, 0, &mut rng).unwrap();
        assert_eq!(deal.impostor_count(), 1);
        assert_eq!(deal.requested_impostors(), 0);
        assert!(deal.was_clamped());
    }

    #[test]
    fn test_all_impostors_clamped_down() {
        let mut rng = StdRng::seed_from_u64(1);
        let deal = assign(&restaurant(), 4, 9, &mut rng).unwrap();
        assert_eq!(deal.impostor_count(), 3);
        assert_eq!(deal.roles().iter().filter(|r| !r.is_impostor()).count(), 1);
    }

    #[test]
    fn test_clamping_happens_before_pool_check() {
        // 3 players asking for 0 impostors would need 3 roles; clamped to
        // 1 impostor it only needs 2, which the pool has.
        let scenario = Scenario::new("Kitchen", ["Chef", "Waiter"]);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(assign(&scenario, 3, 0, &mut rng).is_ok());
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = assign(&restaurant(), 4, 1, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = assign(&restaurant(), 4, 1, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_map_aligns_with_seats() {
        let players: Vec<PlayerName> = ["A", "B", "C"]
            .iter()
            .map(|n| PlayerName::new(n).unwrap())
            .collect();
        let deal = assign(&restaurant(), 3, 1, &mut StdRng::seed_from_u64(5)).unwrap();
        let map = deal.identity_map(&players);
        for (i, player) in players.iter().enumerate() {
            assert_eq!(map.get(player.as_str()), deal.role(i));
        }
    }
}
