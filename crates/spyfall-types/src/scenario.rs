//! Scenarios and the read-only catalog they are drawn from.
//!
//! The catalog itself (storage, editing, import/export) lives outside the
//! engine. The engine only ever borrows a [`Scenario`] for one round.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::RoleLabel;
use crate::types::is_impostor_label;

/// A named setting plus the pool of non-impostor roles it can deal.
///
/// The pool is normalized on construction: names are trimmed, blanks and
/// repeats are dropped, and any entry equal to the impostor label is
/// removed, since impostors are added by the assigner and never drawn
/// from the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScenarioRecord", into = "ScenarioRecord")]
pub struct Scenario {
    name: String,
    base_pool: Vec<RoleLabel>,
}

impl Scenario {
    /// Builds a scenario, normalizing the role pool (see the type docs).
    pub fn new<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut base_pool: Vec<RoleLabel> = Vec::new();
        for role in roles {
            let role = role.as_ref().trim();
            if role.is_empty() || is_impostor_label(role) {
                continue;
            }
            let label = RoleLabel::new(role);
            if !base_pool.contains(&label) {
                base_pool.push(label);
            }
        }
        Self {
            name: name.into().trim().to_string(),
            base_pool,
        }
    }

    /// The scenario's name; this is what impostors try to guess.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-impostor roles, in catalog order.
    pub fn base_pool(&self) -> &[RoleLabel] {
        &self.base_pool
    }
}

/// On-the-wire shape: `{ "name": ..., "roles": [...] }`.
#[derive(Serialize, Deserialize)]
struct ScenarioRecord {
    name: String,
    roles: Vec<String>,
}

impl From<ScenarioRecord> for Scenario {
    fn from(record: ScenarioRecord) -> Self {
        Self::new(record.name, record.roles)
    }
}

impl From<Scenario> for ScenarioRecord {
    fn from(scenario: Scenario) -> Self {
        Self {
            name: scenario.name,
            roles: scenario
                .base_pool
                .into_iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScenarioCatalog
// ---------------------------------------------------------------------------

/// Read-only access to an ordered collection of scenarios.
///
/// Implemented for slices and `Vec<Scenario>`; a persistent catalog only
/// needs to hand out a slice.
pub trait ScenarioCatalog {
    fn scenarios(&self) -> &[Scenario];

    /// Looks a scenario up by exact name.
    fn by_name(&self, name: &str) -> Option<&Scenario> {
        self.scenarios().iter().find(|s| s.name() == name)
    }
}

impl ScenarioCatalog for [Scenario] {
    fn scenarios(&self) -> &[Scenario] {
        self
    }
}

impl ScenarioCatalog for Vec<Scenario> {
    fn scenarios(&self) -> &[Scenario] {
        self
    }
}

/// Picks a scenario uniformly at random. `None` for an empty catalog.
pub fn choose_random<'a, C, R>(catalog: &'a C, rng: &mut R) -> Option<&'a Scenario>
where
    C: ScenarioCatalog + ?Sized,
    R: Rng + ?Sized,
{
    catalog.scenarios().choose(rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn labels(s: &Scenario) -> Vec<&str> {
        s.base_pool().iter().map(|r| r.as_str()).collect()
    }

    #[test]
    fn test_new_strips_impostor_blank_and_repeats() {
        let s = Scenario::new(
            " Ristorante ",
            ["Cameriere", " Cuoco ", "", "spia", "Cuoco", "Spia", "Cliente"],
        );
        assert_eq!(s.name(), "Ristorante");
        assert_eq!(labels(&s), vec!["Cameriere", "Cuoco", "Cliente"]);
    }

    #[test]
    fn test_deserialize_normalizes_pool() {
        let s: Scenario = serde_json::from_str(
            r#"{"name":"Aeroporto","roles":["Pilota","Spia","Pilota"]}"#,
        )
        .unwrap();
        assert_eq!(labels(&s), vec!["Pilota"]);

        let back = serde_json::to_value(&s).unwrap();
        assert_eq!(back, serde_json::json!({"name":"Aeroporto","roles":["Pilota"]}));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = vec![
            Scenario::new("Ristorante", ["Cuoco"]),
            Scenario::new("Aeroporto", ["Pilota"]),
        ];
        assert_eq!(catalog.by_name("Aeroporto").map(|s| s.name()), Some("Aeroporto"));
        assert!(catalog.by_name("Spiaggia").is_none());
    }

    #[test]
    fn test_choose_random_empty_catalog() {
        let catalog: Vec<Scenario> = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(choose_random(&catalog, &mut rng).is_none());
    }

    #[test]
    fn test_choose_random_reaches_every_scenario() {
        let catalog = vec![
            Scenario::new("A", ["x"]),
            Scenario::new("B", ["y"]),
            Scenario::new("C", ["z"]),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(choose_random(&catalog, &mut rng).unwrap().name().to_string());
        }
        assert_eq!(seen.len(), 3);
    }
}
