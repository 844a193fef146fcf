//! The ordered list of players sitting at the table.

use serde::{Deserialize, Serialize};

use crate::{PlayerName, RosterError};

/// Players in seating order. Names are unique and non-empty.
///
/// Seating order matters: roles are dealt positionally and reveal turns
/// walk the roster from index 0 upwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    players: Vec<PlayerName>,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from names in seating order.
    ///
    /// # Errors
    /// The first [`RosterError::EmptyName`] or [`RosterError::DuplicateName`]
    /// encountered.
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            roster.add(name)?;
        }
        Ok(roster)
    }

    /// Appends a player at the end of the seating order.
    ///
    /// The name is trimmed first; duplicates are compared after trimming.
    pub fn add(&mut self, name: impl AsRef<str>) -> Result<&PlayerName, RosterError> {
        let name = PlayerName::new(name)?;
        if self.players.contains(&name) {
            return Err(RosterError::DuplicateName(name.into()));
        }
        self.players.push(name);
        Ok(&self.players[self.players.len() - 1])
    }

    /// Removes a player, closing the gap in seating order.
    pub fn remove(&mut self, name: &str) -> Result<PlayerName, RosterError> {
        let name = name.trim();
        let pos = self
            .players
            .iter()
            .position(|p| p.as_str() == name)
            .ok_or_else(|| RosterError::UnknownPlayer(name.to_string()))?;
        Ok(self.players.remove(pos))
    }

    /// `true` if a player with exactly this (trimmed) name is seated.
    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.as_str() == name.trim())
    }

    /// The player at seat `index`.
    pub fn get(&self, index: usize) -> Option<&PlayerName> {
        self.players.get(index)
    }

    /// Players in seating order.
    pub fn players(&self) -> &[PlayerName] {
        &self.players
    }

    /// Number of seated players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// `true` if nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl TryFrom<Vec<String>> for Roster {
    type Error = RosterError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(names)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.players.into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_seating_order() {
        let roster = Roster::from_names(["Anna", "Bo", "Cleo"]).unwrap();
        let names: Vec<_> = roster.players().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["Anna", "Bo", "Cleo"]);
    }

    #[test]
    fn test_add_rejects_duplicate_after_trim() {
        let mut roster = Roster::new();
        roster.add("Anna").unwrap();
        let result = roster.add("  Anna  ");
        assert_eq!(result, Err(RosterError::DuplicateName("Anna".into())));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_add_rejects_empty() {
        let mut roster = Roster::new();
        assert_eq!(roster.add("  "), Err(RosterError::EmptyName));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_remove_closes_gap() {
        let mut roster = Roster::from_names(["A", "B", "C"]).unwrap();
        let removed = roster.remove("B").unwrap();
        assert_eq!(removed.as_str(), "B");
        assert_eq!(roster.get(1).map(|p| p.as_str()), Some("C"));
        assert!(!roster.contains("B"));
    }

    #[test]
    fn test_remove_unknown_player() {
        let mut roster = Roster::from_names(["A"]).unwrap();
        assert_eq!(
            roster.remove("Z"),
            Err(RosterError::UnknownPlayer("Z".into()))
        );
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let ok: Roster = serde_json::from_str(r#"["A","B"]"#).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(serde_json::from_str::<Roster>(r#"["A","A"]"#).is_err());
    }
}
