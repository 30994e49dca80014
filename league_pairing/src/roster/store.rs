//! Insertion-ordered store of registered players.

use super::models::Player;
use crate::tournament::{TournamentError, TournamentResult};

/// Registered players, kept in the order they signed up
///
/// Phase gating lives in [`crate::Tournament`]; the store only guards
/// identity (unique, non-empty names).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterStore {
    players: Vec<Player>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player
    ///
    /// # Errors
    ///
    /// `InvalidName` for a blank name, `DuplicateName` if the name is taken.
    pub fn insert(&mut self, player: Player) -> TournamentResult<()> {
        if player.name().trim().is_empty() || player.name().trim() != player.name() {
            return Err(TournamentError::InvalidName(player.name().to_string()));
        }
        if self.contains(player.name()) {
            return Err(TournamentError::DuplicateName(player.name().to_string()));
        }
        self.players.push(player);
        Ok(())
    }

    pub fn get(&self, name: &str) -> TournamentResult<&Player> {
        self.players
            .iter()
            .find(|player| player.name() == name)
            .ok_or_else(|| TournamentError::PlayerNotFound(name.to_string()))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> TournamentResult<&mut Player> {
        self.players
            .iter_mut()
            .find(|player| player.name() == name)
            .ok_or_else(|| TournamentError::PlayerNotFound(name.to_string()))
    }

    /// Remove a player, returning it
    pub fn remove(&mut self, name: &str) -> TournamentResult<Player> {
        let index = self
            .players
            .iter()
            .position(|player| player.name() == name)
            .ok_or_else(|| TournamentError::PlayerNotFound(name.to_string()))?;
        Ok(self.players.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|player| player.name() == name)
    }

    /// Players in insertion order. The iterator is cheap to clone, so it can
    /// be restarted from any point.
    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Player> {
        self.players.iter_mut()
    }

    /// Players owning `list`
    pub fn players_in_list<'a>(&'a self, list: &'a str) -> impl Iterator<Item = &'a Player> + Clone {
        self.players.iter().filter(move |player| player.owns_list(list))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl<'a> IntoIterator for &'a RosterStore {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> RosterStore {
        let mut roster = RosterStore::new();
        for name in names {
            roster.insert(Player::new(*name, None, false)).unwrap();
        }
        roster
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let roster = roster(&["Carol", "Alice", "Bob"]);
        let names: Vec<_> = roster.iter().map(Player::name).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_iterator_restarts() {
        let roster = roster(&["Alice", "Bob"]);
        let mut iter = roster.iter();
        iter.next();
        let restarted = roster.iter();
        assert_eq!(iter.count(), 1);
        assert_eq!(restarted.count(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut roster = roster(&["Alice"]);
        let err = roster
            .insert(Player::new("Alice", Some("Red".to_string()), true))
            .unwrap_err();
        assert_eq!(err, TournamentError::DuplicateName("Alice".to_string()));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_blank_and_padded_names_rejected() {
        let mut roster = RosterStore::new();
        assert!(matches!(
            roster.insert(Player::new("  ", None, false)),
            Err(TournamentError::InvalidName(_))
        ));
        assert!(matches!(
            roster.insert(Player::new(" Alice", None, false)),
            Err(TournamentError::InvalidName(_))
        ));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_get_and_remove() {
        let mut roster = roster(&["Alice", "Bob"]);
        assert_eq!(roster.get("Bob").unwrap().name(), "Bob");
        assert_eq!(
            roster.get("Zed").unwrap_err(),
            TournamentError::PlayerNotFound("Zed".to_string())
        );

        let removed = roster.remove("Alice").unwrap();
        assert_eq!(removed.name(), "Alice");
        assert!(!roster.contains("Alice"));
        assert!(roster.remove("Alice").is_err());
    }

    #[test]
    fn test_players_in_list() {
        let mut roster = RosterStore::new();
        roster
            .insert(Player::new("Alice", Some("Red".to_string()), false))
            .unwrap();
        roster.insert(Player::new("Bob", None, false)).unwrap();
        let owners: Vec<_> = roster.players_in_list("Red").map(Player::name).collect();
        assert_eq!(owners, vec!["Alice"]);
        assert_eq!(roster.players_in_list("Blue").count(), 0);
    }
}
