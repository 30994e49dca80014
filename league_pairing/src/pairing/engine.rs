//! Swiss-style pairing engine.
//!
//! Players are ranked by total points (name breaks ties) and paired from the
//! top down. The engine searches for a pairing in three passes, relaxing one
//! constraint at a time:
//!
//! 1. no repeat pairings and no pairings the anchor policy refuses,
//! 2. no repeat pairings,
//! 3. greedy, allowing anything but still preferring clean matchups.
//!
//! Every repeat or anchor clash in the final pairing is reported as a
//! [`PairingWarning`].

use std::{cmp::Reverse, sync::Arc};

use super::{
    anchor::{AnchorPolicy, SeparateAnchors},
    models::{Pairing, PairingHistory, PairingId, PairingWarning, RoundPairings},
};
use crate::roster::{Player, RoundNumber};
use crate::tournament::{TournamentError, TournamentResult};

/// Maximum number of search nodes per backtracking pass
pub const DEFAULT_SEARCH_BUDGET: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    Strict,
    NoRepeats,
}

/// Produces the pairings of a round
#[derive(Debug, Clone)]
pub struct PairingEngine {
    policy: Arc<dyn AnchorPolicy>,
    search_budget: usize,
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new(Arc::new(SeparateAnchors))
    }
}

impl PairingEngine {
    pub fn new(policy: Arc<dyn AnchorPolicy>) -> Self {
        Self {
            policy,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }

    pub fn with_search_budget(mut self, budget: usize) -> Self {
        self.search_budget = budget;
        self
    }

    /// Rank players by total points descending, then by name
    pub fn rank<'a>(players: &[&'a Player]) -> Vec<&'a Player> {
        let mut ranked = players.to_vec();
        ranked.sort_by(|a, b| {
            b.total_points()
                .cmp(&a.total_points())
                .then_with(|| a.name().cmp(b.name()))
        });
        ranked
    }

    /// Times `a` and `b` have faced each other's list
    pub fn list_meetings(a: &Player, b: &Player) -> usize {
        b.owned_list().map_or(0, |list| a.list_encounters(list))
            + a.owned_list().map_or(0, |list| b.list_encounters(list))
    }

    /// Pair every player of the round
    ///
    /// # Errors
    ///
    /// `PairingInfeasible` when fewer than two players are eligible.
    pub fn pair_round(
        &self,
        round: RoundNumber,
        players: &[&Player],
        history: &PairingHistory,
    ) -> TournamentResult<RoundPairings> {
        if players.len() < 2 {
            return Err(TournamentError::PairingInfeasible {
                needed: 2,
                eligible: players.len(),
            });
        }

        let mut ranked = Self::rank(players);
        let bye = if ranked.len() % 2 == 1 {
            ranked.pop().map(|player| player.name().to_string())
        } else {
            None
        };

        let matches = self
            .search(&ranked, history, Constraint::Strict)
            .or_else(|| {
                log::debug!("Round {round}: no pairing keeps anchors apart, relaxing");
                self.search(&ranked, history, Constraint::NoRepeats)
            })
            .unwrap_or_else(|| {
                log::debug!("Round {round}: repeat pairings unavoidable, pairing greedily");
                self.greedy(&ranked, history)
            });

        let mut result = RoundPairings {
            pairings: Vec::with_capacity(matches.len()),
            bye,
            warnings: Vec::new(),
        };
        for (number, (i, j)) in matches.into_iter().enumerate() {
            let id = PairingId::new(round, number as u32 + 1);
            let (pairing, warnings) = self.build_pairing(id, ranked[i], ranked[j], history);
            result.pairings.push(pairing);
            result.warnings.extend(warnings);
        }

        for warning in &result.warnings {
            log::warn!("Round {round}: {warning}");
        }
        log::info!(
            "Round {round}: paired {} tables{}",
            result.pairings.len(),
            result
                .bye
                .as_deref()
                .map(|name| format!(", bye for {name}"))
                .unwrap_or_default()
        );
        Ok(result)
    }

    /// Build a pairing and the warnings it raises
    pub fn build_pairing(
        &self,
        id: PairingId,
        a: &Player,
        b: &Player,
        history: &PairingHistory,
    ) -> (Pairing, Vec<PairingWarning>) {
        let mut pairing = Pairing::new(id, a.name(), b.name());
        let mut warnings = Vec::new();
        if history.met(a.name(), b.name()) {
            pairing.repeat = true;
            warnings.push(PairingWarning::RepeatPairing {
                player1: a.name().to_string(),
                player2: b.name().to_string(),
            });
        }
        if !self.policy.allows(a, b) {
            warnings.push(PairingWarning::AnchorsPaired {
                player1: a.name().to_string(),
                player2: b.name().to_string(),
            });
        }
        (pairing, warnings)
    }

    /// Unused players below `top`, in preference order: points group first,
    /// then fewest meetings with each other's list, then ranking.
    fn candidates(&self, ranked: &[&Player], used: &[bool], top: usize) -> Vec<usize> {
        let mut candidates: Vec<usize> = (top + 1..ranked.len()).filter(|&i| !used[i]).collect();
        candidates.sort_by_key(|&i| {
            (
                Reverse(ranked[i].total_points()),
                Self::list_meetings(ranked[top], ranked[i]),
                i,
            )
        });
        candidates
    }

    fn admissible(
        &self,
        a: &Player,
        b: &Player,
        history: &PairingHistory,
        constraint: Constraint,
    ) -> bool {
        if history.met(a.name(), b.name()) {
            return false;
        }
        constraint == Constraint::NoRepeats || self.policy.allows(a, b)
    }

    fn search(
        &self,
        ranked: &[&Player],
        history: &PairingHistory,
        constraint: Constraint,
    ) -> Option<Vec<(usize, usize)>> {
        let mut used = vec![false; ranked.len()];
        let mut matches = Vec::with_capacity(ranked.len() / 2);
        let mut budget = self.search_budget;
        self.extend(
            ranked,
            history,
            constraint,
            &mut used,
            &mut matches,
            &mut budget,
        )
        .then_some(matches)
    }

    fn extend(
        &self,
        ranked: &[&Player],
        history: &PairingHistory,
        constraint: Constraint,
        used: &mut [bool],
        matches: &mut Vec<(usize, usize)>,
        budget: &mut usize,
    ) -> bool {
        let Some(top) = used.iter().position(|taken| !taken) else {
            return true;
        };
        if *budget == 0 {
            return false;
        }
        *budget -= 1;

        used[top] = true;
        for candidate in self.candidates(ranked, used, top) {
            if !self.admissible(ranked[top], ranked[candidate], history, constraint) {
                continue;
            }
            used[candidate] = true;
            matches.push((top, candidate));
            if self.extend(ranked, history, constraint, used, matches, budget) {
                return true;
            }
            matches.pop();
            used[candidate] = false;
            if *budget == 0 {
                break;
            }
        }
        used[top] = false;
        false
    }

    fn greedy(&self, ranked: &[&Player], history: &PairingHistory) -> Vec<(usize, usize)> {
        let mut used = vec![false; ranked.len()];
        let mut matches = Vec::with_capacity(ranked.len() / 2);
        while let Some(top) = used.iter().position(|taken| !taken) {
            used[top] = true;
            let candidates = self.candidates(ranked, &used, top);
            let pick = [Constraint::Strict, Constraint::NoRepeats]
                .into_iter()
                .find_map(|constraint| {
                    candidates.iter().copied().find(|&candidate| {
                        self.admissible(ranked[top], ranked[candidate], history, constraint)
                    })
                })
                .or_else(|| candidates.first().copied());
            match pick {
                Some(candidate) => {
                    used[candidate] = true;
                    matches.push((top, candidate));
                }
                // only reachable with an odd count, which the bye already removed
                None => break,
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::anchor::IgnoreAnchors;
    use crate::roster::RoundRecord;

    fn player(name: &str) -> Player {
        Player::new(name, None, false)
    }

    fn with_points(name: &str, points: i64) -> Player {
        let mut player = player(name);
        player.push_record(RoundRecord {
            player_points: Some(points),
            ..RoundRecord::seated(1, 1, None)
        });
        player.set_total_points(points);
        player
    }

    fn names(pairings: &RoundPairings) -> Vec<(&str, &str)> {
        pairings
            .pairings
            .iter()
            .map(|p| (p.player1.as_str(), p.player2.as_str()))
            .collect()
    }

    #[test]
    fn test_four_fresh_players() {
        let players = [player("Dave"), player("Bob"), player("Alice"), player("Carol")];
        let refs: Vec<&Player> = players.iter().collect();
        let result = PairingEngine::default()
            .pair_round(1, &refs, &PairingHistory::new())
            .unwrap();

        assert_eq!(names(&result), vec![("Alice", "Bob"), ("Carol", "Dave")]);
        assert_eq!(result.bye, None);
        assert!(result.warnings.is_empty());
        assert_eq!(result.pairings[0].id, PairingId::new(1, 1));
        assert_eq!(result.pairings[1].id, PairingId::new(1, 2));
    }

    #[test]
    fn test_ranking_by_points_then_name() {
        let players = [
            with_points("Alice", 10),
            with_points("Bob", 5),
            with_points("Carol", 7),
            with_points("Dave", 7),
        ];
        let refs: Vec<&Player> = players.iter().collect();
        let ranked: Vec<_> = PairingEngine::rank(&refs)
            .into_iter()
            .map(Player::name)
            .collect();
        assert_eq!(ranked, vec!["Alice", "Carol", "Dave", "Bob"]);
    }

    #[test]
    fn test_odd_roster_gives_lowest_ranked_a_bye() {
        let players = [
            with_points("Alice", 3),
            with_points("Bob", 2),
            with_points("Carol", 1),
        ];
        let refs: Vec<&Player> = players.iter().collect();
        let result = PairingEngine::default()
            .pair_round(2, &refs, &PairingHistory::new())
            .unwrap();
        assert_eq!(result.bye.as_deref(), Some("Carol"));
        assert_eq!(names(&result), vec![("Alice", "Bob")]);
    }

    #[test]
    fn test_avoids_repeats_when_possible() {
        let players = [player("Alice"), player("Bob"), player("Carol"), player("Dave")];
        let refs: Vec<&Player> = players.iter().collect();
        let mut history = PairingHistory::new();
        history.record("Alice", "Bob");
        history.record("Carol", "Dave");

        let result = PairingEngine::default()
            .pair_round(2, &refs, &history)
            .unwrap();
        assert_eq!(names(&result), vec![("Alice", "Carol"), ("Bob", "Dave")]);
        assert!(result.pairings.iter().all(|p| !p.repeat));
    }

    #[test]
    fn test_backtracks_instead_of_repeating() {
        // Greedy top-down would give Alice-Carol, leaving Bob-Dave (a repeat).
        let players = [player("Alice"), player("Bob"), player("Carol"), player("Dave")];
        let refs: Vec<&Player> = players.iter().collect();
        let mut history = PairingHistory::new();
        history.record("Alice", "Bob");
        history.record("Bob", "Dave");

        let result = PairingEngine::default()
            .pair_round(2, &refs, &history)
            .unwrap();
        assert_eq!(names(&result), vec![("Alice", "Dave"), ("Bob", "Carol")]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unavoidable_repeat_is_a_warning() {
        let players = [player("Alice"), player("Bob")];
        let refs: Vec<&Player> = players.iter().collect();
        let mut history = PairingHistory::new();
        history.record("Alice", "Bob");

        let result = PairingEngine::default()
            .pair_round(2, &refs, &history)
            .unwrap();
        assert_eq!(names(&result), vec![("Alice", "Bob")]);
        assert!(result.pairings[0].repeat);
        assert_eq!(
            result.warnings,
            vec![PairingWarning::RepeatPairing {
                player1: "Alice".to_string(),
                player2: "Bob".to_string(),
            }]
        );
    }

    #[test]
    fn test_anchors_kept_apart() {
        let players = [
            Player::new("Alice", None, true),
            Player::new("Bob", None, true),
            player("Carol"),
            player("Dave"),
        ];
        let refs: Vec<&Player> = players.iter().collect();
        let result = PairingEngine::default()
            .pair_round(1, &refs, &PairingHistory::new())
            .unwrap();
        assert_eq!(names(&result), vec![("Alice", "Carol"), ("Bob", "Dave")]);

        let ignoring = PairingEngine::new(Arc::new(IgnoreAnchors))
            .pair_round(1, &refs, &PairingHistory::new())
            .unwrap();
        assert_eq!(names(&ignoring), vec![("Alice", "Bob"), ("Carol", "Dave")]);
    }

    #[test]
    fn test_repeat_avoidance_outranks_anchor_separation() {
        let players = [
            Player::new("Alice", None, true),
            Player::new("Bob", None, true),
            player("Carol"),
            player("Dave"),
        ];
        let refs: Vec<&Player> = players.iter().collect();
        let mut history = PairingHistory::new();
        history.record("Alice", "Carol");
        history.record("Alice", "Dave");

        let result = PairingEngine::default()
            .pair_round(3, &refs, &history)
            .unwrap();
        assert_eq!(names(&result), vec![("Alice", "Bob"), ("Carol", "Dave")]);
        assert_eq!(
            result.warnings,
            vec![PairingWarning::AnchorsPaired {
                player1: "Alice".to_string(),
                player2: "Bob".to_string(),
            }]
        );
    }

    #[test]
    fn test_prefers_unfamiliar_list_within_points_group() {
        let mut alice = Player::new("Alice", Some("Red".to_string()), false);
        alice.push_record(RoundRecord::seated(1, 1, Some("Blue".to_string())));
        let bob = Player::new("Bob", Some("Blue".to_string()), false);
        let carol = Player::new("Carol", Some("Green".to_string()), false);
        let dave = player("Dave");

        let players = [alice, bob, carol, dave];
        let refs: Vec<&Player> = players.iter().collect();
        let result = PairingEngine::default()
            .pair_round(2, &refs, &PairingHistory::new())
            .unwrap();
        // Alice has already faced Blue, so Carol is preferred over Bob
        assert_eq!(names(&result), vec![("Alice", "Carol"), ("Bob", "Dave")]);
    }

    #[test]
    fn test_too_few_players() {
        let players = [player("Alice")];
        let refs: Vec<&Player> = players.iter().collect();
        assert_eq!(
            PairingEngine::default()
                .pair_round(1, &refs, &PairingHistory::new())
                .unwrap_err(),
            TournamentError::PairingInfeasible {
                needed: 2,
                eligible: 1
            }
        );
    }

    #[test]
    fn test_exhausted_budget_still_covers_everyone() {
        let players: Vec<Player> = (0..8).map(|i| player(&format!("P{i}"))).collect();
        let refs: Vec<&Player> = players.iter().collect();
        let mut history = PairingHistory::new();
        for a in &players {
            for b in &players {
                if a.name() != b.name() {
                    history.record(a.name(), b.name());
                }
            }
        }

        let result = PairingEngine::default()
            .with_search_budget(1)
            .pair_round(5, &refs, &history)
            .unwrap();
        assert_eq!(result.pairings.len(), 4);
        assert_eq!(result.warnings.len(), 4);
    }
}
