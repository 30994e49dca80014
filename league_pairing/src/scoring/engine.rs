//! Score validation, totals and standings.

use crate::pairing::MatchResult;
use crate::roster::{Player, Points, RosterStore, RoundRecord};
use crate::tournament::{TournamentError, TournamentResult};

/// Standings order: total points descending, then name
pub type Standings<'a> = std::vec::IntoIter<&'a Player>;

/// Validates submissions and keeps cached totals in sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringEngine {
    allow_ties: bool,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ScoringEngine {
    pub fn new(allow_ties: bool) -> Self {
        Self { allow_ties }
    }

    /// Check a pairing result
    ///
    /// # Errors
    ///
    /// `InvalidScore` for a negative score, or for equal scores (0-0
    /// included) when ties are not allowed.
    pub fn validate_result(
        &self,
        player1_score: Points,
        player2_score: Points,
    ) -> TournamentResult<MatchResult> {
        if player1_score < 0 || player2_score < 0 {
            return Err(TournamentError::InvalidScore(format!(
                "scores must not be negative, got {player1_score}-{player2_score}"
            )));
        }
        if !self.allow_ties && player1_score == player2_score {
            return Err(TournamentError::InvalidScore(format!(
                "a decisive result is required, got {player1_score}-{player2_score}"
            )));
        }
        Ok(MatchResult {
            player1_score,
            player2_score,
        })
    }

    pub fn validate_list_points(&self, points: Points) -> TournamentResult<Points> {
        if points < 0 {
            return Err(TournamentError::InvalidScore(format!(
                "list points must not be negative, got {points}"
            )));
        }
        Ok(points)
    }

    /// Reset every cached total to the sum of the player's history.
    /// Calling it again without new submissions changes nothing.
    ///
    /// # Errors
    ///
    /// `InvalidScore` if some history no longer fits in [`Points`]; no total
    /// is touched in that case.
    pub fn recompute_totals(&self, roster: &mut RosterStore) -> TournamentResult<()> {
        let totals = roster
            .iter()
            .map(|player| {
                player.recomputed_total().ok_or_else(|| {
                    TournamentError::InvalidScore(format!(
                        "total points of {} overflow",
                        player.name()
                    ))
                })
            })
            .collect::<TournamentResult<Vec<Points>>>()?;

        for (player, total) in roster.iter_mut().zip(totals) {
            player.set_total_points(total);
        }
        debug_assert!(
            roster
                .iter()
                .all(|player| Some(player.total_points()) == player.recomputed_total())
        );
        Ok(())
    }

    /// Total `player` would reach with `record` replacing the record of its
    /// round
    ///
    /// # Errors
    ///
    /// `InvalidScore` when that total overflows.
    pub fn checked_total(&self, player: &Player, record: &RoundRecord) -> TournamentResult<Points> {
        player.total_with(record).ok_or_else(|| {
            TournamentError::InvalidScore(format!(
                "total points of {} would overflow",
                player.name()
            ))
        })
    }

    /// Players ordered by total points descending, then name. The order is
    /// sorted up front; the iterator can be cloned to restart it.
    pub fn standings<'a>(&self, roster: &'a RosterStore) -> Standings<'a> {
        let mut players: Vec<&Player> = roster.iter().collect();
        players.sort_by(|a, b| {
            b.total_points()
                .cmp(&a.total_points())
                .then_with(|| a.name().cmp(b.name()))
        });
        players.into_iter()
    }
}
