//! Table assignment engine.

use serde::{Deserialize, Serialize};

use crate::pairing::{Pairing, PairingId};
use crate::roster::{RosterStore, RoundNumber, RoundRecord, TableNumber};
use crate::tournament::{TournamentError, TournamentResult};

/// Players seated at a table for one pairing (or the bye)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAssignment {
    pub table: TableNumber,
    /// `None` for the bye seat
    pub pairing: Option<PairingId>,
    pub players: Vec<String>,
}

impl TableAssignment {
    pub fn is_bye(&self) -> bool {
        self.pairing.is_none()
    }
}

/// Seats pairings at numbered tables
///
/// Seats are filled in pairing order, two per pairing, with the bye player in
/// the next free seat. `players_per_table` is even, so a pairing never spans
/// two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentEngine {
    players_per_table: u32,
}

impl AssignmentEngine {
    pub fn new(players_per_table: u32) -> Self {
        Self { players_per_table }
    }

    /// Tables needed for `active_players`
    pub fn table_count(&self, active_players: usize) -> u32 {
        (active_players as u32).div_ceil(self.players_per_table)
    }

    fn table_for_seat(&self, seat: u32) -> TableNumber {
        seat / self.players_per_table + 1
    }

    /// Seat the round
    pub fn assign(&self, pairings: &[Pairing], bye: Option<&str>) -> Vec<TableAssignment> {
        let mut seat = 0;
        let mut assignments = Vec::with_capacity(pairings.len() + usize::from(bye.is_some()));
        for pairing in pairings {
            assignments.push(TableAssignment {
                table: self.table_for_seat(seat),
                pairing: Some(pairing.id),
                players: vec![pairing.player1.clone(), pairing.player2.clone()],
            });
            seat += 2;
        }
        if let Some(name) = bye {
            assignments.push(TableAssignment {
                table: self.table_for_seat(seat),
                pairing: None,
                players: vec![name.to_string()],
            });
        }
        assignments
    }

    /// Per-player records for a seated round
    ///
    /// Each player is assigned their opponent's list; a bye player keeps
    /// their own. Nothing is written to the roster here.
    pub fn round_records(
        &self,
        round: RoundNumber,
        pairings: &[Pairing],
        assignments: &[TableAssignment],
        roster: &RosterStore,
    ) -> TournamentResult<Vec<(String, RoundRecord)>> {
        let mut records = Vec::new();
        for assignment in assignments {
            match assignment.pairing {
                Some(id) => {
                    let pairing = pairings
                        .iter()
                        .find(|pairing| pairing.id == id)
                        .ok_or(TournamentError::PairingNotFound(id))?;
                    for (name, opponent) in [
                        (&pairing.player1, &pairing.player2),
                        (&pairing.player2, &pairing.player1),
                    ] {
                        roster.get(name)?;
                        let list = roster.get(opponent)?.owned_list().map(str::to_string);
                        records.push((
                            name.clone(),
                            RoundRecord::seated(round, assignment.table, list),
                        ));
                    }
                }
                None => {
                    for name in &assignment.players {
                        let list = roster.get(name)?.owned_list().map(str::to_string);
                        records.push((
                            name.clone(),
                            RoundRecord::seated(round, assignment.table, list).with_bye(),
                        ));
                    }
                }
            }
        }
        Ok(records)
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(2)
    }
}
