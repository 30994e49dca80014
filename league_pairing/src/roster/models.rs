//! Player data models.

use serde::{Deserialize, Serialize};

/// Round number type (1-indexed, 0 while registration is open)
pub type RoundNumber = u32;

/// Table number type (1-indexed)
pub type TableNumber = u32;

/// Points type
pub type Points = i64;

/// What a player did in a single round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round this record belongs to
    pub round: RoundNumber,
    /// Table the player sat at
    pub table: TableNumber,
    /// List the player was assigned for the round
    pub assigned_list: Option<String>,
    /// Whether the player sat the round out
    pub bye: bool,
    /// Points earned against the individual opponent
    pub player_points: Option<Points>,
    /// Points earned through list-level scoring
    pub list_points: Option<Points>,
}

impl RoundRecord {
    /// Create a record for a seated player with no points yet
    pub fn seated(round: RoundNumber, table: TableNumber, assigned_list: Option<String>) -> Self {
        Self {
            round,
            table,
            assigned_list,
            bye: false,
            player_points: None,
            list_points: None,
        }
    }

    /// Mark the record as a bye
    pub fn with_bye(mut self) -> Self {
        self.bye = true;
        self
    }

    /// Total points earned in this round, `None` if the sum overflows
    pub fn points(&self) -> Option<Points> {
        self.player_points
            .unwrap_or(0)
            .checked_add(self.list_points.unwrap_or(0))
    }
}

/// A registered player and their tournament history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    owned_list: Option<String>,
    is_anchor: bool,
    rounds: Vec<RoundRecord>,
    total_points: Points,
}

impl Player {
    /// Create a new player with no history
    pub fn new(name: impl Into<String>, owned_list: Option<String>, is_anchor: bool) -> Self {
        Self {
            name: name.into(),
            owned_list: owned_list.filter(|list| !list.is_empty()),
            is_anchor,
            rounds: Vec::new(),
            total_points: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the list this player administers, if any
    pub fn owned_list(&self) -> Option<&str> {
        self.owned_list.as_deref()
    }

    pub fn is_anchor(&self) -> bool {
        self.is_anchor
    }

    pub fn owns_list(&self, list: &str) -> bool {
        self.owned_list.as_deref() == Some(list)
    }

    /// Per-round history, ordered by round
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Record for a given round, if the player was seated in it
    pub fn record(&self, round: RoundNumber) -> Option<&RoundRecord> {
        self.rounds.iter().rev().find(|record| record.round == round)
    }

    pub(crate) fn record_mut(&mut self, round: RoundNumber) -> Option<&mut RoundRecord> {
        self.rounds
            .iter_mut()
            .rev()
            .find(|record| record.round == round)
    }

    pub(crate) fn push_record(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    /// Overwrite the record of `record.round`, if there is one
    pub(crate) fn replace_record(&mut self, record: RoundRecord) {
        if let Some(existing) = self.record_mut(record.round) {
            *existing = record;
        }
    }

    /// Tables occupied, one per round
    pub fn tables(&self) -> impl Iterator<Item = TableNumber> + Clone + '_ {
        self.rounds.iter().map(|record| record.table)
    }

    /// Lists assigned, one per round
    pub fn assigned_lists(&self) -> impl Iterator<Item = Option<&str>> + Clone + '_ {
        self.rounds
            .iter()
            .map(|record| record.assigned_list.as_deref())
    }

    /// Points earned against opponents, one per round
    pub fn player_points(&self) -> impl Iterator<Item = Option<Points>> + Clone + '_ {
        self.rounds.iter().map(|record| record.player_points)
    }

    /// Points earned through list scoring, one per round
    pub fn list_points(&self) -> impl Iterator<Item = Option<Points>> + Clone + '_ {
        self.rounds.iter().map(|record| record.list_points)
    }

    /// Cached total, kept equal to [`Player::recomputed_total`] by the scoring engine
    pub fn total_points(&self) -> Points {
        self.total_points
    }

    /// Sum of every player and list point in the history, `None` on overflow
    pub fn recomputed_total(&self) -> Option<Points> {
        sum_points(self.rounds.iter())
    }

    /// What [`Player::recomputed_total`] would be with `replacement` standing
    /// in for the record of its round
    pub fn total_with(&self, replacement: &RoundRecord) -> Option<Points> {
        sum_points(self.rounds.iter().map(|record| {
            if record.round == replacement.round {
                replacement
            } else {
                record
            }
        }))
    }

    pub(crate) fn set_total_points(&mut self, total: Points) {
        self.total_points = total;
    }

    /// Number of rounds in which this player was assigned `list`
    pub fn list_encounters(&self, list: &str) -> usize {
        self.rounds
            .iter()
            .filter(|record| !record.bye && record.assigned_list.as_deref() == Some(list))
            .count()
    }

    /// Number of byes received so far
    pub fn byes(&self) -> usize {
        self.rounds.iter().filter(|record| record.bye).count()
    }
}

fn sum_points<'a>(mut records: impl Iterator<Item = &'a RoundRecord>) -> Option<Points> {
    records.try_fold(0 as Points, |total, record| total.checked_add(record.points()?))
}
