//! Per-round history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assignment::TableAssignment;
use crate::pairing::{Pairing, PairingId, PairingWarning, RoundPairings};
use crate::roster::{Points, RoundNumber};

/// Everything decided for one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub number: RoundNumber,
    pub pairings: Vec<Pairing>,
    pub bye: Option<String>,
    pub warnings: Vec<PairingWarning>,
    pub assignments: Vec<TableAssignment>,
    /// List scores submitted this round, by list name
    pub list_scores: BTreeMap<String, Points>,
}

impl RoundState {
    pub fn new(number: RoundNumber) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn pairing(&self, id: PairingId) -> Option<&Pairing> {
        self.pairings.iter().find(|pairing| pairing.id == id)
    }

    pub(crate) fn pairing_mut(&mut self, id: PairingId) -> Option<&mut Pairing> {
        self.pairings.iter_mut().find(|pairing| pairing.id == id)
    }

    pub fn pairing_of(&self, name: &str) -> Option<&Pairing> {
        self.pairings.iter().find(|pairing| pairing.involves(name))
    }

    /// Whether the player is paired or holds the bye
    pub fn is_placed(&self, name: &str) -> bool {
        self.bye.as_deref() == Some(name) || self.pairing_of(name).is_some()
    }

    pub fn tables_assigned(&self) -> bool {
        !self.assignments.is_empty()
    }

    /// Pairings still waiting for a result
    pub fn pending(&self) -> Vec<PairingId> {
        self.pairings
            .iter()
            .filter(|pairing| !pairing.is_decided())
            .map(|pairing| pairing.id)
            .collect()
    }

    /// Replace the draft with engine output
    pub(crate) fn apply_pairings(&mut self, round: RoundPairings) {
        self.pairings = round.pairings;
        self.bye = round.bye;
        self.warnings = round.warnings;
    }

    /// Renumber pairings 1..n after an edit
    pub(crate) fn renumber(&mut self) {
        for (index, pairing) in self.pairings.iter_mut().enumerate() {
            pairing.id = PairingId::new(self.number, index as u32 + 1);
        }
    }
}
