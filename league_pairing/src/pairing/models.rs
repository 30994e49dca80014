//! Pairing data models.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use thiserror::Error;

use crate::roster::{Points, RoundNumber};

/// Identifies a pairing by round and position in the round (both 1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairingId {
    pub round: RoundNumber,
    pub number: u32,
}

impl PairingId {
    pub fn new(round: RoundNumber, number: u32) -> Self {
        Self { round, number }
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.round, self.number)
    }
}

/// Error parsing a `round:number` pairing id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pairing id {0:?}: expected <round>:<number>")]
pub struct ParsePairingIdError(String);

impl FromStr for PairingId {
    type Err = ParsePairingIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePairingIdError(s.to_string());
        let (round, number) = s.trim().split_once(':').ok_or_else(invalid)?;
        let round = round.parse().map_err(|_| invalid())?;
        let number = number.parse().map_err(|_| invalid())?;
        if round == 0 || number == 0 {
            return Err(invalid());
        }
        Ok(Self { round, number })
    }
}

/// Scores reported for a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player1_score: Points,
    pub player2_score: Points,
}

/// A single round's matchup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub id: PairingId,
    pub player1: String,
    pub player2: String,
    /// The two players already met in an earlier round
    pub repeat: bool,
    pub result: Option<MatchResult>,
}

impl Pairing {
    pub fn new(id: PairingId, player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Self {
            id,
            player1: player1.into(),
            player2: player2.into(),
            repeat: false,
            result: None,
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.player1 == name || self.player2 == name
    }

    pub fn is_decided(&self) -> bool {
        self.result.is_some()
    }
}

/// Soft problems with a pairing; never a reason to fail
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairingWarning {
    RepeatPairing { player1: String, player2: String },
    AnchorsPaired { player1: String, player2: String },
}

impl PairingWarning {
    pub fn involves(&self, name: &str) -> bool {
        match self {
            Self::RepeatPairing { player1, player2 } | Self::AnchorsPaired { player1, player2 } => {
                player1 == name || player2 == name
            }
        }
    }
}

impl fmt::Display for PairingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepeatPairing { player1, player2 } => {
                write!(f, "{player1} and {player2} already played each other")
            }
            Self::AnchorsPaired { player1, player2 } => {
                write!(f, "anchors {player1} and {player2} are paired together")
            }
        }
    }
}

/// Output of the pairing engine for one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPairings {
    pub pairings: Vec<Pairing>,
    pub bye: Option<String>,
    pub warnings: Vec<PairingWarning>,
}

/// Unordered set of player pairs that have already met
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingHistory {
    met: BTreeSet<(String, String)>,
}

impl PairingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the history from every pairing of earlier rounds
    pub fn from_pairings<'a>(pairings: impl IntoIterator<Item = &'a Pairing>) -> Self {
        let mut history = Self::new();
        for pairing in pairings {
            history.record(&pairing.player1, &pairing.player2);
        }
        history
    }

    pub fn record(&mut self, a: &str, b: &str) {
        self.met.insert(Self::key(a, b));
    }

    pub fn met(&self, a: &str, b: &str) -> bool {
        self.met.contains(&Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.met.len()
    }

    pub fn is_empty(&self) -> bool {
        self.met.is_empty()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }
}
