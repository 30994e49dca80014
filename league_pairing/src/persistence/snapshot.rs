//! Serializable tournament snapshot.

use serde::{Deserialize, Serialize};

use super::errors::{PersistenceError, PersistenceResult};
use crate::phase::PhaseController;
use crate::roster::Player;
use crate::tournament::{LeagueConfig, RoundState};

/// Current snapshot layout version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume a tournament
///
/// Pending phase events are not part of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentState {
    pub version: u32,
    pub config: LeagueConfig,
    pub phase: PhaseController,
    /// Players in registration order
    pub players: Vec<Player>,
    pub rounds: Vec<RoundState>,
}

impl TournamentState {
    /// Reject snapshots written with another layout
    pub fn check_version(&self) -> PersistenceResult<()> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            })
        }
    }
}
