//! Thread-safe tournament handle.

use parking_lot::RwLock;
use std::sync::Arc;

use super::{errors::TournamentResult, manager::Tournament};
use crate::persistence::{PersistenceResult, TournamentState, TournamentStore};
use crate::phase::Phase;
use crate::roster::{Player, RoundNumber};

/// A tournament behind one exclusive lock
///
/// Cloning the handle shares the tournament. Mutations run under the write
/// lock, so a failed operation never exposes a half-applied change to
/// readers. Accessors hand out owned copies instead of borrowed views.
#[derive(Debug, Clone)]
pub struct SharedTournament {
    inner: Arc<RwLock<Tournament>>,
}

impl SharedTournament {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tournament)),
        }
    }

    /// Run `f` with exclusive access
    pub fn write<T>(&self, f: impl FnOnce(&mut Tournament) -> TournamentResult<T>) -> TournamentResult<T> {
        let mut tournament = self.inner.write();
        f(&mut tournament)
    }

    /// Run `f` with shared access
    pub fn read<T>(&self, f: impl FnOnce(&Tournament) -> T) -> T {
        let tournament = self.inner.read();
        f(&tournament)
    }

    pub fn current(&self) -> (RoundNumber, Phase) {
        self.read(|t| (t.round(), t.current()))
    }

    pub fn players(&self) -> Vec<Player> {
        self.read(|t| t.list_players().cloned().collect())
    }

    pub fn standings(&self) -> Vec<Player> {
        self.read(|t| t.standings().cloned().collect())
    }

    pub fn snapshot(&self) -> TournamentState {
        self.read(Tournament::snapshot)
    }

    /// Save a consistent snapshot; the lock is held only while copying
    pub fn save_to(&self, store: &dyn TournamentStore) -> PersistenceResult<()> {
        let state = self.snapshot();
        store.save_tournament_state(&state)
    }
}

impl From<Tournament> for SharedTournament {
    fn from(tournament: Tournament) -> Self {
        Self::new(tournament)
    }
}
