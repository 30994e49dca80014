//! Tournament stores.

use parking_lot::Mutex;
use std::{
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use super::{
    errors::{PersistenceError, PersistenceResult},
    snapshot::TournamentState,
};
use crate::tournament::Tournament;

/// Load and save collaborator for tournament state
pub trait TournamentStore: Send + Sync {
    /// Load the saved state
    ///
    /// # Errors
    ///
    /// `Missing` when nothing has been saved yet.
    fn load_tournament_state(&self) -> PersistenceResult<TournamentState>;

    /// Replace the saved state
    fn save_tournament_state(&self, state: &TournamentState) -> PersistenceResult<()>;

    /// Like `load_tournament_state`, with `None` for an empty store
    fn try_load_tournament_state(&self) -> PersistenceResult<Option<TournamentState>> {
        match self.load_tournament_state() {
            Ok(state) => Ok(Some(state)),
            Err(PersistenceError::Missing) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Load the saved state and rebuild the tournament from it
    ///
    /// # Errors
    ///
    /// `Invalid` when the snapshot fails [`Tournament::from_state`].
    fn load_tournament(&self) -> PersistenceResult<Tournament> {
        let state = self.load_tournament_state()?;
        Ok(Tournament::from_state(state)?)
    }
}

/// In-process store, mostly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<TournamentState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryStore {
    fn load_tournament_state(&self) -> PersistenceResult<TournamentState> {
        let state = self.state.lock().clone().ok_or(PersistenceError::Missing)?;
        state.check_version()?;
        Ok(state)
    }

    fn save_tournament_state(&self, state: &TournamentState) -> PersistenceResult<()> {
        *self.state.lock() = Some(state.clone());
        Ok(())
    }
}

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Pretty-printed JSON, readable by hand
    #[default]
    Json,
    /// Compact bincode
    Binary,
}

impl SnapshotFormat {
    fn encode(self, state: &TournamentState) -> PersistenceResult<Vec<u8>> {
        Ok(match self {
            SnapshotFormat::Json => serde_json::to_vec_pretty(state)?,
            SnapshotFormat::Binary => {
                bincode::serde::encode_to_vec(state, bincode::config::standard())?
            }
        })
    }

    fn decode(self, bytes: &[u8]) -> PersistenceResult<TournamentState> {
        Ok(match self {
            SnapshotFormat::Json => serde_json::from_slice(bytes)?,
            SnapshotFormat::Binary => {
                let (state, _) =
                    bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
                state
            }
        })
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Binary => "binary",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SnapshotFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "binary" | "bin" | "bincode" => Ok(SnapshotFormat::Binary),
            other => Err(format!("unknown snapshot format: {other}")),
        }
    }
}

/// Single-file store
///
/// Saves go to a sibling temp file which is synced and then renamed over the
/// target, so a crash mid-save leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    format: SnapshotFormat,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, SnapshotFormat::Json)
    }

    pub fn binary(path: impl Into<PathBuf>) -> Self {
        Self::new(path, SnapshotFormat::Binary)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TournamentStore for FileStore {
    fn load_tournament_state(&self) -> PersistenceResult<TournamentState> {
        let bytes = fs::read(&self.path).map_err(|e| PersistenceError::io(&self.path, e))?;
        let state = self.format.decode(&bytes)?;
        state.check_version()?;
        log::debug!(
            "Loaded round {} from {}",
            state.phase.round(),
            self.path.display()
        );
        Ok(state)
    }

    fn save_tournament_state(&self, state: &TournamentState) -> PersistenceResult<()> {
        let bytes = self.format.encode(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }

        let tmp_path = self.tmp_path();
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)
                .map_err(|e| PersistenceError::io(&tmp_path, e))?;
            file.write_all(&bytes)
                .and_then(|()| file.sync_all())
                .map_err(|e| PersistenceError::io(&tmp_path, e))?;
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| PersistenceError::io(&self.path, e))?;

        log::debug!(
            "Saved {} bytes of {} to {}",
            bytes.len(),
            self.format,
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{LeagueConfig, TournamentError};

    fn state() -> TournamentState {
        let mut tournament = Tournament::new(LeagueConfig::default()).unwrap();
        tournament.add_player("Alice", Some("Red"), true).unwrap();
        tournament.add_player("Bob", None, false).unwrap();
        tournament.snapshot()
    }

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.load_tournament_state(),
            Err(PersistenceError::Missing)
        ));
        assert!(store.try_load_tournament_state().unwrap().is_none());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::json(dir.path().join("league.json"));
        assert!(!store.exists());
        assert!(store.try_load_tournament_state().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("league.bin");
        let store = FileStore::binary(&path);

        store.save_tournament_state(&state()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested").join("league.bin.tmp").exists());
    }

    #[test]
    fn test_unsupported_version() {
        let store = MemoryStore::new();
        let mut old = state();
        old.version = 99;
        store.save_tournament_state(&old).unwrap();
        assert!(matches!(
            store.load_tournament_state(),
            Err(PersistenceError::UnsupportedVersion {
                found: 99,
                expected: 1
            })
        ));
    }

    #[test]
    fn test_load_tournament() {
        let store = MemoryStore::new();
        store.save_tournament_state(&state()).unwrap();
        assert_eq!(store.load_tournament().unwrap().list_players().count(), 2);

        let mut stale = state();
        stale.rounds.push(crate::tournament::RoundState::new(1));
        store.save_tournament_state(&stale).unwrap();
        assert!(matches!(
            store.load_tournament(),
            Err(PersistenceError::Invalid(TournamentError::InconsistentState(_)))
        ));
    }

    #[test]
    fn test_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            FileStore::json(&path).load_tournament_state(),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<SnapshotFormat>().unwrap(), SnapshotFormat::Json);
        assert_eq!("bin".parse::<SnapshotFormat>().unwrap(), SnapshotFormat::Binary);
        assert!("yaml".parse::<SnapshotFormat>().is_err());
        assert_eq!(SnapshotFormat::Binary.to_string(), "binary");
    }
}
