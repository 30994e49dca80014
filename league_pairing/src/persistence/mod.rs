//! Persistence of tournament state.
//!
//! The core never does I/O on its own. Callers take a [`TournamentState`]
//! from [`crate::Tournament::snapshot`] and hand it to a [`TournamentStore`],
//! then rebuild with [`crate::Tournament::from_state`].

pub mod errors;
pub mod snapshot;
pub mod store;

pub use errors::{PersistenceError, PersistenceResult};
pub use snapshot::{SNAPSHOT_VERSION, TournamentState};
pub use store::{FileStore, MemoryStore, SnapshotFormat, TournamentStore};
