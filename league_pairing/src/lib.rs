//! # League Pairing
//!
//! Pairing and scoring engine for leagues played over repeated rounds.
//!
//! Every round moves through four phases, enforced by a small state machine
//! built on `enum_dispatch`:
//!
//! - **Registration**: players sign up (only before round 1)
//! - **Pairings**: the Swiss-style engine drafts pairings, which can be edited
//! - **Assignments**: pairings are seated at tables and each player is given
//!   a list to play against
//! - **Results**: scores and list points are collected
//!
//! A new round starts from the results phase once every pairing is decided.
//!
//! ## Core Modules
//!
//! - [`tournament`]: the [`Tournament`] aggregate and its configuration
//! - [`roster`]: players and their per-round records
//! - [`phase`]: round and phase state machine
//! - [`pairing`]: pairing engine and anchor policies
//! - [`assignment`]: table assignment
//! - [`scoring`]: result validation, totals and standings
//! - [`persistence`]: snapshots and stores
//!
//! ## Example
//!
//! ```
//! use league_pairing::{LeagueConfig, PairingId, Tournament};
//!
//! let mut tournament = Tournament::new(LeagueConfig::default()).unwrap();
//! tournament.add_player("Alice", None, false).unwrap();
//! tournament.add_player("Bob", None, false).unwrap();
//!
//! tournament.advance().unwrap(); // pairings
//! tournament.generate_pairings().unwrap();
//! tournament.advance().unwrap(); // assignments
//! tournament.assign_tables().unwrap();
//! tournament.advance().unwrap(); // results
//! tournament.submit_result(PairingId::new(1, 1), 3, 1).unwrap();
//!
//! let leader = tournament.standings().next().unwrap();
//! assert_eq!(leader.name(), "Alice");
//! ```

pub mod assignment;
pub mod pairing;
pub mod persistence;
pub mod phase;
pub mod roster;
pub mod scoring;
pub mod tournament;

pub use assignment::{AssignmentEngine, TableAssignment};
pub use pairing::{AnchorPolicy, AnchorPolicyKind, Pairing, PairingEngine, PairingId, PairingWarning};
pub use persistence::{
    FileStore, MemoryStore, PersistenceError, PersistenceResult, SnapshotFormat, TournamentState,
    TournamentStore,
};
pub use phase::{Phase, PhaseEvent, PhaseRules};
pub use roster::{Player, Points, RosterStore, RoundNumber, RoundRecord};
pub use scoring::ScoringEngine;
pub use tournament::{
    ErrorKind, LeagueConfig, RoundState, SharedTournament, Tournament, TournamentError,
    TournamentResult,
};
