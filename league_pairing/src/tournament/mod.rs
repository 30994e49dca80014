//! Tournament aggregate: configuration, round history and the operations
//! that drive a league from registration through its rounds.
//!
//! ## Example
//!
//! ```
//! use league_pairing::tournament::{LeagueConfig, Tournament};
//!
//! let mut tournament = Tournament::new(LeagueConfig::named("Tuesday League")).unwrap();
//! tournament.add_player("Alice", Some("Red"), false).unwrap();
//! tournament.add_player("Bob", Some("Blue"), false).unwrap();
//!
//! tournament.advance().unwrap();
//! let round = tournament.generate_pairings().unwrap();
//! assert_eq!(round.pairings.len(), 1);
//! ```

pub mod config;
pub mod errors;
pub mod manager;
pub mod round;
pub mod shared;

pub use config::LeagueConfig;
pub use errors::{ErrorKind, TournamentError, TournamentResult};
pub use manager::Tournament;
pub use round::RoundState;
pub use shared::SharedTournament;
