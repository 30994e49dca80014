//! Roster of registered players.
//!
//! Players are registered while the tournament is in the registration phase
//! and never leave afterwards. Each player carries one [`RoundRecord`] per
//! round played, which holds the table, assigned list and points for that
//! round side by side.

pub mod models;
pub mod store;

pub use models::{Player, Points, RoundNumber, RoundRecord, TableNumber};
pub use store::RosterStore;
