//! Pairing engine and pairing models.
//!
//! ## Example
//!
//! ```
//! use league_pairing::pairing::{PairingEngine, PairingHistory};
//! use league_pairing::roster::Player;
//!
//! let players = [
//!     Player::new("Alice", None, false),
//!     Player::new("Bob", None, false),
//!     Player::new("Carol", None, false),
//! ];
//! let refs: Vec<&Player> = players.iter().collect();
//!
//! let round = PairingEngine::default()
//!     .pair_round(1, &refs, &PairingHistory::new())
//!     .unwrap();
//! assert_eq!(round.pairings.len(), 1);
//! assert_eq!(round.bye.as_deref(), Some("Carol"));
//! ```

pub mod anchor;
pub mod engine;
pub mod models;

pub use anchor::{AnchorPolicy, AnchorPolicyKind, IgnoreAnchors, SeparateAnchors};
pub use engine::{DEFAULT_SEARCH_BUDGET, PairingEngine};
pub use models::{
    MatchResult, Pairing, PairingHistory, PairingId, PairingWarning, ParsePairingIdError,
    RoundPairings,
};
