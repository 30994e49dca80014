//! League configuration.

use serde::{Deserialize, Serialize};

use super::errors::{TournamentError, TournamentResult};
use crate::pairing::AnchorPolicyKind;
use crate::roster::RoundNumber;

/// League configuration, stored alongside the tournament state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// League name
    pub name: String,

    /// Seats per physical table (even, default: 2)
    pub players_per_table: u32,

    /// Whether a pairing may end with equal scores
    pub allow_ties: bool,

    /// Players required before the first round can start (default: 2)
    pub min_players: usize,

    /// Last round to be played, if the league has a fixed length
    pub max_rounds: Option<RoundNumber>,

    /// How anchor players influence pairing
    pub anchor_policy: AnchorPolicyKind,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            name: "League".to_string(),
            players_per_table: 2,
            allow_ties: true,
            min_players: 2,
            max_rounds: None,
            anchor_policy: AnchorPolicyKind::Separate,
        }
    }
}

impl LeagueConfig {
    /// Create a configuration with defaults and the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> TournamentResult<()> {
        if self.players_per_table < 2 || self.players_per_table % 2 != 0 {
            return Err(TournamentError::InvalidConfig(format!(
                "players per table must be an even number of at least 2, got {}",
                self.players_per_table
            )));
        }

        if self.min_players < 2 {
            return Err(TournamentError::InvalidConfig(format!(
                "minimum players must be at least 2, got {}",
                self.min_players
            )));
        }

        if self.max_rounds == Some(0) {
            return Err(TournamentError::InvalidConfig(
                "max rounds must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LeagueConfig::default().validate().is_ok());
        assert_eq!(LeagueConfig::named("Tuesday").name, "Tuesday");
    }

    #[test]
    fn test_odd_table_size_rejected() {
        let config = LeagueConfig {
            players_per_table: 3,
            ..LeagueConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TournamentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_min_players_and_rounds() {
        let config = LeagueConfig {
            min_players: 1,
            ..LeagueConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LeagueConfig {
            max_rounds: Some(0),
            ..LeagueConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LeagueConfig {
            players_per_table: 4,
            max_rounds: Some(5),
            ..LeagueConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
