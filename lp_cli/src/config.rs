//! Command line configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use league_pairing::{AnchorPolicyKind, LeagueConfig, RoundNumber, SnapshotFormat};
use std::path::PathBuf;

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where the tournament snapshot lives
    pub state_path: PathBuf,
    /// Snapshot encoding
    pub format: SnapshotFormat,
    /// League settings applied by `init`
    pub league: LeagueDefaultsConfig,
}

/// Settings for newly created leagues. An existing league keeps the settings
/// stored in its snapshot.
#[derive(Debug, Clone)]
pub struct LeagueDefaultsConfig {
    /// Seats per table
    pub players_per_table: u32,
    /// Whether equal scores are accepted
    pub allow_ties: bool,
    /// Players needed to start round 1
    pub min_players: usize,
    /// Fixed league length, if any
    pub max_rounds: Option<RoundNumber>,
    /// Anchor rule
    pub anchor_policy: AnchorPolicyKind,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `state_path_override` - Optional snapshot path (from CLI args)
    /// * `format_override` - Optional snapshot format (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to something unparseable
    pub fn from_env(
        state_path_override: Option<PathBuf>,
        format_override: Option<SnapshotFormat>,
    ) -> Result<Self, ConfigError> {
        let format = match format_override {
            Some(format) => format,
            None => parse_env_strict("LEAGUE_STATE_FORMAT")?.unwrap_or_default(),
        };

        let state_path = state_path_override
            .or_else(|| std::env::var("LEAGUE_STATE_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| default_state_path(format));

        let max_rounds = parse_env_strict::<RoundNumber>("LEAGUE_MAX_ROUNDS")?;

        let league = LeagueDefaultsConfig {
            players_per_table: parse_env_or("LEAGUE_PLAYERS_PER_TABLE", 2),
            allow_ties: parse_env_or("LEAGUE_ALLOW_TIES", true),
            min_players: parse_env_or("LEAGUE_MIN_PLAYERS", 2),
            max_rounds,
            anchor_policy: parse_env_strict("LEAGUE_ANCHOR_POLICY")?.unwrap_or_default(),
        };

        Ok(CliConfig {
            state_path,
            format,
            league,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_STATE_PATH".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.league.players_per_table < 2 || self.league.players_per_table % 2 != 0 {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_PLAYERS_PER_TABLE".to_string(),
                reason: format!(
                    "Must be an even number of at least 2, got {}",
                    self.league.players_per_table
                ),
            });
        }

        if self.league.min_players < 2 {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_MIN_PLAYERS".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        if self.league.max_rounds == Some(0) {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_MAX_ROUNDS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// League configuration for `init`
    pub fn league_config(&self, name: impl Into<String>) -> LeagueConfig {
        LeagueConfig {
            name: name.into(),
            players_per_table: self.league.players_per_table,
            allow_ties: self.league.allow_ties,
            min_players: self.league.min_players,
            max_rounds: self.league.max_rounds,
            anchor_policy: self.league.anchor_policy,
        }
    }
}

fn default_state_path(format: SnapshotFormat) -> PathBuf {
    match format {
        SnapshotFormat::Json => PathBuf::from("league.json"),
        SnapshotFormat::Binary => PathBuf::from("league.bin"),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse an optional environment variable, failing on garbage instead of
/// falling back
fn parse_env_strict<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::Invalid {
                    var: key.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "LEAGUE_STATE_PATH",
        "LEAGUE_STATE_FORMAT",
        "LEAGUE_PLAYERS_PER_TABLE",
        "LEAGUE_ALLOW_TIES",
        "LEAGUE_MIN_PLAYERS",
        "LEAGUE_MAX_ROUNDS",
        "LEAGUE_ANCHOR_POLICY",
    ];

    fn clear_env() {
        for var in VARS {
            // Tests touching the environment are serialized
            unsafe { std::env::remove_var(var) };
        }
    }

    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = CliConfig::from_env(None, None).unwrap();
        assert_eq!(config.state_path, PathBuf::from("league.json"));
        assert_eq!(config.format, SnapshotFormat::Json);
        assert_eq!(config.league.players_per_table, 2);
        assert!(config.league.allow_ties);
        assert_eq!(config.league.max_rounds, None);
        config.validate().unwrap();
    }

    #[test]
    #[serial]
    fn test_env_values() {
        clear_env();
        set_env("LEAGUE_STATE_FORMAT", "binary");
        set_env("LEAGUE_PLAYERS_PER_TABLE", "4");
        set_env("LEAGUE_ALLOW_TIES", "false");
        set_env("LEAGUE_MAX_ROUNDS", "5");
        set_env("LEAGUE_ANCHOR_POLICY", "ignore");

        let config = CliConfig::from_env(None, None).unwrap();
        assert_eq!(config.state_path, PathBuf::from("league.bin"));
        assert_eq!(config.format, SnapshotFormat::Binary);

        let league = config.league_config("Friday");
        assert_eq!(league.name, "Friday");
        assert_eq!(league.players_per_table, 4);
        assert!(!league.allow_ties);
        assert_eq!(league.max_rounds, Some(5));
        assert_eq!(league.anchor_policy, AnchorPolicyKind::Ignore);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_win() {
        clear_env();
        set_env("LEAGUE_STATE_PATH", "/tmp/from-env.json");
        set_env("LEAGUE_STATE_FORMAT", "json");

        let config = CliConfig::from_env(
            Some(PathBuf::from("override.bin")),
            Some(SnapshotFormat::Binary),
        )
        .unwrap();
        assert_eq!(config.state_path, PathBuf::from("override.bin"));
        assert_eq!(config.format, SnapshotFormat::Binary);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_format_rejected() {
        clear_env();
        set_env("LEAGUE_STATE_FORMAT", "yaml");
        let err = CliConfig::from_env(None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "LEAGUE_STATE_FORMAT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_odd_table_size_rejected() {
        clear_env();
        set_env("LEAGUE_PLAYERS_PER_TABLE", "3");
        let config = CliConfig::from_env(None, None).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LEAGUE_PLAYERS_PER_TABLE"));
        clear_env();
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "LEAGUE_MAX_ROUNDS".to_string(),
            reason: "Must be greater than 0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("LEAGUE_MAX_ROUNDS"));
        assert!(msg.contains("greater than 0"));
    }
}
