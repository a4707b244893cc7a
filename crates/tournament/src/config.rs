//! Tournament configuration, loaded from TOML
//!
//! ```toml
//! name = "Club Championship"
//! total_rounds = 7
//! bye_points = 1.0
//! default_time_minutes = 30
//!
//! [pairing]
//! max_candidates = 50000
//! initial_color = "black"
//! ```

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use swiss_core::{PairingConfig, Score};

use crate::error::{Result, TournamentError};

/// Rounds announced when the config does not say
pub const DEFAULT_TOTAL_ROUNDS: u32 = 5;

/// Minutes a player may be late before the game is forfeited
pub const DEFAULT_TIME_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub name: String,
    pub total_rounds: u32,
    /// Points for a pairing-allocated BYE
    pub bye_points: Score,
    /// Points for winning by forfeit
    pub forfeit_points: Score,
    /// Points credited to a late entrant for each round they missed
    pub missed_round_points: Score,
    /// Default-time window, counted from the start of the round
    pub default_time_minutes: i64,
    pub pairing: PairingConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Swiss tournament".to_string(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            bye_points: Score::ONE,
            forfeit_points: Score::ONE,
            missed_round_points: Score::ZERO,
            default_time_minutes: DEFAULT_TIME_MINUTES,
            pairing: PairingConfig::default(),
        }
    }
}

impl TournamentConfig {
    /// Load and validate a TOML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TournamentError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        let config: TournamentConfig =
            toml::from_str(&text).map_err(|source| TournamentError::ParseConfig {
                source,
                path: path.to_path_buf(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.total_rounds == 0 {
            return Err(TournamentError::InvalidConfig {
                field: "total_rounds",
                reason: "must be at least 1".to_string(),
            });
        }
        for (field, points) in [
            ("bye_points", self.bye_points),
            ("forfeit_points", self.forfeit_points),
            ("missed_round_points", self.missed_round_points),
        ] {
            if points > Score::ONE {
                return Err(TournamentError::InvalidConfig {
                    field,
                    reason: format!("{points} is more than a game is worth"),
                });
            }
        }
        if self.default_time_minutes < 0 {
            return Err(TournamentError::InvalidConfig {
                field: "default_time_minutes",
                reason: "must not be negative".to_string(),
            });
        }
        if self.pairing.max_candidates == 0 {
            return Err(TournamentError::InvalidConfig {
                field: "pairing.max_candidates",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn default_time(&self) -> Duration {
        Duration::minutes(self.default_time_minutes)
    }
}
