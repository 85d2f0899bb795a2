use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Leaves the round counter room for 2^63 rounds.
pub const MAX_FIRST_ROUND: u64 = u64::MAX / 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedAccount {
    pub user: String,
    pub balance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Balance given to a user the first time they are seen.
    pub starting_balance: u64,
    pub history_capacity: usize,
    /// Number assigned to the first resolved round.
    pub first_round: u64,
    /// Fixed generator seed; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Wager denominations offered to players. The engine itself accepts any positive wager.
    pub allowed_wagers: Vec<u64>,
    /// Accounts opened at startup.
    pub players: Vec<SeedAccount>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            first_round: 1,
            seed: None,
            allowed_wagers: vec![100, 1_000, 10_000, 50_000],
            players: vec![
                SeedAccount {
                    user: "Player1".into(),
                    balance: 1000,
                },
                SeedAccount {
                    user: "Player2".into(),
                    balance: 500,
                },
                SeedAccount {
                    user: "Player3".into(),
                    balance: 2000,
                },
            ],
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
        }
        if self.first_round > MAX_FIRST_ROUND {
            return Err(ConfigError::Invalid(format!(
                "first_round must be at most {MAX_FIRST_ROUND}"
            )));
        }
        if self.allowed_wagers.is_empty() {
            return Err(ConfigError::Invalid("allowed_wagers is empty".into()));
        }
        if self.allowed_wagers.contains(&0) {
            return Err(ConfigError::Invalid("allowed_wagers must be positive".into()));
        }
        Ok(())
    }

    pub fn is_allowed_wager(&self, wager: u64) -> bool {
        self.allowed_wagers.contains(&wager)
    }
}
