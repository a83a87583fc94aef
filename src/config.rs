use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{EXTRA_LIFE_THRESHOLD, INITIAL_LIVES, POWER_UP_DURATION_MS};
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u32,
    #[serde(rename = "initialLives", alias = "initial_lives")]
    pub initial_lives: u32,
    #[serde(rename = "powerUpDurationMs", alias = "power_up_duration_ms")]
    pub power_up_duration_ms: u64,
    #[serde(rename = "extraLifeThreshold", alias = "extra_life_threshold")]
    pub extra_life_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            initial_lives: INITIAL_LIVES,
            power_up_duration_ms: POWER_UP_DURATION_MS,
            extra_life_threshold: EXTRA_LIFE_THRESHOLD,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_lives == 0 {
            return Err(ConfigError::Invalid("initialLives must be at least 1"));
        }
        if self.extra_life_threshold == 0 {
            return Err(ConfigError::Invalid("extraLifeThreshold must be positive"));
        }
        Ok(())
    }
}
