use std::fs;
use std::path::{Path, PathBuf};

use anyhow::ensure;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "snake_config.json";

/// Tuning knobs. Every field falls back to its default when missing from the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_speed_ms: u64,
    pub min_speed_ms: u64,
    pub speed_step_ms: u64,
    pub food_score: u32,
    pub bonus_score: u32,
    /// Bonus lifetime in ticks.
    pub bonus_lifetime: i32,
    pub bonus_spawn_chance: f64,
    pub clock_period_ms: u64,
    pub save_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_speed_ms: 100,
            min_speed_ms: 50,
            speed_step_ms: 2,
            food_score: 10,
            bonus_score: 50,
            bonus_lifetime: 100,
            bonus_spawn_chance: 0.005,
            clock_period_ms: 1000,
            save_dir: PathBuf::from("."),
        }
    }
}

impl GameConfig {
    /// Reads the config file if there is one. A missing file yields the defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would stall the drivers.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.initial_speed_ms > 0, "initial_speed_ms must be positive");
        ensure!(self.min_speed_ms > 0, "min_speed_ms must be positive");
        ensure!(self.clock_period_ms > 0, "clock_period_ms must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.bonus_spawn_chance),
            "bonus_spawn_chance {} is not a probability",
            self.bonus_spawn_chance
        );
        Ok(())
    }

    /// Next tick period after eating food.
    pub fn faster(&self, speed_ms: u64) -> u64 {
        speed_ms.saturating_sub(self.speed_step_ms).max(self.min_speed_ms)
    }
}
