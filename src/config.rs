use std::path::PathBuf;

use anyhow::{Context, Result};

pub const GRID_WIDTH: i32 = 40;
pub const GRID_HEIGHT: i32 = 30;

// A grid cell takes two terminal columns and one row, which looks roughly square
pub const CELL_COLS: u16 = 2;
pub const CELL_ROWS: u16 = 1;

pub const BASE_SPEED: f64 = 10.0;
pub const SPEED_INCREASE: f64 = 0.2;
pub const FOOD_REWARD: u32 = 10;
pub const INITIAL_GROWTH: u32 = 2;

pub const SCORE_INTERVAL_MS: u64 = 2000;
pub const COLOR_CHANGE_INTERVAL: u32 = 10;
pub const MAX_FOOD_REROLLS: usize = 64;

pub const SEED_VAR: &str = "SNAKE_SEED";
pub const LOG_FILE_VAR: &str = "SNAKE_LOG_FILE";

/// Runtime settings. The game takes no arguments, so these come from the environment.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup(SEED_VAR) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be an unsigned integer, got {:?}", SEED_VAR, raw))?,
            ),
            None => None,
        };

        let log_file = lookup(LOG_FILE_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Config { seed, log_file })
    }
}
