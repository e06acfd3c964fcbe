use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use term_snake::clock::FrameClock;
use term_snake::config::{Config, GRID_HEIGHT, GRID_WIDTH};
use term_snake::game::{self, SnakeGame};
use term_snake::grid::Grid;
use term_snake::term::TermManager;

fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let grid = Grid::new(GRID_WIDTH, GRID_HEIGHT);
    let mut term = TermManager::new(grid.frame_rect())?;
    let mut clock = FrameClock::new();
    let mut game = SnakeGame::new(grid, rng);

    info!(seed = ?config.seed, width = GRID_WIDTH, height = GRID_HEIGHT, "starting");

    term.setup()?;
    let res = game::run(&mut game, &mut term, &mut clock);
    term.restore()?;
    res
}

/// The terminal belongs to the game, so logs only go to a file, and only if asked for.
fn init_logging(config: &Config) -> Result<()> {
    let path = match &config.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path)
        .with_context(|| format!("Error creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
