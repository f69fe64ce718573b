mod game_window;
mod input;

use std::path::PathBuf;

use clap::Parser;
use model::config::{DEFAULT_SAVE_PATH, DEFAULT_SIZE};
use model::{Config, Game};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use game_window::GameWindow;

/// Arrows or WASD to move, Backspace to undo, R to restart,
/// F5 to save and F9 to load.
#[derive(Debug, Parser)]
#[command(name = "game2048-rs", about = "2048 tile merging puzzle")]
struct Args {
    /// Width and height of the field
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// File used as the save slot
    #[arg(long, default_value = DEFAULT_SAVE_PATH)]
    save_file: PathBuf,

    /// Seed for tile placement, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Chance that a new tile is 4 instead of 2
    #[arg(long, default_value_t = 0.5)]
    four_probability: f64,
}

impl Args {
    fn config(self) -> Config {
        Config {
            size: self.size,
            four_probability: self.four_probability,
            save_path: self.save_file,
            seed: self.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let game = Game::new(args.config())?;
    let event_loop = EventLoop::new();
    let window = GameWindow::new(game, &event_loop)?;
    window.run(event_loop)
}
