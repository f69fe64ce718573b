//! Rules of the 2048 tile merging game: the field, the move engine, game
//! state with undo history, and the plain text save format.

pub mod config;
pub mod error;
pub mod field;
pub mod game;
pub mod history;
pub mod save;
pub mod swipe;

pub use config::Config;
pub use error::{Error, Result};
pub use field::{Field, Position, Tile};
pub use game::{Game, GameState, MoveOutcome, MoveReport, SpawnRule};
pub use history::History;
pub use swipe::{can_swipe, swipe, CellChange, Direction, Swipe};
