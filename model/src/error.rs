use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the game core.
#[derive(Debug, Error)]
pub enum Error {
    /// Grid index outside `[0, size)`. Reaching this means a caller bug.
    #[error("cell ({row}, {col}) is outside of {size}x{size} field")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// Save file could not be opened, read or written.
    #[error("cannot access save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Save data is truncated or holds an impossible tile value.
    #[error("malformed save data: {0}")]
    Format(String),

    /// Settings that cannot describe a playable game.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
