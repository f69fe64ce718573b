//! Plain text save format.
//!
//! A save holds exactly one game state: the cell values row by row (0 for an
//! empty cell) followed by the score. Saves are written with single spaces
//! between tokens:
//!
//! ```text
//! 2 0 0 0 0 4 0 0 0 0 0 0 0 0 0 2 16
//! ```
//!
//! There is no header. On load any whitespace separates tokens, and anything
//! after the score is ignored.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::field::Field;
use crate::game::GameState;

pub fn encode(state: &GameState) -> String {
    let mut tokens: Vec<String> = state.field().to_array().iter().map(u32::to_string).collect();
    tokens.push(state.score().to_string());
    tokens.join(" ")
}

pub fn decode(text: &str, size: usize) -> Result<GameState> {
    let cells = size * size;
    let mut tokens = text.split_whitespace();
    let mut values = Vec::with_capacity(cells);
    for index in 0..cells {
        let token = tokens.next().ok_or_else(|| {
            Error::Format(format!(
                "expected {} cell values and a score, found only {} values",
                cells, index
            ))
        })?;
        let value = token.parse::<u32>().map_err(|_| {
            Error::Format(format!("cell {} holds {:?}, not a tile value", index, token))
        })?;
        values.push(value);
    }
    let score = tokens
        .next()
        .ok_or_else(|| Error::Format("score is missing".to_string()))?;
    let score = score
        .parse::<u64>()
        .map_err(|_| Error::Format(format!("score {:?} is not a non-negative integer", score)))?;
    let array = Array2::from_shape_vec((size, size), values)
        .map_err(|e| Error::Format(e.to_string()))?;
    Ok(GameState::new(Field::from_array(&array)?, score))
}

pub fn save<P: AsRef<Path>>(state: &GameState, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, encode(state)).map_err(|source| {
        warn!(path = %path.display(), error = %source, "save failed");
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(path = %path.display(), score = state.score(), "game saved");
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P, size: usize) -> Result<GameState> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| {
        warn!(path = %path.display(), error = %source, "load failed");
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let state = decode(&text, size).map_err(|e| {
        warn!(path = %path.display(), error = %e, "save file rejected");
        e
    })?;
    info!(path = %path.display(), score = state.score(), "game loaded");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_state() -> GameState {
        #[rustfmt::skip]
        let array = Array2::from_shape_vec((4, 4), vec![
            2, 0, 0, 0,
            0, 4, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 2048,
        ]).unwrap();
        GameState::new(Field::from_array(&array).unwrap(), 20400)
    }

    #[test]
    fn encode_uses_legacy_layout() {
        assert_eq!(
            encode(&sample_state()),
            "2 0 0 0 0 4 0 0 0 0 0 0 0 0 0 2048 20400"
        );
    }

    #[test]
    fn decode_reads_legacy_layout() {
        // whitespace of any kind separates tokens; anything after the score is ignored
        let text = "2 0 0 0 0 4 0 0 0 0 0 0 0 0 0 2048 20400\n";
        assert_eq!(decode(text, 4).unwrap(), sample_state());
        let spaced = "2 0 0 0 \n 0 4 0 0\n0 0 0 0\n0 0 0 2048\n20400 extra tokens";
        assert_eq!(decode(spaced, 4).unwrap(), sample_state());
    }

    #[test]
    fn decode_rejects_short_input() {
        let cells_only = "2 0 0 0 0 4 0 0 0 0 0 0 0 0 0 2048";
        assert!(matches!(decode(cells_only, 4), Err(Error::Format(_))));
        assert!(matches!(decode("", 4), Err(Error::Format(_))));
    }

    #[test]
    fn decode_rejects_bad_values() {
        let three = "3 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        assert!(matches!(decode(three, 4), Err(Error::Format(_))));
        let one = "1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        assert!(matches!(decode(one, 4), Err(Error::Format(_))));
        let negative = "-2 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        assert!(matches!(decode(negative, 4), Err(Error::Format(_))));
        let word = "2 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 lots";
        assert!(matches!(decode(word, 4), Err(Error::Format(_))));
    }

    #[test]
    fn decode_accepts_largest_tile_and_score() {
        let text = format!("{0} {0} 0 0 0 0 0 0 0 0 0 0 0 0 0 0 {1}", 1u32 << 31, u64::MAX);
        let state = decode(&text, 4).unwrap();
        assert_eq!(state.score(), u64::MAX);
        assert!(!state.field().has_adjacent_pair());
        assert_eq!(encode(&state), text);
        let too_big = format!("{} 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0", 1u64 << 32);
        assert!(matches!(decode(&too_big, 4), Err(Error::Format(_))));
    }

    #[test]
    fn save_then_load() {
        let file = NamedTempFile::new().unwrap();
        save(&sample_state(), file.path()).unwrap();
        let loaded = load(file.path(), 4).unwrap();
        assert_eq!(loaded, sample_state());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.dat");
        assert!(matches!(load(&path, 4), Err(Error::Io { .. })));
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("sav.dat");
        assert!(matches!(
            save(&sample_state(), &path),
            Err(Error::Io { .. })
        ));
    }
}
