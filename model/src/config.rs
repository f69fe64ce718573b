use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::game::SpawnRule;

pub const DEFAULT_SIZE: usize = 4;
pub const DEFAULT_SAVE_PATH: &str = "sav.dat";

/// Runtime settings of a game session.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub size: usize,
    pub four_probability: f64,
    /// The single save slot used by `Game::save_slot` and `Game::load_slot`.
    pub save_path: PathBuf,
    /// Fixed seed for reproducible sessions; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            four_probability: SpawnRule::default().four_probability,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(Error::Config(format!(
                "field size must be at least 2, got {}",
                self.size
            )));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(Error::Config(format!(
                "probability of 4 must be within [0, 1], got {}",
                self.four_probability
            )));
        }
        Ok(())
    }

    pub fn spawn_rule(&self) -> SpawnRule {
        SpawnRule {
            four_probability: self.four_probability,
        }
    }
}

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert_eq!(config.size, 4);
    assert_eq!(config.save_path, PathBuf::from("sav.dat"));
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_unplayable_settings() {
    let tiny = Config {
        size: 1,
        ..Config::default()
    };
    assert!(matches!(tiny.validate(), Err(Error::Config(_))));
    let odd = Config {
        four_probability: 1.5,
        ..Config::default()
    };
    assert!(matches!(odd.validate(), Err(Error::Config(_))));
}
