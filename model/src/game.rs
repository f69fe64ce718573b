use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::field::{Field, Position, Tile};
use crate::history::History;
use crate::save;
use crate::swipe::{swipe, CellChange, Direction};

/// How new tiles are chosen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnRule {
    /// Chance that a spawned tile is 4 instead of 2, within `[0, 1]`.
    pub four_probability: f64,
}

impl Default for SpawnRule {
    fn default() -> Self {
        Self {
            four_probability: 0.5,
        }
    }
}

impl SpawnRule {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Tile {
        if rng.gen_bool(self.four_probability) {
            Tile::FOUR
        } else {
            Tile::TWO
        }
    }
}

/// What a legal move did to a game state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub changes: Vec<CellChange>,
    pub score: u64,
    pub spawned: Option<(Position, u32)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    field: Field,
    score: u64,
}

impl GameState {
    pub fn new(field: Field, score: u64) -> Self {
        Self { field, score }
    }
    /// Empty field with two random tiles.
    pub fn new_game<R: Rng + ?Sized>(size: usize, rule: &SpawnRule, rng: &mut R) -> Self {
        let mut state = Self::new(Field::new(size), 0);
        state.spawn_tile(rule, rng);
        state.spawn_tile(rule, rng);
        state
    }
    pub fn field(&self) -> &Field {
        &self.field
    }
    pub fn score(&self) -> u64 {
        self.score
    }
    /// Puts a new tile into a random empty cell. Does nothing on a full field.
    pub fn spawn_tile<R: Rng + ?Sized>(
        &mut self,
        rule: &SpawnRule,
        rng: &mut R,
    ) -> Option<(Position, u32)> {
        let cells = self.field.empty_cells();
        if cells.is_empty() {
            return None;
        }
        let pos = cells[rng.gen_range(0..cells.len())];
        let tile = rule.pick(rng);
        self.field.put(pos, Some(tile));
        Some((pos, tile.value()))
    }
    /// Applies `side` and spawns a tile if anything moved. An illegal move
    /// returns `None` and leaves the state untouched.
    pub fn attempt_move<R: Rng + ?Sized>(
        &mut self,
        side: Direction,
        rule: &SpawnRule,
        rng: &mut R,
    ) -> Option<MoveReport> {
        let swipe = swipe(&self.field, side);
        if !swipe.moved() {
            return None;
        }
        self.field = swipe.field;
        self.score = self.score.saturating_add(swipe.score);
        let spawned = self.spawn_tile(rule, rng);
        Some(MoveReport {
            changes: swipe.changes,
            score: swipe.score,
            spawned,
        })
    }
    /// The game is lost: no empty cell and no equal neighbours.
    pub fn is_terminal(&self) -> bool {
        self.field.is_full() && !self.field.has_adjacent_pair()
    }
}

/// Answer to a direction input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub changed_cells: Vec<CellChange>,
    pub spawned: Option<(Position, u32)>,
    pub score_delta: u64,
    pub legal: bool,
    pub terminal: bool,
}

/// A game session: the history of states plus the source of randomness.
pub struct Game {
    config: Config,
    rule: SpawnRule,
    rng: StdRng,
    history: History,
}

impl Game {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let rule = config.spawn_rule();
        let history = History::new(GameState::new_game(config.size, &rule, &mut rng));
        info!(size = config.size, seed = ?config.seed, "new game");
        Ok(Self {
            config,
            rule,
            rng,
            history,
        })
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn state(&self) -> &GameState {
        self.history.current()
    }
    pub fn field(&self) -> &Field {
        self.state().field()
    }
    pub fn score(&self) -> u64 {
        self.state().score()
    }
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn handle_direction(&mut self, side: Direction) -> MoveOutcome {
        let mut next = self.history.current().clone();
        let mut outcome = match next.attempt_move(side, &self.rule, &mut self.rng) {
            Some(report) => {
                self.history.push(next);
                MoveOutcome {
                    changed_cells: report.changes,
                    spawned: report.spawned,
                    score_delta: report.score,
                    legal: true,
                    terminal: false,
                }
            }
            None => MoveOutcome::default(),
        };
        outcome.terminal = self.is_terminal();
        debug!(
            ?side,
            legal = outcome.legal,
            score_delta = outcome.score_delta,
            score = self.score(),
            "move"
        );
        if outcome.terminal {
            info!(score = self.score(), "game over");
        }
        outcome
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo();
        if undone {
            info!(score = self.score(), "undo");
        }
        undone
    }

    /// Starts over with a fresh field, dropping all history.
    pub fn restart(&mut self) {
        let state = GameState::new_game(self.config.size, &self.rule, &mut self.rng);
        self.history = History::new(state);
        info!("restart");
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save::save(self.state(), path)
    }
    /// Replaces the current state with the saved one. The previous state stays
    /// in history, so undo goes back to it. A failed load changes nothing.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let state = save::load(path, self.config.size)?;
        self.history.push(state);
        Ok(())
    }
    pub fn save_slot(&self) -> Result<()> {
        self.save(&self.config.save_path)
    }
    pub fn load_slot(&mut self) -> Result<()> {
        let path = self.config.save_path.clone();
        self.load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::Array2;
    use rand::rngs::mock::StepRng;

    fn state(values: Vec<u32>, score: u64) -> GameState {
        let array = Array2::from_shape_vec((4, 4), values).unwrap();
        GameState::new(Field::from_array(&array).unwrap(), score)
    }

    fn seeded(seed: u64) -> Game {
        Game::new(Config {
            seed: Some(seed),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn new_game_has_two_small_tiles() {
        let mut rng = StdRng::seed_from_u64(7);
        let state = GameState::new_game(4, &SpawnRule::default(), &mut rng);
        let tiles: Vec<_> = state.field().tiles().collect();
        assert_eq!(tiles.len(), 2);
        assert!(tiles
            .iter()
            .all(|(_, tile)| *tile == Tile::TWO || *tile == Tile::FOUR));
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn spawn_rule_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let twos = SpawnRule {
            four_probability: 0.0,
        };
        let fours = SpawnRule {
            four_probability: 1.0,
        };
        for _ in 0..32 {
            assert_eq!(twos.pick(&mut rng), Tile::TWO);
            assert_eq!(fours.pick(&mut rng), Tile::FOUR);
        }
    }

    #[test]
    fn spawn_tile_on_full_field_is_noop() {
        #[rustfmt::skip]
        let mut full = state(vec![
            2, 4, 2, 4,
            4, 2, 4, 2,
            2, 4, 2, 4,
            4, 2, 4, 2,
        ], 0);
        let before = full.clone();
        let mut rng = StepRng::new(0, 1);
        assert_eq!(full.spawn_tile(&SpawnRule::default(), &mut rng), None);
        assert_eq!(full, before);
    }

    #[test]
    fn attempt_move_merges_and_spawns() {
        #[rustfmt::skip]
        let mut game = state(vec![
            2, 0, 0, 2,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ], 10);
        let mut rng = StdRng::seed_from_u64(3);
        let report = game
            .attempt_move(Direction::Left, &SpawnRule::default(), &mut rng)
            .unwrap();
        assert_eq!(report.score, 4);
        assert_eq!(game.score(), 14);
        assert_eq!(game.field().get(0, 0).unwrap(), Tile::from_value(4));
        let (pos, value) = report.spawned.unwrap();
        assert_ne!(pos, (0, 0));
        assert!(value == 2 || value == 4);
        assert_eq!(game.field().tiles().count(), 2);
    }

    #[test]
    fn attempt_move_illegal_keeps_state() {
        #[rustfmt::skip]
        let mut game = state(vec![
            2, 4, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ], 0);
        let before = game.clone();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(game
            .attempt_move(Direction::Left, &SpawnRule::default(), &mut rng)
            .is_none());
        assert!(game
            .attempt_move(Direction::Up, &SpawnRule::default(), &mut rng)
            .is_none());
        assert_eq!(game, before);
    }

    #[test]
    fn attempt_move_score_saturates() {
        #[rustfmt::skip]
        let mut game = state(vec![
            2, 2, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ], u64::MAX);
        let mut rng = StdRng::seed_from_u64(3);
        let report = game
            .attempt_move(Direction::Left, &SpawnRule::default(), &mut rng)
            .unwrap();
        assert_eq!(report.score, 4);
        assert_eq!(game.score(), u64::MAX);
    }

    #[test]
    fn terminal_detection() {
        #[rustfmt::skip]
        let lost = state(vec![
            2, 4, 2, 4,
            4, 2, 4, 2,
            2, 4, 2, 4,
            4, 2, 4, 2,
        ], 0);
        assert!(lost.is_terminal());
        #[rustfmt::skip]
        let alive = state(vec![
            2, 4, 2, 4,
            4, 2, 4, 2,
            2, 4, 2, 4,
            4, 2, 4, 4,
        ], 0);
        assert!(!alive.is_terminal());
        #[rustfmt::skip]
        let open = state(vec![
            2, 4, 2, 4,
            4, 2, 4, 2,
            2, 4, 2, 4,
            4, 2, 4, 0,
        ], 0);
        assert!(!open.is_terminal());
    }

    #[test]
    fn game_undo_bounds() {
        let mut game = seeded(42);
        let initial = game.state().clone();
        assert!(!game.undo());
        assert_eq!(game.state(), &initial);

        let mut moves = 0;
        for side in Direction::ALL.iter().cycle().take(40) {
            if game.handle_direction(*side).legal {
                moves += 1;
            }
        }
        assert!(moves > 0);
        assert_eq!(game.history_len(), moves + 1);
        for _ in 0..moves {
            assert!(game.undo());
        }
        assert!(!game.undo());
        assert_eq!(game.state(), &initial);
    }

    #[test]
    fn game_illegal_direction_changes_nothing() {
        let mut game = seeded(5);
        let mut guard = 0;
        while game.handle_direction(Direction::Left).legal {
            guard += 1;
            assert!(guard < 10_000);
        }
        let before = game.state().clone();
        let len = game.history_len();
        let outcome = game.handle_direction(Direction::Left);
        assert!(!outcome.legal);
        assert!(outcome.changed_cells.is_empty());
        assert_eq!(outcome.spawned, None);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(game.state(), &before);
        assert_eq!(game.history_len(), len);
    }

    #[test]
    fn game_is_reproducible_with_seed() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for side in Direction::ALL.iter().cycle().take(30) {
            assert_eq!(a.handle_direction(*side), b.handle_direction(*side));
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn game_restart_clears_history() {
        let mut game = seeded(11);
        for side in Direction::ALL.iter() {
            game.handle_direction(*side);
        }
        game.restart();
        assert_eq!(game.history_len(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.field().tiles().count(), 2);
    }

    #[test]
    fn game_load_pushes_and_undo_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sav.dat");
        let mut game = seeded(8);
        game.handle_direction(Direction::Up);
        game.handle_direction(Direction::Left);
        game.save(&path).unwrap();
        let saved = game.state().clone();

        game.restart();
        let fresh = game.state().clone();
        game.load(&path).unwrap();
        assert_eq!(game.state(), &saved);
        assert_eq!(game.history_len(), 2);
        assert!(game.undo());
        assert_eq!(game.state(), &fresh);
    }

    #[test]
    fn game_failed_load_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.dat");
        let broken = dir.path().join("broken.dat");
        std::fs::write(&broken, "2 2 2").unwrap();

        let mut game = seeded(21);
        let before = game.state().clone();
        assert!(matches!(game.load(&missing), Err(Error::Io { .. })));
        assert!(matches!(game.load(&broken), Err(Error::Format(_))));
        assert_eq!(game.state(), &before);
        assert_eq!(game.history_len(), 1);
    }

    #[test]
    fn game_reports_terminal_after_last_move() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nearly_lost.dat");
        // Left fills the only hole with a 2 and leaves no equal neighbours.
        std::fs::write(&path, "\
            0 8 16 32 \
            4 2 4 8 \
            2 4 8 4 \
            4 8 2 16 \
            100").unwrap();
        let mut game = Game::new(Config {
            four_probability: 0.0,
            seed: Some(1),
            ..Config::default()
        })
        .unwrap();
        game.load(&path).unwrap();
        assert!(!game.is_terminal());

        let outcome = game.handle_direction(Direction::Left);
        assert!(outcome.legal);
        assert!(outcome.terminal);
        assert_eq!(outcome.spawned, Some(((0, 3), 2)));
        assert!(game.is_terminal());

        let len = game.history_len();
        let outcome = game.handle_direction(Direction::Up);
        assert!(!outcome.legal);
        assert!(outcome.terminal);
        assert_eq!(game.history_len(), len);
    }

    #[test]
    fn game_survives_loading_largest_tiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.dat");
        std::fs::write(
            &path,
            format!("{0} {0} 0 0 0 0 0 0 0 0 0 0 0 0 0 0 {1}", 1u32 << 31, u64::MAX),
        )
        .unwrap();
        let mut game = seeded(2);
        game.load(&path).unwrap();
        let outcome = game.handle_direction(Direction::Left);
        assert!(!outcome.legal);
        let outcome = game.handle_direction(Direction::Right);
        assert!(outcome.legal);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(game.score(), u64::MAX);
        assert_eq!(game.field().max_value(), Some(1 << 31));
    }

    #[test]
    fn game_uses_configured_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = Game::new(Config {
            save_path: dir.path().join("slot.dat"),
            seed: Some(4),
            ..Config::default()
        })
        .unwrap();
        game.save_slot().unwrap();
        let saved = game.state().clone();
        game.handle_direction(Direction::Down);
        game.handle_direction(Direction::Right);
        game.load_slot().unwrap();
        assert_eq!(game.state(), &saved);
    }

    #[test]
    fn game_rejects_bad_config() {
        let result = Game::new(Config {
            size: 0,
            ..Config::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
