use crate::game::GameState;

/// Stack of game states, the top one is the current state.
///
/// The stack is never empty: the state a game starts from stays at the
/// bottom and cannot be undone.
#[derive(Clone, Debug)]
pub struct History {
    states: Vec<GameState>,
}

impl History {
    pub fn new(initial: GameState) -> Self {
        Self {
            states: vec![initial],
        }
    }
    pub fn push(&mut self, state: GameState) {
        self.states.push(state);
    }
    pub fn current(&self) -> &GameState {
        // `states` always holds the initial state
        &self.states[self.states.len() - 1]
    }
    pub fn can_undo(&self) -> bool {
        self.states.len() > 1
    }
    /// Drops the current state. Popped states are gone for good, there is no redo.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.states.pop();
            true
        } else {
            false
        }
    }
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }
}

#[test]
fn history_keeps_initial_state() {
    use crate::field::Field;
    let initial = GameState::new(Field::new(4), 0);
    let mut history = History::new(initial.clone());
    assert_eq!(history.len(), 1);
    assert!(!history.can_undo());
    assert!(!history.undo());
    assert_eq!(history.current(), &initial);
}

#[test]
fn history_undo_pops_in_order() {
    use crate::field::Field;
    let first = GameState::new(Field::new(4), 0);
    let second = GameState::new(Field::new(4), 4);
    let third = GameState::new(Field::new(4), 12);
    let mut history = History::new(first.clone());
    history.push(second.clone());
    history.push(third.clone());
    assert_eq!(history.current(), &third);
    assert!(history.undo());
    assert_eq!(history.current(), &second);
    assert!(history.undo());
    assert_eq!(history.current(), &first);
    assert!(!history.undo());
    assert_eq!(history.len(), 1);
}
