use float_ord::FloatOrd;
use model::Direction;
use winit::event::{ElementState, MouseButton, VirtualKeyCode};

const MIN_DRAG_MOUSE_MOVE: FloatOrd<f32> = FloatOrd(5.);

/// What the player asked the game to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Swipe(Direction),
    Undo,
    Restart,
    Save,
    Load,
}

pub fn command_from_key(state: ElementState, key: Option<VirtualKeyCode>) -> Option<Command> {
    if state != ElementState::Pressed {
        return None;
    }
    match key? {
        VirtualKeyCode::Left | VirtualKeyCode::A => Some(Command::Swipe(Direction::Left)),
        VirtualKeyCode::Right | VirtualKeyCode::D => Some(Command::Swipe(Direction::Right)),
        VirtualKeyCode::Up | VirtualKeyCode::W => Some(Command::Swipe(Direction::Up)),
        VirtualKeyCode::Down | VirtualKeyCode::S => Some(Command::Swipe(Direction::Down)),
        VirtualKeyCode::Back => Some(Command::Undo),
        VirtualKeyCode::R => Some(Command::Restart),
        VirtualKeyCode::F5 => Some(Command::Save),
        VirtualKeyCode::F9 => Some(Command::Load),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Turns left button drags into swipes.
///
/// A drag shorter than a few pixels counts as a click, which swipes from the
/// window center towards the click.
#[derive(Default)]
pub struct DragTracker {
    mouse_pos: Option<Point>,
    mouse_pressed_pos: Option<Point>,
}

impl DragTracker {
    pub fn on_mouse_move(&mut self, position: Point) {
        self.mouse_pos = Some(position);
    }

    pub fn on_mouse_input(
        &mut self,
        button: MouseButton,
        state: ElementState,
        window_size: Point,
    ) -> Option<Command> {
        let position = self.mouse_pos?;
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => {
                self.mouse_pressed_pos = Some(position);
                None
            }
            ElementState::Released => {
                let prev_position = self.mouse_pressed_pos.take()?;
                let mut dx = position.x - prev_position.x;
                let mut dy = position.y - prev_position.y;
                if FloatOrd(dx.abs()) < MIN_DRAG_MOUSE_MOVE
                    && FloatOrd(dy.abs()) < MIN_DRAG_MOUSE_MOVE
                {
                    dx = position.x - window_size.x / 2.;
                    dy = position.y - window_size.y / 2.;
                }
                let side = if FloatOrd(dx.abs()) > FloatOrd(dy.abs()) {
                    if dx.is_sign_positive() {
                        Direction::Right
                    } else {
                        Direction::Left
                    }
                } else if dy.is_sign_positive() {
                    Direction::Down
                } else {
                    Direction::Up
                };
                Some(Command::Swipe(side))
            }
        }
    }
}
