use model::{Game, MoveOutcome};
use tracing::{debug, error, info, warn};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use crate::input::{command_from_key, Command, DragTracker, Point};

pub struct GameWindow {
    game: Game,
    window: Window,
    drag: DragTracker,
    status: Option<&'static str>,
}

impl GameWindow {
    pub fn new(game: Game, event_loop: &EventLoop<()>) -> anyhow::Result<Self> {
        let window = WindowBuilder::new()
            .with_title("2048")
            .with_inner_size(LogicalSize::new(480., 480.))
            .build(event_loop)?;
        let game_window = Self {
            game,
            window,
            drag: DragTracker::default(),
            status: None,
        };
        game_window.update_title();
        info!("\n{}", game_window.game.field());
        Ok(game_window)
    }

    fn window_size(&self) -> Point {
        let size = self.window.inner_size();
        Point {
            x: size.width as f32,
            y: size.height as f32,
        }
    }

    fn update_title(&self) {
        let mut title = format!("2048 | score {}", self.game.score());
        if let Some(status) = self.status {
            title.push_str(" | ");
            title.push_str(status);
        }
        self.window.set_title(&title);
    }

    fn apply(&mut self, command: Command) {
        self.status = None;
        match command {
            Command::Swipe(side) => {
                let outcome = self.game.handle_direction(side);
                if outcome.legal {
                    log_outcome(&outcome);
                    info!("\n{}", self.game.field());
                }
                if outcome.terminal {
                    warn!(score = self.game.score(), "no moves left");
                    self.status = Some("game over");
                }
            }
            Command::Undo => {
                if self.game.undo() {
                    info!("\n{}", self.game.field());
                } else {
                    debug!("nothing to undo");
                }
            }
            Command::Restart => {
                self.game.restart();
                info!("\n{}", self.game.field());
            }
            Command::Save => {
                self.status = Some(match self.game.save_slot() {
                    Ok(()) => "saved",
                    Err(e) => {
                        error!(error = %e, "cannot save game");
                        "save failed"
                    }
                });
            }
            Command::Load => {
                self.status = Some(match self.game.load_slot() {
                    Ok(()) => {
                        info!("\n{}", self.game.field());
                        "loaded"
                    }
                    Err(e) => {
                        error!(error = %e, "cannot load game");
                        "load failed"
                    }
                });
            }
        }
        self.update_title();
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> ! {
        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Wait;
            let command = match event {
                Event::WindowEvent { event, window_id } if window_id == self.window.id() => {
                    match event {
                        WindowEvent::CloseRequested => {
                            *control_flow = ControlFlow::Exit;
                            None
                        }
                        WindowEvent::KeyboardInput { input, .. } => {
                            command_from_key(input.state, input.virtual_keycode)
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            self.drag.on_mouse_move(Point {
                                x: position.x as f32,
                                y: position.y as f32,
                            });
                            None
                        }
                        WindowEvent::MouseInput { state, button, .. } => {
                            let size = self.window_size();
                            self.drag.on_mouse_input(button, state, size)
                        }
                        _ => None,
                    }
                }
                _ => None,
            };
            if let Some(command) = command {
                self.apply(command);
            }
        })
    }
}

/// Stands in for tile animation: reports every tile the move touched.
fn log_outcome(outcome: &MoveOutcome) {
    for change in &outcome.changed_cells {
        debug!(
            from = ?change.from,
            to = ?change.to,
            value = change.value,
            merged = change.merged,
            "tile"
        );
    }
    if let Some((pos, value)) = outcome.spawned {
        debug!(?pos, value, "tile appeared");
    }
}
