//! Native windowed driver built on winit and the wgpu renderer.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use glam::Vec2;
use log::{info, warn};
use pollster::block_on;
use rand::Rng;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey as WinitNamedKey};
use winit::platform::run_on_demand::EventLoopExtRunOnDemand;
use winit::window::WindowBuilder;

use crate::game::{FrameOutcome, Game};
use crate::hud::{format_countdown, Hud, TextSlot};
use crate::input::{InputState, KeyCode, NamedKey};
use crate::render::{Renderer, SceneView};

const TITLE: &str = "Precision Cube";

/// Raised when no window or event loop can be created, e.g. without a display.
#[derive(Debug)]
pub struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

/// Opens a window and plays until it is closed.
///
/// Fails with [`WindowInitError`] before any frame is drawn when no window
/// can be created, so callers can fall back to headless mode.
pub fn run_windowed<R: Rng>(game: &mut Game<R>, hud: &mut Hud<TextSlot>) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let mut event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );
    let renderer = block_on(Renderer::new(Arc::clone(&window)))?;

    let mut app = WindowedApp {
        renderer,
        game,
        hud,
        input: Arc::new(InputState::new()),
        clock: Instant::now(),
        last_error: None,
    };

    event_loop
        .run_on_demand(|event, target| {
            target.set_control_flow(ControlFlow::Poll);
            if let Err(err) = app.process_event(&event) {
                app.last_error = Some(err);
                target.exit();
            } else if app.close_requested(&event) {
                target.exit();
            }
        })
        .map_err(|err| anyhow!("event loop failed: {err}"))?;

    match app.last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct WindowedApp<'a, R> {
    renderer: Renderer,
    game: &'a mut Game<R>,
    hud: &'a mut Hud<TextSlot>,
    input: Arc<InputState>,
    clock: Instant,
    last_error: Option<anyhow::Error>,
}

impl<R: Rng> WindowedApp<'_, R> {
    fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    fn close_requested(&self, event: &Event<()>) -> bool {
        matches!(
            event,
            Event::WindowEvent { event: WindowEvent::CloseRequested, window_id }
                if *window_id == self.renderer.window_id()
        )
    }

    fn process_event(&mut self, event: &Event<()>) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::Resized(size) => self.renderer.resize(*size),
                    WindowEvent::KeyboardInput { event, .. } => self.handle_keyboard(event),
                    WindowEvent::CursorMoved { position, .. } => {
                        let pos = Vec2::new(position.x as f32, position.y as f32);
                        self.input.set_mouse_position(pos);
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } => {
                        // Clicking the window stands in for the menu and result overlays.
                        let now = self.now();
                        if self.game.start_round(now, self.hud) {
                            println!("Round {} started", self.game.round().rounds_played());
                        }
                    }
                    WindowEvent::Focused(false) => self.input.release_all(),
                    WindowEvent::RedrawRequested => self.redraw()?,
                    _ => {}
                }
            }
            Event::AboutToWait => self.renderer.window().request_redraw(),
            _ => {}
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let now = self.now();
        match self.game.frame(now, &self.input, self.hud) {
            FrameOutcome::Started => println!("Round {} started", self.game.round().rounds_played()),
            FrameOutcome::Scored { score } => println!("Target matched. Score: {score}"),
            FrameOutcome::TimedOut { final_score } => {
                println!("Round over. Final score: {final_score}");
            }
            FrameOutcome::Idle | FrameOutcome::Running { .. } => {}
        }
        self.renderer
            .window()
            .set_title(&window_title(self.game, now));

        let scene = SceneView::from_state(self.game.state(), self.renderer.aspect());
        if let Err(err) = self.renderer.render(&scene) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("Surface timeout; retrying next frame");
                }
            }
        }
        Ok(())
    }

    fn handle_keyboard(&self, event: &KeyEvent) {
        let Some(keycode) = map_key(&event.logical_key) else {
            return;
        };
        match event.state {
            ElementState::Pressed => self.input.set_key_down(keycode),
            ElementState::Released => self.input.set_key_up(keycode),
        }
    }
}

/// Window title standing in for the DOM overlays.
pub fn window_title<R>(game: &Game<R>, now: f64) -> String {
    let round = game.round();
    match game.countdown(now) {
        Some(remaining) => format!(
            "{TITLE} | Score: {} | {}",
            round.score(),
            format_countdown(remaining)
        ),
        None if game.is_running() => format!("{TITLE} | free play"),
        None if round.rounds_played() > 0 => format!(
            "{TITLE} | Final score: {} | click or press Space to play again",
            round.score()
        ),
        None => format!("{TITLE} | click or press Space to start"),
    }
}

/// Maps a winit logical key onto the game's key identifiers.
pub fn map_key(key: &Key) -> Option<KeyCode> {
    match key {
        Key::Named(named) => map_named_key(*named),
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::from_char(ch),
                _ => {
                    warn!("ignoring multi-character key {text:?}");
                    None
                }
            }
        }
        _ => None,
    }
}

fn map_named_key(key: WinitNamedKey) -> Option<KeyCode> {
    Some(match key {
        WinitNamedKey::Space => KeyCode::Named(NamedKey::Space),
        WinitNamedKey::Enter => KeyCode::Named(NamedKey::Enter),
        WinitNamedKey::Tab => KeyCode::Named(NamedKey::Tab),
        WinitNamedKey::ArrowLeft => KeyCode::Named(NamedKey::Left),
        WinitNamedKey::ArrowRight => KeyCode::Named(NamedKey::Right),
        WinitNamedKey::ArrowUp => KeyCode::Named(NamedKey::Up),
        WinitNamedKey::ArrowDown => KeyCode::Named(NamedKey::Down),
        WinitNamedKey::Escape => KeyCode::Named(NamedKey::Escape),
        WinitNamedKey::Backspace => KeyCode::Named(NamedKey::Backspace),
        WinitNamedKey::Shift => KeyCode::Named(NamedKey::LeftShift),
        WinitNamedKey::Control => KeyCode::Named(NamedKey::LeftCtrl),
        WinitNamedKey::Alt => KeyCode::Named(NamedKey::LeftAlt),
        WinitNamedKey::F1 => KeyCode::Function(1),
        WinitNamedKey::F2 => KeyCode::Function(2),
        WinitNamedKey::F3 => KeyCode::Function(3),
        WinitNamedKey::F4 => KeyCode::Function(4),
        WinitNamedKey::F5 => KeyCode::Function(5),
        WinitNamedKey::F6 => KeyCode::Function(6),
        WinitNamedKey::F7 => KeyCode::Function(7),
        WinitNamedKey::F8 => KeyCode::Function(8),
        WinitNamedKey::F9 => KeyCode::Function(9),
        WinitNamedKey::F10 => KeyCode::Function(10),
        WinitNamedKey::F11 => KeyCode::Function(11),
        WinitNamedKey::F12 => KeyCode::Function(12),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn maps_arrows_and_printable_keys() {
        assert_eq!(
            map_key(&Key::Named(WinitNamedKey::ArrowUp)),
            Some(KeyCode::Named(NamedKey::Up))
        );
        assert_eq!(
            map_key(&Key::Character("w".into())),
            Some(KeyCode::Character('W'))
        );
        assert_eq!(
            map_key(&Key::Character(".".into())),
            Some(KeyCode::Character('.'))
        );
        assert_eq!(map_key(&Key::Named(WinitNamedKey::CapsLock)), None);
    }

    #[test]
    fn title_follows_round_phase() {
        let config = GameConfig {
            time_budget: 10.0,
            ..GameConfig::default()
        };
        let mut game = Game::seeded(config, 1).unwrap();
        let mut hud = Hud::in_memory();
        let input = InputState::new();
        assert_eq!(
            window_title(&game, 0.0),
            "Precision Cube | click or press Space to start"
        );

        game.start_round(0.0, &mut hud);
        assert_eq!(
            window_title(&game, 2.5),
            "Precision Cube | Score: 0 | Time: 7.50"
        );

        game.frame(11.0, &input, &mut hud);
        assert_eq!(
            window_title(&game, 11.0),
            "Precision Cube | Final score: 0 | click or press Space to play again"
        );
    }

    #[test]
    fn free_play_title_has_no_clock() {
        let config = GameConfig {
            enable_timer: false,
            ..GameConfig::default()
        };
        let game = Game::seeded(config, 1).unwrap();
        assert_eq!(window_title(&game, 42.0), "Precision Cube | free play");
    }

    #[test]
    fn panic_payloads_become_messages() {
        let err = WindowInitError::from_panic("event loop", Box::new("no display"));
        assert_eq!(err.to_string(), "failed to initialize event loop: no display");
    }
}
