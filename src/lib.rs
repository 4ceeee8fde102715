//! A 3D precision game: steer, rotate and scale a cube until it covers a
//! randomly placed wireframe target before the clock runs out.
//!
//! The game logic lives in plain modules (`config`, `controls`, `matching`,
//! `round`, `target`, `transform`) tied together by [`Game`], which advances
//! one frame at a time from an [`InputState`] snapshot. Front ends only supply
//! a clock, input events and a [`Hud`]: a winit/wgpu window natively, a
//! canvas and DOM overlays in the browser, or the [`headless`] driver for
//! scripted runs and tests.

#[cfg(not(target_arch = "wasm32"))]
pub mod app;
pub mod config;
pub mod controls;
pub mod game;
pub mod headless;
pub mod hud;
pub mod input;
pub mod matching;
pub mod render;
pub mod round;
pub mod target;
pub mod transform;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{ConfigError, GameConfig};
pub use game::{FrameOutcome, Game, GameState};
pub use headless::{run_headless, HeadlessEvent, HeadlessOptions, HeadlessReport};
pub use hud::{Hud, HudElement, TextSlot};
pub use input::{InputState, KeyCode, NamedKey};
pub use matching::{matches, CoverageGrid};
pub use render::{CameraParams, LightParams, Renderer, SceneView};
pub use round::{RoundPhase, RoundState};
pub use target::generate_target;
pub use transform::{BoxTransform, TargetBox};
