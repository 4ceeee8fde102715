//! Per-frame keyboard and mouse handling for the player cube.

use glam::Vec2;
use log::trace;

use crate::config::GameConfig;
use crate::input::{InputState, KeyCode, NamedKey};
use crate::transform::BoxTransform;

pub const MOVE_UP: KeyCode = KeyCode::Character('W');
pub const MOVE_DOWN: KeyCode = KeyCode::Character('S');
pub const MOVE_LEFT: KeyCode = KeyCode::Character('A');
pub const MOVE_RIGHT: KeyCode = KeyCode::Character('D');
pub const MOVE_FORWARD: KeyCode = KeyCode::Character('E');
pub const MOVE_BACK: KeyCode = KeyCode::Character('Q');
pub const RESET_CUBE: KeyCode = KeyCode::Character('X');
pub const ROTATE_MODIFIER: KeyCode = KeyCode::Character('R');
pub const GROW_Y: KeyCode = KeyCode::Named(NamedKey::Up);
pub const SHRINK_Y: KeyCode = KeyCode::Named(NamedKey::Down);
pub const GROW_X: KeyCode = KeyCode::Named(NamedKey::Right);
pub const SHRINK_X: KeyCode = KeyCode::Named(NamedKey::Left);
pub const GROW_Z: KeyCode = KeyCode::Character('.');
pub const SHRINK_Z: KeyCode = KeyCode::Character(',');
pub const START_ROUND: KeyCode = KeyCode::Named(NamedKey::Space);

/// Applies one frame of held keys and mouse travel to `cube`.
///
/// `last_mouse` holds the mouse position seen by the previous poll; the
/// rotate drag is the difference to the current position.
pub fn apply_frame(
    cube: &mut BoxTransform,
    last_mouse: &mut Option<Vec2>,
    input: &InputState,
    config: &GameConfig,
) {
    let held = |key| input.is_key_down(key);
    let step = config.position_step;

    if held(MOVE_UP) {
        cube.position.y += step;
    }
    if held(MOVE_DOWN) {
        cube.position.y -= step;
    }
    if held(MOVE_LEFT) {
        cube.position.x -= step;
    }
    if held(MOVE_RIGHT) {
        cube.position.x += step;
    }
    if held(MOVE_FORWARD) {
        cube.position.z += step;
    }
    if held(MOVE_BACK) {
        cube.position.z -= step;
    }
    if held(RESET_CUBE) {
        cube.reset();
    }

    let step = config.scale_step;
    if held(GROW_Y) {
        cube.scale.y += step;
    }
    if held(SHRINK_Y) {
        shrink(&mut cube.scale.y, step);
    }
    if held(GROW_X) {
        cube.scale.x += step;
    }
    if held(SHRINK_X) {
        shrink(&mut cube.scale.x, step);
    }
    if held(GROW_Z) {
        cube.scale.z += step;
    }
    if held(SHRINK_Z) {
        shrink(&mut cube.scale.z, step);
    }

    let mouse = input.mouse_position();
    let delta = last_mouse.map_or(Vec2::ZERO, |last| mouse - last);
    *last_mouse = Some(mouse);
    if held(ROTATE_MODIFIER) && delta != Vec2::ZERO {
        let angles = delta / config.rotate_sensitivity;
        cube.rotate_local_y(angles.x);
        cube.rotate_local_x(angles.y);
        trace!("rotate drag {delta} -> {angles}");
    }
}

/// The start key only means something between rounds; callers decide.
pub fn start_requested(input: &InputState) -> bool {
    input.is_key_down(START_ROUND)
}

/// Decrements `value` only while the result stays strictly positive.
pub fn shrink(value: &mut f32, step: f32) {
    if *value - step > 0.0 {
        *value -= step;
    }
}
