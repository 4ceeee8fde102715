use std::collections::HashSet;

use glam::Vec2;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
pub mod wasm;

/// Identifier for a physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    /// Printable key. Letters are stored upper-case.
    Character(char),
    Digit(u8),
    Function(u8),
}

impl KeyCode {
    /// Resolves a key name as reported by browsers (`KeyboardEvent.key`) or
    /// typed on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(key) = parse_named_key(name) {
            return Some(key);
        }
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Self::from_char(ch);
        }
        if let Some(function) = name.strip_prefix('F').or_else(|| name.strip_prefix('f')) {
            if let Ok(index) = function.parse::<u8>() {
                if (1..=25).contains(&index) {
                    return Some(Self::Function(index));
                }
            }
        }
        None
    }

    pub fn from_char(ch: char) -> Option<Self> {
        if ch == ' ' {
            Some(Self::Named(NamedKey::Space))
        } else if ch.is_ascii_digit() {
            Some(Self::Digit(ch as u8 - b'0'))
        } else if ch.is_ascii_graphic() {
            Some(Self::Character(ch.to_ascii_uppercase()))
        } else {
            None
        }
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    use NamedKey::*;
    let key = match name {
        "Space" | "Spacebar" => Space,
        "Enter" | "Return" => Enter,
        "Tab" => Tab,
        "Left" | "ArrowLeft" => Left,
        "Right" | "ArrowRight" => Right,
        "Up" | "ArrowUp" => Up,
        "Down" | "ArrowDown" => Down,
        "Escape" | "Esc" => Escape,
        "Backspace" => Backspace,
        "Shift" | "LeftShift" | "LShift" => LeftShift,
        "RightShift" | "RShift" => RightShift,
        "Control" | "LeftCtrl" | "LControl" => LeftCtrl,
        "RightCtrl" | "RControl" => RightCtrl,
        "Alt" | "LeftAlt" | "LAlt" => LeftAlt,
        "RightAlt" | "RAlt" => RightAlt,
        _ => return None,
    };
    Some(KeyCode::Named(key))
}

/// Friendly names for the non-printable keys the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Enter,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Escape,
    Backspace,
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
}

/// Input snapshot written by event callbacks and polled once per frame.
///
/// Last write wins; nothing is queued.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
    mouse_position: RwLock<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn release_all(&self) {
        self.keys.write().clear();
    }

    pub fn set_mouse_position(&self, position: Vec2) {
        *self.mouse_position.write() = position;
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }

    pub fn mouse_position(&self) -> Vec2 {
        *self.mouse_position.read()
    }
}
