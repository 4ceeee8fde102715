use std::sync::Arc;

use anyhow::{anyhow, Result};
use glam::Vec2;
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use super::{InputState, KeyCode};

/// Handles DOM input events and updates the shared [`InputState`].
pub struct WasmInputHandler {
    _listeners: Vec<EventListener>,
}

impl WasmInputHandler {
    pub fn attach(canvas: &HtmlCanvasElement, input: Arc<InputState>) -> Result<Self> {
        let window = window().ok_or_else(|| anyhow!("window not available"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow!("document not available"))?;

        let mut listeners = Vec::new();

        // Keys are captured on the whole document so the canvas does not need focus.
        {
            let input_state = Arc::clone(&input);
            listeners.push(EventListener::new(&document, "keydown", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    if let Some(code) = KeyCode::from_name(&event.key()) {
                        event.prevent_default();
                        input_state.set_key_down(code);
                    }
                }
            }));
        }

        {
            let input_state = Arc::clone(&input);
            listeners.push(EventListener::new(&document, "keyup", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    if let Some(code) = KeyCode::from_name(&event.key()) {
                        event.prevent_default();
                        input_state.set_key_up(code);
                    }
                }
            }));
        }

        {
            let input_state = Arc::clone(&input);
            listeners.push(EventListener::new(canvas, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    input_state.set_mouse_position(Vec2::new(
                        event.client_x() as f32,
                        event.client_y() as f32,
                    ));
                }
            }));
        }

        {
            let input_state = Arc::clone(&input);
            listeners.push(EventListener::new(&window, "blur", move |_| {
                input_state.release_all();
            }));
        }

        Ok(Self {
            _listeners: listeners,
        })
    }
}
