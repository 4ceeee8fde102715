use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use gloo_events::EventListener;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, Performance, Window};

use crate::controls::START_ROUND;
use crate::game::{FrameOutcome, Game};
use crate::hud::{Hud, HudElement};
use crate::input::wasm::WasmInputHandler;
use crate::input::{InputState, KeyCode};
use crate::render::{aspect_ratio, Renderer, SceneView};
use crate::GameConfig;

#[wasm_bindgen(start)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
}

/// Browser entry point: owns the game and drives it from `requestAnimationFrame`.
#[wasm_bindgen]
pub struct WasmGame {
    inner: Rc<RefCell<AppState>>,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: String, free_play: bool) -> Result<WasmGame, JsValue> {
        let window = window().ok_or_else(|| JsValue::from_str("window not available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document not available"))?;
        let performance = window
            .performance()
            .ok_or_else(|| JsValue::from_str("performance timer not available"))?;
        let canvas = document
            .get_element_by_id(&canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;

        let config = GameConfig {
            enable_timer: !free_play,
            ..GameConfig::default()
        };
        let game = Game::from_entropy(config).map_err(to_js)?;
        let renderer = Renderer::new(canvas.clone()).map_err(to_js)?;
        let input = Arc::new(InputState::new());
        let input_handler = WasmInputHandler::attach(&canvas, Arc::clone(&input)).map_err(to_js)?;

        let state = AppState {
            game,
            hud: dom_hud(&document),
            renderer,
            canvas,
            input,
            window,
            performance,
            _input_handler: input_handler,
            start_listeners: Vec::new(),
            frame_callback: None,
            frame_handle: None,
        };

        Ok(Self {
            inner: Rc::new(RefCell::new(state)),
        })
    }

    /// Hooks up the start triggers and draws the first frame.
    ///
    /// Free play begins animating immediately; timed play waits for a click
    /// on the menu or result overlay, or for the start key.
    pub fn start(&self) -> Result<(), JsValue> {
        attach_start_triggers(&self.inner).map_err(to_js)?;
        let running = self.inner.borrow().game.is_running();
        if running {
            ensure_animating(&self.inner).map_err(to_js)?;
        } else {
            self.inner.borrow_mut().draw();
        }
        Ok(())
    }

    pub fn score(&self) -> u32 {
        self.inner.borrow().game.round().score()
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().game.is_running()
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

struct AppState {
    game: Game,
    hud: Hud<DomElement>,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    input: Arc<InputState>,
    window: Window,
    performance: Performance,
    _input_handler: WasmInputHandler,
    start_listeners: Vec<EventListener>,
    frame_callback: Option<Closure<dyn FnMut()>>,
    frame_handle: Option<i32>,
}

impl AppState {
    fn now(&self) -> f64 {
        self.performance.now() / 1000.0
    }

    fn request_frame(&mut self) -> Result<()> {
        let callback = self
            .frame_callback
            .as_ref()
            .ok_or_else(|| anyhow!("frame callback not installed"))?;
        let handle = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("requestAnimationFrame failed: {err:?}"))?;
        self.frame_handle = Some(handle);
        Ok(())
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.frame_handle.take() {
            if let Err(err) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
    }

    fn advance(&mut self) -> FrameOutcome {
        let now = self.now();
        let Self {
            game, input, hud, ..
        } = self;
        game.frame(now, input, hud)
    }

    fn draw(&mut self) {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        self.renderer.resize((width, height));
        let (width, height) = self.renderer.size();
        let scene = SceneView::from_state(self.game.state(), aspect_ratio(width, height));
        self.renderer.render(&scene);
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

/// Schedules frames unless they already are. The callback is created once
/// and kept alive by the app state.
fn ensure_animating(app: &Rc<RefCell<AppState>>) -> Result<()> {
    let mut state = app.borrow_mut();
    if state.frame_handle.is_some() {
        return Ok(());
    }
    if state.frame_callback.is_none() {
        let weak = Rc::downgrade(app);
        state.frame_callback = Some(Closure::wrap(Box::new(move || {
            if let Some(app) = weak.upgrade() {
                if let Err(err) = on_animation_frame(&app) {
                    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
                }
            }
        }) as Box<dyn FnMut()>));
    }
    state.request_frame()
}

fn on_animation_frame(app: &Rc<RefCell<AppState>>) -> Result<()> {
    let mut state = app.borrow_mut();
    state.frame_handle = None;
    state.request_frame()?;

    if let FrameOutcome::TimedOut { final_score } = state.advance() {
        log::info!("stopping animation, final score {final_score}");
        state.cancel_frame();
    }
    state.draw();
    Ok(())
}

fn trigger_start(app: &Weak<RefCell<AppState>>) {
    let Some(app) = app.upgrade() else {
        return;
    };
    let started = {
        let mut state = app.borrow_mut();
        let now = state.now();
        let AppState { game, hud, .. } = &mut *state;
        game.start_round(now, hud)
    };
    if started {
        if let Err(err) = ensure_animating(&app) {
            web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
        }
    }
}

fn attach_start_triggers(app: &Rc<RefCell<AppState>>) -> Result<()> {
    let window = window().ok_or_else(|| anyhow!("window not available"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow!("document not available"))?;

    let mut listeners = Vec::new();
    for id in ["menu", "result"] {
        if let Some(element) = document.get_element_by_id(id) {
            let weak = Rc::downgrade(app);
            listeners.push(EventListener::new(&element, "click", move |_| {
                trigger_start(&weak);
            }));
        }
    }

    // Frames are not scheduled between rounds, so the start key is watched here.
    let weak = Rc::downgrade(app);
    listeners.push(EventListener::new(&document, "keydown", move |event| {
        let is_start = event
            .dyn_ref::<KeyboardEvent>()
            .and_then(|event| KeyCode::from_name(&event.key()))
            == Some(START_ROUND);
        if is_start {
            trigger_start(&weak);
        }
    }));

    app.borrow_mut().start_listeners = listeners;
    Ok(())
}

/// HUD element looked up by id; absent ids are skipped silently.
struct DomElement(Option<HtmlElement>);

impl DomElement {
    fn lookup(document: &Document, id: &str) -> Self {
        Self(
            document
                .get_element_by_id(id)
                .and_then(|element| element.dyn_into::<HtmlElement>().ok()),
        )
    }
}

impl HudElement for DomElement {
    fn is_present(&self) -> bool {
        self.0.is_some()
    }

    fn set_hidden(&mut self, hidden: bool) {
        let Some(element) = &self.0 else {
            return;
        };
        let classes = element.class_list();
        let result = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
        if let Err(err) = result {
            log::warn!("failed to toggle overlay: {err:?}");
        }
    }

    fn set_text(&mut self, text: &str) {
        if let Some(element) = &self.0 {
            element.set_inner_text(text);
        }
    }
}

fn dom_hud(document: &Document) -> Hud<DomElement> {
    Hud {
        menu: DomElement::lookup(document, "menu"),
        result: DomElement::lookup(document, "result"),
        final_score: DomElement::lookup(document, "score"),
        countdown: DomElement::lookup(document, "timer"),
        score: DomElement::lookup(document, "current-score"),
    }
}
