//! Browser bindings
//!
//! The page owns the canvas, the rAF loop and the DOM listeners; it feeds
//! raw keys, swipes, timestamps and blur into a `SnakeHandle` and reads
//! snapshots back for drawing.

use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

use super::input::{command_for_key, swipe_direction};
use super::storage::LocalStorage;
use crate::audio::web::WebAudio;
use crate::platform::Command;
use crate::session::Session;
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Serpent Chompy {} loaded", env!("CARGO_PKG_VERSION"));
}

#[wasm_bindgen]
pub struct SnakeHandle {
    session: Option<Session>,
}

#[wasm_bindgen]
impl SnakeHandle {
    /// Create a session. Without a seed the wall clock is used.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> SnakeHandle {
        let seed = seed.map_or_else(|| js_sys::Date::now() as u64, |s| s as u64);
        let storage = LocalStorage;
        let settings = Settings::load(&storage);
        let audio = WebAudio::new(&settings, seed);
        SnakeHandle {
            session: Some(Session::new(Box::new(storage), Box::new(audio), seed)),
        }
    }

    /// Feed a `KeyboardEvent.key`. Returns true if the key was consumed.
    pub fn key(&mut self, name: &str) -> bool {
        let Some(command) = command_for_key(name) else {
            return false;
        };
        self.with_session(|s| s.handle(command)).unwrap_or(false)
    }

    /// Feed a swipe delta (end minus start, CSS px)
    pub fn swipe(&mut self, dx: f32, dy: f32) -> bool {
        let Some(dir) = swipe_direction(dx, dy) else {
            return false;
        };
        self.with_session(|s| s.handle(Command::Turn(dir)))
            .unwrap_or(false)
    }

    /// Drive the game from requestAnimationFrame. Returns ticks fired.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        self.with_session(|s| s.frame(now_ms)).unwrap_or(0)
    }

    pub fn blur(&mut self) -> bool {
        self.with_session(|s| s.blur()).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = setMusicEnabled)]
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.with_session(|s| s.set_music_enabled(enabled));
    }

    /// Volumes are 0.0 - 1.0 and persisted
    #[wasm_bindgen(js_name = setMasterVolume)]
    pub fn set_master_volume(&mut self, vol: f32) {
        self.with_session(|s| s.set_master_volume(vol));
    }

    #[wasm_bindgen(js_name = setSfxVolume)]
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.with_session(|s| s.set_sfx_volume(vol));
    }

    #[wasm_bindgen(js_name = setMusicVolume)]
    pub fn set_music_volume(&mut self, vol: f32) {
        self.with_session(|s| s.set_music_volume(vol));
    }

    #[wasm_bindgen(js_name = setPauseOnBlur)]
    pub fn set_pause_on_blur(&mut self, enabled: bool) {
        self.with_session(|s| s.set_pause_on_blur(enabled));
    }

    /// Current game state plus speed, as a plain JS object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let session = self.session.as_ref().ok_or_else(disposed)?;
        to_value(&session.snapshot()).map_err(js_error)
    }

    /// Current tick interval (ms)
    pub fn speed(&self) -> Result<u32, JsValue> {
        let session = self.session.as_ref().ok_or_else(disposed)?;
        Ok(session.engine().current_speed())
    }

    /// Stop audio and release the session. Further calls are no-ops.
    pub fn dispose(&mut self) {
        if let Some(session) = self.session.take() {
            session.dispose();
        }
    }
}

impl SnakeHandle {
    fn with_session<T>(&mut self, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        self.session.as_mut().map(f)
    }
}

fn disposed() -> JsValue {
    JsError::new("session disposed").into()
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}
