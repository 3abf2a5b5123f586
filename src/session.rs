//! One play session
//!
//! Glues an [`Engine`] to its tick clock, persistence and audio. Engine
//! events arrive through a channel listener and are drained after every
//! operation, so the engine never calls back into the session.

use std::sync::mpsc;

use serde::Serialize;

use crate::audio::{AudioCommand, AudioDirector, AudioOutput};
use crate::highscores::HighScore;
use crate::platform::{Command, Storage};
use crate::settings::Settings;
use crate::sim::{Engine, GameEvent, GamePhase, GameState, TickClock};

/// Serializable view for renderers
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: GameState,
    /// Current tick interval (ms)
    pub speed_ms: u32,
    pub muted: bool,
}

pub struct Session {
    engine: Engine,
    clock: TickClock,
    events: mpsc::Receiver<GameEvent>,
    storage: Box<dyn Storage>,
    high_score: HighScore,
    settings: Settings,
    director: AudioDirector,
    audio: Box<dyn AudioOutput>,
}

impl Session {
    /// Load persisted values and build a NotStarted engine
    pub fn new(storage: Box<dyn Storage>, audio: Box<dyn AudioOutput>, seed: u64) -> Self {
        let high_score = HighScore::load(storage.as_ref());
        let settings = Settings::load(storage.as_ref());
        let mut engine = Engine::new(seed, high_score.best);

        let (tx, events) = mpsc::channel();
        engine.subscribe(move |event| {
            // Receiver gone means the session is being torn down
            let _ = tx.send(*event);
        });

        log::info!(
            "Session created (seed {}, best {}, muted {})",
            seed,
            high_score.best,
            settings.muted
        );

        Self {
            engine,
            clock: TickClock::new(),
            events,
            storage,
            high_score,
            director: AudioDirector::new(&settings),
            settings,
            audio,
        }
    }

    /// Apply a normalized input. Returns whether it had any effect.
    pub fn handle(&mut self, command: Command) -> bool {
        let phase = self.engine.phase();
        let handled = match command {
            Command::Turn(dir) => phase == GamePhase::Running && self.engine.submit_direction(dir),
            Command::StartOrRestart => {
                if phase == GamePhase::Running {
                    false
                } else {
                    self.clock.reset();
                    self.engine.start();
                    true
                }
            }
            Command::TogglePause => self.engine.toggle_pause() != phase,
            Command::ToggleMute => {
                self.set_muted(!self.settings.muted);
                true
            }
        };
        self.pump_events();
        handled
    }

    /// Drive the tick clock to `now_ms`. Returns ticks fired.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let fired = self.clock.advance(now_ms, &mut self.engine);
        self.pump_events();
        self.audio.update();
        fired
    }

    /// Window lost focus. Returns whether the game was paused.
    pub fn blur(&mut self) -> bool {
        if !self.settings.pause_on_blur || self.engine.phase() != GamePhase::Running {
            return false;
        }
        log::debug!("Pausing on blur");
        self.engine.pause();
        self.pump_events();
        true
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.settings.save(self.storage.as_mut());
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        // Volumes first so restarted loops come back at the right level
        self.push_volume();
        let commands = self.director.set_muted(muted);
        self.apply_audio(&commands);
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.settings.music_enabled = enabled;
        self.settings.save(self.storage.as_mut());
        self.push_volume();
        let commands = self.director.set_music_enabled(enabled);
        self.apply_audio(&commands);
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.set_master_volume(vol);
        self.volume_changed();
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.settings.set_sfx_volume(vol);
        self.volume_changed();
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.settings.set_music_volume(vol);
        self.volume_changed();
    }

    pub fn set_pause_on_blur(&mut self, enabled: bool) {
        self.settings.pause_on_blur = enabled;
        self.settings.save(self.storage.as_mut());
    }

    // === Accessors ===

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.engine.state().clone(),
            speed_ms: self.engine.current_speed(),
            muted: self.settings.muted,
        }
    }

    /// Stop audio and detach listeners
    pub fn dispose(mut self) {
        self.engine.clear_listeners();
        self.pump_events();
        self.audio.shutdown();
        log::info!(
            "Session disposed (score {}, best {})",
            self.engine.score(),
            self.high_score.best
        );
    }

    fn pump_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GameEvent::NewHighScore { score } => {
                    self.high_score.record(score, self.storage.as_mut());
                }
                GameEvent::GameOver { score, cause } => {
                    log::info!("Game over ({:?}) with {} points", cause, score);
                }
                _ => {}
            }
            let commands = self.director.on_event(&event);
            self.apply_audio(&commands);
        }
    }

    fn volume_changed(&mut self) {
        self.settings.save(self.storage.as_mut());
        self.push_volume();
    }

    fn push_volume(&mut self) {
        self.audio.apply(&AudioCommand::volume_for(&self.settings));
    }

    fn apply_audio(&mut self, commands: &[AudioCommand]) {
        for command in commands {
            self.audio.apply(command);
        }
    }
}
