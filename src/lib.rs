//! Serpent Chompy - A grid snake game with procedural audio cues
//!
//! Core modules:
//! - `sim`: Deterministic simulation (engine, tick transition, food, events, clock)
//! - `session`: One play session gluing engine, clock, storage and audio
//! - `platform`: Input normalization, storage backends, browser handle
//! - `audio`: Event to sound mapping, engine hum, music sequencer
//! - `highscores` / `settings`: Persisted values

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Grid dimension (cells per side)
    pub const GRID_SIZE: i32 = 20;
    /// Total number of cells on the board
    pub const GRID_CELLS: usize = (GRID_SIZE * GRID_SIZE) as usize;

    /// Where a fresh snake's head is placed
    pub const ORIGIN_X: i32 = 10;
    pub const ORIGIN_Y: i32 = 10;

    /// Tick interval at score 0 (ms)
    pub const INITIAL_SPEED_MS: u32 = 150;
    /// Interval shaved off per point scored (ms)
    pub const SPEED_INCREMENT_MS: u32 = 3;
    /// Fastest allowed tick interval (ms)
    pub const MIN_SPEED_MS: u32 = 60;

    /// Maximum ticks fired per clock advance to prevent spiral of death
    pub const MAX_CATCH_UP_TICKS: u32 = 4;
}

/// Tick interval in milliseconds for a given score.
///
/// Linear ramp from `INITIAL_SPEED_MS` down to `MIN_SPEED_MS`.
#[inline]
pub fn tick_interval_ms(score: u32) -> u32 {
    use consts::*;
    INITIAL_SPEED_MS
        .saturating_sub(score.saturating_mul(SPEED_INCREMENT_MS))
        .max(MIN_SPEED_MS)
}
