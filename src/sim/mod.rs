//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Ticks are delivered from outside, no timers inside
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod engine;
pub mod events;
pub mod food;
pub mod state;
pub mod tick;

pub use autopilot::choose_direction;
pub use clock::TickClock;
pub use engine::Engine;
pub use events::{GameEvent, GameOverCause, ListenerId, Listeners};
pub use food::place_food;
pub use state::{Cell, Direction, GamePhase, GameState};
pub use tick::{TickOutcome, tick};
