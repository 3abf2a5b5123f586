//! Tick scheduling
//!
//! The engine is interval-agnostic. `TickClock` holds the "next tick due at
//! T + current_speed()" contract for whatever drives frames (rAF on the
//! web, a simulated clock natively).

use super::engine::Engine;
use super::state::GamePhase;
use crate::consts::MAX_CATCH_UP_TICKS;

#[derive(Debug, Clone, Default)]
pub struct TickClock {
    /// Absolute time (ms) the next tick is due, None while not running
    next_due_ms: Option<f64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the schedule. The next advance re-arms one interval out.
    pub fn reset(&mut self) {
        self.next_due_ms = None;
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        self.next_due_ms
    }

    /// Fire every tick due at or before `now_ms`. Returns ticks fired.
    pub fn advance(&mut self, now_ms: f64, engine: &mut Engine) -> u32 {
        if engine.phase() != GamePhase::Running {
            self.next_due_ms = None;
            return 0;
        }

        let mut due = match self.next_due_ms {
            Some(due) => due,
            None => {
                // First advance after start/resume just arms the timer
                self.next_due_ms = Some(now_ms + f64::from(engine.current_speed()));
                return 0;
            }
        };

        let mut fired = 0;
        while now_ms >= due && fired < MAX_CATCH_UP_TICKS {
            engine.tick();
            fired += 1;
            if engine.phase() != GamePhase::Running {
                self.next_due_ms = None;
                return fired;
            }
            // Speed may have changed if the tick ate food
            due += f64::from(engine.current_speed());
        }

        if now_ms >= due {
            log::debug!("Dropping tick backlog ({:.0} ms behind)", now_ms - due);
            due = now_ms + f64::from(engine.current_speed());
        }
        self.next_due_ms = Some(due);
        fired
    }
}
