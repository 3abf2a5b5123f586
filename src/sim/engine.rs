//! Game engine
//!
//! Owns the simulation state and RNG, arbitrates direction input, and
//! delivers events to listeners after every transition.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{GameEvent, ListenerId, Listeners};
use super::food::place_food;
use super::state::{Cell, Direction, GamePhase, GameState};
use super::tick::{TickOutcome, tick};
use crate::tick_interval_ms;

/// A single snake game instance
#[derive(Debug)]
pub struct Engine {
    state: GameState,
    rng: Pcg32,
    listeners: Listeners,
    /// Scratch buffer reused across transitions
    pending_events: Vec<GameEvent>,
}

impl Engine {
    /// Create an engine in `NotStarted`, carrying over a persisted best score
    pub fn new(seed: u64, high_score: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let food = initial_food(&mut rng);
        Self {
            state: GameState::fresh(food, high_score, GamePhase::NotStarted),
            rng,
            listeners: Listeners::new(),
            pending_events: Vec::new(),
        }
    }

    /// Wrap an existing state (tests, replays).
    ///
    /// The snake must have at least one cell.
    pub fn from_state(state: GameState, seed: u64) -> Self {
        debug_assert!(!state.snake.is_empty(), "snake must have a head");
        Self {
            state,
            rng: Pcg32::seed_from_u64(seed),
            listeners: Listeners::new(),
            pending_events: Vec::new(),
        }
    }

    // === Lifecycle ===

    /// Begin a fresh run from any phase. Keeps the high score.
    pub fn start(&mut self) {
        let food = initial_food(&mut self.rng);
        self.state = GameState::fresh(food, self.state.high_score, GamePhase::Running);
        log::info!("Run started (best {})", self.state.high_score);
        self.emit(GameEvent::SessionStarted);
    }

    /// Alias for [`Engine::start`]
    pub fn reset(&mut self) {
        self.start();
    }

    /// Buffer a turn for the next tick.
    ///
    /// Ignored unless running, and when `dir` reverses the direction applied
    /// on the last tick. Overwrites any earlier buffered turn.
    /// Returns whether the input was accepted.
    pub fn submit_direction(&mut self, dir: Direction) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        if dir.is_opposite(self.state.direction) {
            return false;
        }
        self.state.pending_direction = dir;
        true
    }

    /// Advance one step
    pub fn tick(&mut self) -> TickOutcome {
        let mut events = std::mem::take(&mut self.pending_events);
        let outcome = tick(&mut self.state, &mut self.rng, &mut events);
        if outcome.is_terminal() {
            log::info!(
                "Run over ({:?}) score {} best {}",
                outcome,
                self.state.score,
                self.state.high_score
            );
        }
        self.listeners.dispatch(&events);
        events.clear();
        self.pending_events = events;
        outcome
    }

    /// Running <-> Paused. Returns the new phase.
    pub fn toggle_pause(&mut self) -> GamePhase {
        match self.state.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
        self.state.phase
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Paused;
            self.emit(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Running;
            self.emit(GameEvent::Resumed);
        }
    }

    // === Listeners ===

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Drop every listener
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    // === Accessors ===

    /// Tick interval (ms) for the current score
    pub fn current_speed(&self) -> u32 {
        tick_interval_ms(self.state.score)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn snake(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.state.snake.iter()
    }

    pub fn food(&self) -> Cell {
        self.state.food
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.state.pending_direction
    }

    fn emit(&mut self, event: GameEvent) {
        self.listeners.dispatch(&[event]);
    }
}

fn initial_food(rng: &mut Pcg32) -> Cell {
    let origin = [Cell::origin()];
    // A one-cell snake always leaves room
    place_food(&origin, rng).unwrap_or(Cell::new(0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::GameOverCause;
    use std::sync::mpsc;

    fn recorder(engine: &mut Engine) -> mpsc::Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        engine.subscribe(move |e| {
            let _ = tx.send(*e);
        });
        rx
    }

    #[test]
    fn test_new_engine_not_started() {
        let engine = Engine::new(42, 5);
        assert_eq!(engine.phase(), GamePhase::NotStarted);
        assert_eq!(engine.snake().copied().collect::<Vec<_>>(), vec![Cell::new(10, 10)]);
        assert_ne!(engine.food(), Cell::new(10, 10));
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.high_score(), 5);
    }

    #[test]
    fn test_start_emits_session_started() {
        let mut engine = Engine::new(42, 0);
        let rx = recorder(&mut engine);
        engine.start();
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![GameEvent::SessionStarted]);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut engine = Engine::new(42, 0);
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(engine.state().head(), Cell::origin());
    }

    #[test]
    fn test_direction_ignored_when_not_running() {
        let mut engine = Engine::new(42, 0);
        assert!(!engine.submit_direction(Direction::Up));
        assert_eq!(engine.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_reversal_rejected_against_applied_direction() {
        let mut engine = Engine::new(42, 0);
        engine.start();
        assert!(!engine.submit_direction(Direction::Left));
        // Buffered Up does not make Down legal; only the applied Right matters
        assert!(engine.submit_direction(Direction::Up));
        assert!(engine.submit_direction(Direction::Down));
        assert_eq!(engine.pending_direction(), Direction::Down);
    }

    #[test]
    fn test_pause_gates_ticks() {
        let mut engine = Engine::new(42, 0);
        let rx = recorder(&mut engine);
        engine.start();
        assert_eq!(engine.toggle_pause(), GamePhase::Paused);
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert!(!engine.submit_direction(Direction::Up));
        assert_eq!(engine.toggle_pause(), GamePhase::Running);
        assert_eq!(engine.tick(), TickOutcome::Moved);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::SessionStarted,
                GameEvent::Paused,
                GameEvent::Resumed,
                GameEvent::Step { score: 0 },
            ]
        );
    }

    #[test]
    fn test_toggle_pause_outside_run_is_noop() {
        let mut engine = Engine::new(42, 0);
        assert_eq!(engine.toggle_pause(), GamePhase::NotStarted);

        engine.start();
        while !engine.tick().is_terminal() {}
        assert_eq!(engine.toggle_pause(), GamePhase::GameOver);
    }

    #[test]
    fn test_running_straight_hits_right_wall() {
        let mut engine = Engine::new(42, 0);
        let rx = recorder(&mut engine);
        engine.start();
        let mut outcome = TickOutcome::Ignored;
        for _ in 0..20 {
            outcome = engine.tick();
            if outcome.is_terminal() {
                break;
            }
        }
        // Food along row 10 could have grown the snake, wall still ends it
        assert_eq!(outcome, TickOutcome::Ended(GameOverCause::Wall));
        assert_eq!(engine.state().head().x, 19);
        let walls = rx
            .try_iter()
            .filter(|e| *e == GameEvent::WallCollision)
            .count();
        assert_eq!(walls, 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "snake must have a head")]
    fn test_from_state_rejects_headless_snake() {
        let mut state = GameState::fresh(Cell::new(0, 0), 0, GamePhase::Running);
        state.snake.clear();
        let _ = Engine::from_state(state, 1);
    }

    #[test]
    fn test_unsubscribed_listener_stops_receiving() {
        let mut engine = Engine::new(1, 0);
        let (tx, rx) = mpsc::channel();
        let id = engine.subscribe(move |e| {
            let _ = tx.send(*e);
        });
        assert!(engine.unsubscribe(id));
        engine.start();
        assert!(rx.try_recv().is_err());
    }
}
