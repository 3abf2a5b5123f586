//! Fixed-step simulation tick
//!
//! One call advances the snake by one cell. The caller decides when a
//! tick is due; this module never looks at time.

use rand::Rng;

use super::events::{GameEvent, GameOverCause};
use super::food::place_food;
use super::state::{GamePhase, GameState};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Engine was not running, nothing changed
    Ignored,
    /// Snake moved, length unchanged
    Moved,
    /// Snake ate and grew by one
    Ate,
    /// Run ended; the snake was not moved (or, for a full board, grew last)
    Ended(GameOverCause),
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Ended(_))
    }
}

/// Advance the game state by one step
pub fn tick<R: Rng>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) -> TickOutcome {
    if state.phase != GamePhase::Running {
        return TickOutcome::Ignored;
    }

    // Commit the buffered input
    state.direction = state.pending_direction;
    state.ticks += 1;

    let new_head = state.head().step(state.direction);

    if !new_head.in_bounds() {
        return end_run(state, events, GameEvent::WallCollision, GameOverCause::Wall);
    }

    // Tail still counts as occupied even though it would move away this tick
    if state.occupies(new_head) {
        return end_run(
            state,
            events,
            GameEvent::SelfCollision,
            GameOverCause::SelfCollision,
        );
    }

    state.snake.push_front(new_head);

    if new_head != state.food {
        state.snake.pop_back();
        events.push(GameEvent::Step { score: state.score });
        return TickOutcome::Moved;
    }

    state.score += 1;
    events.push(GameEvent::FoodEaten {
        cell: new_head,
        score: state.score,
    });
    if state.score > state.high_score {
        state.high_score = state.score;
        events.push(GameEvent::NewHighScore { score: state.high_score });
    }

    match place_food(&state.snake, rng) {
        Some(food) => {
            state.food = food;
            TickOutcome::Ate
        }
        None => {
            log::info!("Board filled at score {}", state.score);
            end_run(state, events, GameEvent::BoardFilled, GameOverCause::BoardFull)
        }
    }
}

fn end_run(
    state: &mut GameState,
    events: &mut Vec<GameEvent>,
    cause_event: GameEvent,
    cause: GameOverCause,
) -> TickOutcome {
    state.phase = GamePhase::GameOver;
    events.push(cause_event);
    events.push(GameEvent::GameOver {
        score: state.score,
        cause,
    });
    TickOutcome::Ended(cause)
}
