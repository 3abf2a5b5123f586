//! Demo autopilot
//!
//! Greedy food chaser with a flood-fill guard so it doesn't steer into
//! pockets smaller than itself. Plays headless runs in the native binary.

use std::collections::HashSet;

use super::state::{Cell, Direction, GameState};

/// Pick the next turn for the snake in `state`
pub fn choose_direction(state: &GameState) -> Direction {
    let current = state.direction;
    let head = state.head();
    let body: HashSet<Cell> = state.snake.iter().copied().collect();

    let mut best: Option<(Direction, (bool, u32, bool))> = None;
    for dir in Direction::ALL {
        if dir.is_opposite(current) {
            continue;
        }
        let next = head.step(dir);
        if !next.in_bounds() || body.contains(&next) {
            continue;
        }

        let room = reachable_cells(next, &body, state.len());
        let roomy = room >= state.len();
        let distance = next.manhattan(state.food);
        // Higher is better: roomy first, then closer food, then no turn
        let key = (roomy, u32::MAX - distance, dir == current);

        if best.is_none_or(|(_, best_key)| key > best_key) {
            best = Some((dir, key));
        }
    }

    best.map(|(dir, _)| dir).unwrap_or(current)
}

/// Flood fill from `start` over free cells, stopping once `limit` is reached
fn reachable_cells(start: Cell, body: &HashSet<Cell>, limit: usize) -> usize {
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    seen.insert(start);

    while let Some(cell) = stack.pop() {
        if seen.len() >= limit {
            break;
        }
        for dir in Direction::ALL {
            let next = cell.step(dir);
            if next.in_bounds() && !body.contains(&next) && seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen.len()
}
