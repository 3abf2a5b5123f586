//! Food placement
//!
//! Rejection sampling over the full grid: draw uniformly, redraw while the
//! candidate lands on the snake.

use rand::Rng;

use super::state::Cell;
use crate::consts::*;

/// Pick a random free cell for food.
///
/// Returns `None` only when the snake already covers the whole board.
pub fn place_food<'a, R, I>(snake: I, rng: &mut R) -> Option<Cell>
where
    R: Rng,
    I: IntoIterator<Item = &'a Cell>,
    I::IntoIter: Clone,
{
    let body = snake.into_iter();
    if body.clone().count() >= GRID_CELLS {
        return None;
    }

    loop {
        let candidate = Cell::new(
            rng.random_range(0..GRID_SIZE),
            rng.random_range(0..GRID_SIZE),
        );
        if !body.clone().any(|c| *c == candidate) {
            return Some(candidate);
        }
    }
}
