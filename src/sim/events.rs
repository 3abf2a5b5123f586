//! Engine events and listener registry
//!
//! Collaborators (audio, persistence, UI) subscribe here instead of being
//! called directly by the simulation.

use serde::{Deserialize, Serialize};

use super::state::Cell;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Wall,
    SelfCollision,
    /// Snake covers every cell, no room left for food
    BoardFull,
}

/// Something the engine did that collaborators may react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// start()/reset() entered Running
    SessionStarted,
    /// Non-eating move, carries the current score
    Step { score: u32 },
    /// Head landed on food, `score` is the new score
    FoodEaten { cell: Cell, score: u32 },
    WallCollision,
    SelfCollision,
    /// Snake filled the board
    BoardFilled,
    /// Terminal for the run
    GameOver { score: u32, cause: GameOverCause },
    /// Best score increased
    NewHighScore { score: u32 },
    Paused,
    Resumed,
}

/// Handle returned by [`Listeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Ordered set of event callbacks
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, invoked in registration order
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver events to every listener
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            log::debug!("event: {:?}", event);
            for (_, listener) in self.entries.iter_mut() {
                listener(event);
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_in_order_and_unsubscribe() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();

        let a = {
            let log = log.clone();
            listeners.subscribe(move |e| log.borrow_mut().push(("a", *e)))
        };
        {
            let log = log.clone();
            listeners.subscribe(move |e| log.borrow_mut().push(("b", *e)));
        }

        listeners.dispatch(&[GameEvent::SessionStarted]);
        assert_eq!(
            *log.borrow(),
            vec![("a", GameEvent::SessionStarted), ("b", GameEvent::SessionStarted)]
        );

        assert!(listeners.unsubscribe(a));
        assert!(!listeners.unsubscribe(a));
        log.borrow_mut().clear();
        listeners.dispatch(&[GameEvent::Paused]);
        assert_eq!(*log.borrow(), vec![("b", GameEvent::Paused)]);
    }
}
