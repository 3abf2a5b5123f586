//! Input normalization
//!
//! Raw keys and swipe deltas never reach the engine; they are turned into
//! a `Command` here first.

use crate::sim::Direction;

/// Minimum swipe travel (px) on either axis; shorter gestures are taps
pub const MIN_SWIPE_DISTANCE: f32 = 10.0;

/// UI-agnostic input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// Space/Enter - start, or restart when not running
    StartOrRestart,
    TogglePause,
    ToggleMute,
}

/// Map a `KeyboardEvent.key` value to a command
pub fn command_for_key(key: &str) -> Option<Command> {
    let command = match key {
        "ArrowUp" => Command::Turn(Direction::Up),
        "ArrowDown" => Command::Turn(Direction::Down),
        "ArrowLeft" => Command::Turn(Direction::Left),
        "ArrowRight" => Command::Turn(Direction::Right),
        " " | "Enter" => Command::StartOrRestart,
        "Escape" => Command::TogglePause,
        _ => match key.to_ascii_lowercase().as_str() {
            "w" => Command::Turn(Direction::Up),
            "s" => Command::Turn(Direction::Down),
            "a" => Command::Turn(Direction::Left),
            "d" => Command::Turn(Direction::Right),
            "p" => Command::TogglePause,
            "m" => Command::ToggleMute,
            _ => return None,
        },
    };
    Some(command)
}

/// Decode a swipe (end minus start, screen coordinates) to a direction.
///
/// The dominant axis wins; ties go vertical.
pub fn swipe_direction(dx: f32, dy: f32) -> Option<Direction> {
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    if dx.abs() < MIN_SWIPE_DISTANCE && dy.abs() < MIN_SWIPE_DISTANCE {
        return None;
    }

    let dir = if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_wasd_keys() {
        let cases = [
            ("ArrowUp", Direction::Up),
            ("w", Direction::Up),
            ("W", Direction::Up),
            ("ArrowDown", Direction::Down),
            ("s", Direction::Down),
            ("ArrowLeft", Direction::Left),
            ("A", Direction::Left),
            ("ArrowRight", Direction::Right),
            ("d", Direction::Right),
        ];
        for (key, dir) in cases {
            assert_eq!(command_for_key(key), Some(Command::Turn(dir)), "key {:?}", key);
        }
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(command_for_key(" "), Some(Command::StartOrRestart));
        assert_eq!(command_for_key("Enter"), Some(Command::StartOrRestart));
        assert_eq!(command_for_key("p"), Some(Command::TogglePause));
        assert_eq!(command_for_key("P"), Some(Command::TogglePause));
        assert_eq!(command_for_key("Escape"), Some(Command::TogglePause));
        assert_eq!(command_for_key("m"), Some(Command::ToggleMute));
        assert_eq!(command_for_key("q"), None);
        assert_eq!(command_for_key("Shift"), None);
    }

    #[test]
    fn test_swipe_dominant_axis() {
        assert_eq!(swipe_direction(40.0, 10.0), Some(Direction::Right));
        assert_eq!(swipe_direction(-40.0, 10.0), Some(Direction::Left));
        assert_eq!(swipe_direction(5.0, 30.0), Some(Direction::Down));
        assert_eq!(swipe_direction(5.0, -30.0), Some(Direction::Up));
        // Tie goes vertical
        assert_eq!(swipe_direction(20.0, 20.0), Some(Direction::Down));
    }

    #[test]
    fn test_tap_is_not_a_swipe() {
        assert_eq!(swipe_direction(0.0, 0.0), None);
        assert_eq!(swipe_direction(3.0, -4.0), None);
        assert_eq!(swipe_direction(f32::NAN, 50.0), None);
    }
}
