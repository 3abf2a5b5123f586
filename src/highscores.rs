//! Persisted best score
//!
//! A single decimal integer under a fixed key. Missing or garbled values
//! read as 0; failed writes are logged and dropped, never surfaced.

use crate::platform::Storage;

/// Best score carried across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "snake-high-score";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Read the persisted best score, 0 if absent or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => {
                let best = parse_stored(&raw).unwrap_or_else(|| {
                    log::warn!("Ignoring unreadable high score {:?}", raw);
                    0
                });
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Record a score. Persists and returns true if it beat the best.
    pub fn record(&mut self, score: u32, storage: &mut dyn Storage) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save(storage);
        true
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match storage.set(Self::STORAGE_KEY, &self.best.to_string()) {
            Ok(()) => log::debug!("High score saved ({})", self.best),
            Err(e) => log::warn!("Dropping high score write: {}", e),
        }
    }
}

/// Leading decimal digits after optional whitespace and sign, like `parseInt`.
/// Negative values clamp to 0.
fn parse_stored(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    if negative {
        return Some(0);
    }
    let digits = &rest[..digits_len];
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use crate::platform::storage::test_support::{BrokenStorage, ReadOnlyStorage};

    #[test]
    fn test_parse_stored() {
        assert_eq!(parse_stored("12"), Some(12));
        assert_eq!(parse_stored("  7\n"), Some(7));
        assert_eq!(parse_stored("12abc"), Some(12));
        assert_eq!(parse_stored("+3"), Some(3));
        assert_eq!(parse_stored("-4"), Some(0));
        assert_eq!(parse_stored("abc"), None);
        assert_eq!(parse_stored(""), None);
        assert_eq!(parse_stored("99999999999999"), Some(u32::MAX));
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let mut storage = MemoryStorage::new();
        assert_eq!(HighScore::load(&storage).best, 0);

        storage.set(HighScore::STORAGE_KEY, "NaN").unwrap();
        assert_eq!(HighScore::load(&storage).best, 0);

        storage.set(HighScore::STORAGE_KEY, "42").unwrap();
        assert_eq!(HighScore::load(&storage).best, 42);
    }

    #[test]
    fn test_load_from_broken_storage() {
        assert_eq!(HighScore::load(&BrokenStorage).best, 0);
    }

    #[test]
    fn test_record_writes_only_on_increase() {
        let mut storage = MemoryStorage::new();
        let mut high = HighScore::new(5);

        assert!(!high.record(5, &mut storage));
        assert!(storage.get(HighScore::STORAGE_KEY).unwrap().is_none());

        assert!(high.record(6, &mut storage));
        assert_eq!(high.best, 6);
        assert_eq!(storage.get(HighScore::STORAGE_KEY).unwrap().as_deref(), Some("6"));

        assert!(!high.record(2, &mut storage));
        assert_eq!(high.best, 6);
    }

    #[test]
    fn test_failed_write_still_updates_in_memory() {
        let mut storage = ReadOnlyStorage::default();
        let mut high = HighScore::new(1);
        assert!(high.record(3, &mut storage));
        assert_eq!(high.best, 3);
    }
}
