//! Per-game high scores
//!
//! One integer per game identity, kept in key-value storage. Storage
//! problems never surface: a missing or unreadable value reads as zero and a
//! failed write reports "not stored".

use crate::platform::Storage;

/// Storage key prefix; the game identity is appended
const KEY_PREFIX: &str = "canvas_arcade_highscore_";

/// High score bookkeeping for every game in the collection
pub struct HighScoreStore {
    storage: Box<dyn Storage>,
}

impl HighScoreStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    fn key(game_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, game_id)
    }

    /// Stored high score for a game, 0 when absent or unreadable
    pub fn get_high_score(&self, game_id: &str) -> u64 {
        match self.storage.get(&Self::key(game_id)) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring corrupt high score for {}: {:?}", game_id, raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Could not read high score for {}: {}", game_id, e);
                0
            }
        }
    }

    /// Store `score` if it beats the stored value. Returns true when stored.
    pub fn set_high_score_if_higher(&mut self, game_id: &str, score: u64) -> bool {
        let current = self.get_high_score(game_id);
        if score <= current {
            return false;
        }
        match self.storage.set(&Self::key(game_id), &score.to_string()) {
            Ok(()) => {
                log::info!("New high score for {}: {} (was {})", game_id, score, current);
                true
            }
            Err(e) => {
                log::warn!("Could not save high score for {}: {}", game_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryStorage, StorageError};

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_absent_score_is_zero() {
        let store = HighScoreStore::new(Box::new(MemoryStorage::new()));
        assert_eq!(store.get_high_score("snake"), 0);
    }

    #[test]
    fn test_only_higher_scores_are_stored() {
        let mut store = HighScoreStore::new(Box::new(MemoryStorage::new()));
        assert!(store.set_high_score_if_higher("snake", 40));
        assert!(!store.set_high_score_if_higher("snake", 30));
        assert!(!store.set_high_score_if_higher("snake", 40));
        assert_eq!(store.get_high_score("snake"), 40);
        assert!(store.set_high_score_if_higher("snake", 70));
        assert_eq!(store.get_high_score("snake"), 70);
    }

    #[test]
    fn test_identities_are_separate() {
        let mut store = HighScoreStore::new(Box::new(MemoryStorage::new()));
        store.set_high_score_if_higher("snake", 90);
        assert_eq!(store.get_high_score("tetris"), 0);
    }

    #[test]
    fn test_zero_score_never_stored() {
        let storage = MemoryStorage::new();
        let mut store = HighScoreStore::new(Box::new(storage.clone()));
        assert!(!store.set_high_score_if_higher("snake", 0));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_corrupt_value_reads_as_zero() {
        let mut storage = MemoryStorage::new();
        storage.set("canvas_arcade_highscore_snake", "lots").unwrap();
        let mut store = HighScoreStore::new(Box::new(storage));
        assert_eq!(store.get_high_score("snake"), 0);
        assert!(store.set_high_score_if_higher("snake", 10));
        assert_eq!(store.get_high_score("snake"), 10);
    }

    #[test]
    fn test_broken_storage_degrades() {
        let mut store = HighScoreStore::new(Box::new(BrokenStorage));
        assert_eq!(store.get_high_score("snake"), 0);
        assert!(!store.set_high_score_if_higher("snake", 50));
    }
}
