//! Best final scores, kept in LocalStorage on the web build

use serde::{Deserialize, Serialize};

/// Board length
pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Unix time (ms) the run ended
    pub timestamp: f64,
}

/// Final scores, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "jet_blaster_highscores";

    /// Record a finished run. Returns its 1-based rank, or `None` for a zero
    /// score or one that does not beat a full board.
    pub fn add_score(&mut self, score: u64, timestamp: f64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        // Ties go below existing entries
        let index = self.entries.partition_point(|e| e.score >= score);
        if index >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(index, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Read the board from LocalStorage; an absent or unreadable board is empty
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored.map(|json| serde_json::from_str::<HighScores>(&json)) {
            Some(Ok(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Some(Err(e)) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not store high scores");
                }
            }
            Err(e) => log::warn!("High score serialization failed: {}", e),
        }
    }

    /// Native runs keep the board in memory only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &HighScores) -> Vec<u64> {
        scores.entries.iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_zero_is_not_recorded() {
        let mut scores = HighScores::default();
        assert_eq!(scores.add_score(0, 0.0), None);
        assert!(scores.entries.is_empty());
        assert_eq!(scores.top_score(), None);
    }

    #[test]
    fn test_sorted_insert() {
        let mut scores = HighScores::default();
        assert_eq!(scores.add_score(100, 1.0), Some(1));
        assert_eq!(scores.add_score(300, 2.0), Some(1));
        assert_eq!(scores.add_score(200, 3.0), Some(2));
        assert_eq!(scores.add_score(200, 4.0), Some(3));
        assert_eq!(board(&scores), vec![300, 200, 200, 100]);
        assert_eq!(scores.entries[2].timestamp, 4.0);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_full_board_truncates() {
        let mut scores = HighScores::default();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 10, 0.0);
        }
        assert_eq!(scores.add_score(10, 0.0), None);
        assert_eq!(scores.add_score(5, 0.0), None);
        assert_eq!(scores.add_score(15, 0.0), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }
}
