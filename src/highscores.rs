//! High score leaderboard system
//!
//! Tracks the top 10 runs; stored through a [`ScoreStore`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Sorted by score descending; equal scores keep insertion order
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    ///
    /// A zero score still counts while the board has room.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, timestamp };

        // Find insertion point (sorted descending by score, after equal scores)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a store; any failure yields an empty board
    pub fn load(store: &mut dyn ScoreStore) -> Self {
        match store.load() {
            Ok(mut entries) => {
                log::info!("Loaded {} high scores", entries.len());
                // Stable, so equal scores keep their stored order
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(MAX_HIGH_SCORES);
                Self { entries }
            }
            Err(e) => {
                log::warn!("Failed to load high scores, starting fresh: {}", e);
                Self::new()
            }
        }
    }

    /// Save to a store, logging failures
    pub fn save(&self, store: &mut dyn ScoreStore) {
        match store.save(&self.entries) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {}", e),
        }
    }
}

/// Format a timestamp as a relative date string
///
/// Both arguments are Unix milliseconds. Anything a week or older is shown
/// as a short `M/D/YY` date.
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_ms = now - timestamp;
    let diff_secs = diff_ms / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i32;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            match DateTime::<Utc>::from_timestamp_millis(timestamp as i64) {
                Some(date) => date.format("%-m/%-d/%y").to_string(),
                None => "Long ago".to_string(),
            }
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    const MIN: f64 = 60_000.0;
    const HOUR: f64 = 60.0 * MIN;
    const DAY: f64 = 24.0 * HOUR;
    const NOW_2024: f64 = 1_709_640_000_000.0;

    #[test]
    fn test_sorted_descending_ties_by_insertion() {
        let mut scores = HighScores::new();
        scores.add_score(50, 1.0);
        scores.add_score(80, 2.0);
        scores.add_score(50, 3.0);

        let order: Vec<(u64, f64)> = scores.entries.iter().map(|e| (e.score, e.timestamp)).collect();
        assert_eq!(order, vec![(80, 2.0), (50, 1.0), (50, 3.0)]);
    }

    #[test]
    fn test_zero_score_recorded() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 1.0), Some(1));
        assert_eq!(scores.top_score(), Some(0));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut scores = HighScores::new();
        for i in 0..15 {
            scores.add_score(i * 10, i as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(140));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(50));

        assert!(!scores.qualifies(50));
        assert_eq!(scores.add_score(10, 99.0), None);
        assert_eq!(scores.potential_rank(60), Some(10));
    }

    #[test]
    fn test_load_sorts_and_save_round_trips() {
        let mut store = MemoryStore::with_entries(vec![
            HighScoreEntry {
                score: 10,
                timestamp: 1.0,
            },
            HighScoreEntry {
                score: 70,
                timestamp: 2.0,
            },
        ]);
        let mut scores = HighScores::load(&mut store);
        assert_eq!(scores.top_score(), Some(70));

        scores.add_score(40, 3.0);
        scores.save(&mut store);
        assert_eq!(store.saves, 1);
        assert_eq!(store.entries.len(), 3);
        assert_eq!(store.entries[1].score, 40);
    }

    #[test]
    fn test_load_failure_is_empty() {
        let mut store = MemoryStore::failing();
        assert!(HighScores::load(&mut store).is_empty());
        // Save failure is swallowed
        HighScores::new().save(&mut store);
    }

    #[test]
    fn test_format_relative() {
        let now = 1_700_000_000_000.0;
        assert_eq!(format_date(now - 5_000.0, now), "Just now");
        assert_eq!(format_date(now - MIN, now), "1 min ago");
        assert_eq!(format_date(now - 5.0 * MIN, now), "5 mins ago");
        assert_eq!(format_date(now - HOUR, now), "1 hour ago");
        assert_eq!(format_date(now - 3.0 * HOUR, now), "3 hours ago");
        assert_eq!(format_date(now - DAY, now), "Yesterday");
        assert_eq!(format_date(now - 4.0 * DAY, now), "4 days ago");
    }

    #[test]
    fn test_format_old_date() {
        // 2024-03-05 12:00 UTC
        let then = 1_709_640_000_000.0;
        assert_eq!(format_date(then, then + 30.0 * DAY), "3/5/24");
        assert_eq!(format_date(0.0, 10.0 * DAY), "1/1/70");
        // 1999-12-31 23:00 UTC
        assert_eq!(format_date(946_681_200_000.0, NOW_2024), "12/31/99");
    }
}
